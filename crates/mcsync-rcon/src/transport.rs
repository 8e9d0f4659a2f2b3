//! [`Dialer`] and [`Session`] over the Source RCON protocol.

use mcsync_core::console::{Dialer, Session};
use rcon::Connection;
use tokio::net::TcpStream;

/// Dials RCON sessions over TCP.
#[derive(Debug, Clone, Copy)]
pub struct RconDialer {
  minecraft_quirks: bool,
}

impl RconDialer {
  /// A dialer for Minecraft servers, which split long replies differently
  /// from other Source RCON implementations.
  pub fn minecraft() -> Self { Self { minecraft_quirks: true } }
}

impl Default for RconDialer {
  fn default() -> Self { Self::minecraft() }
}

/// An authenticated RCON session.
pub struct RconSession {
  conn: Connection<TcpStream>,
}

impl Dialer for RconDialer {
  type Error = rcon::Error;
  type Session = RconSession;

  async fn dial<'a>(&'a self, address: &'a str, credential: &'a str) -> Result<RconSession, rcon::Error> {
    let conn = Connection::<TcpStream>::builder()
      .enable_minecraft_quirks(self.minecraft_quirks)
      .connect(address, credential)
      .await?;
    Ok(RconSession { conn })
  }
}

impl Session for RconSession {
  type Error = rcon::Error;

  async fn execute<'a>(&'a mut self, command: &'a str) -> Result<String, rcon::Error> {
    self.conn.cmd(command).await
  }

  // Dropping the connection closes the socket.
  async fn close(self) {}
}
