//! Remote console transport contract.
//!
//! A [`Dialer`] produces [`Session`]s; a session executes one textual command
//! at a time and returns the server's reply. Wire framing lives behind these
//! traits (see `mcsync-rcon`), as do test doubles.

use std::future::Future;

/// A live, authenticated console session.
pub trait Session: Send {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Send `command` and wait for the textual reply.
  fn execute<'a>(
    &'a mut self,
    command: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Release the session. Consumes it; errors on close are not reported.
  fn close(self) -> impl Future<Output = ()> + Send;
}

/// Opens console sessions.
pub trait Dialer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
  type Session: Session<Error = Self::Error>;

  /// Connect to `address` (`host:port`) and authenticate with `credential`.
  fn dial<'a>(
    &'a self,
    address: &'a str,
    credential: &'a str,
  ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + 'a;
}
