//! Error type for `mcsync-rcon`.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// Every dial attempt failed.
  #[error("console at {address} unavailable after {attempts} attempt(s)")]
  ConnectionUnavailable {
    address:  String,
    attempts: u32,
    #[source]
    last:     Option<BoxError>,
  },

  /// A command failed on a session that had just passed its health check.
  #[error("console transport error: {0}")]
  Transport(#[source] BoxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
