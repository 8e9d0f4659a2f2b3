//! Errors surfaced by a reconciliation pass.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
  /// The console could not be (re)established within the retry ceiling.
  #[error("console unavailable: {0}")]
  ConnectionUnavailable(#[source] mcsync_rcon::Error),

  /// The console was reachable but a command failed.
  #[error("console error: {0}")]
  Console(#[source] mcsync_rcon::Error),

  #[error("cannot read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("cannot parse {what}: {reason}")]
  Parse { what: String, reason: String },

  #[error("store error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SyncError {
  pub fn parse(what: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
    Self::Parse { what: what.to_string(), reason: reason.to_string() }
  }

  pub fn storage<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Storage(Box::new(e))
  }
}

impl From<mcsync_rcon::Error> for SyncError {
  fn from(e: mcsync_rcon::Error) -> Self {
    match e {
      mcsync_rcon::Error::ConnectionUnavailable { .. } => Self::ConnectionUnavailable(e),
      other => Self::Console(other),
    }
  }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
