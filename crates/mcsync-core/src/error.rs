//! Error types for `mcsync-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid player uuid {value:?}: {source}")]
  InvalidUuid {
    value:  String,
    #[source]
    source: uuid::Error,
  },

  #[error("player entry carries neither a uuid nor a name")]
  MissingIdentity,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
