//! Runtime configuration, layered from an optional TOML file and `MCSYNC_*`
//! environment variables.
//!
//! Console host, port and password are not part of this struct; the binary
//! takes them from `RCON_SERVER`, `RCON_PORT` and `RCON_PASSWORD`.

use std::{path::{Path, PathBuf}, time::Duration};

use mcsync_rcon::{Canary, RetryPolicy};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
  /// Directory holding the server's JSON lists and `server.properties`.
  pub data_dir:         PathBuf,
  /// SQLite database file.
  pub database:         PathBuf,
  pub connect_attempts: u32,
  pub backoff_secs:     u64,
  pub canary_command:   String,
  pub canary_marker:    String,
}

impl Default for SyncConfig {
  fn default() -> Self {
    let retry = RetryPolicy::default();
    let canary = Canary::default();
    Self {
      data_dir:         PathBuf::from("./mcdata"),
      database:         PathBuf::from("./database.db"),
      connect_attempts: retry.attempts,
      backoff_secs:     retry.backoff.as_secs(),
      canary_command:   canary.command,
      canary_marker:    canary.marker,
    }
  }
}

impl SyncConfig {
  /// Read `file` if it exists, then apply `MCSYNC_*` overrides.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("MCSYNC").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      attempts: self.connect_attempts,
      backoff:  Duration::from_secs(self.backoff_secs),
    }
  }

  pub fn canary(&self) -> Canary {
    Canary {
      command: self.canary_command.clone(),
      marker:  self.canary_marker.clone(),
    }
  }
}
