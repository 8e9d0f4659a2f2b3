//! The handles a pass works against.

use std::path::{Path, PathBuf};

use mcsync_core::{console::Dialer, store::SyncStore};
use mcsync_rcon::ConsoleManager;

/// Locations of the server documents read by a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
  pub user_cache:        PathBuf,
  pub whitelist:         PathBuf,
  pub banned_players:    PathBuf,
  pub ops:               PathBuf,
  pub server_properties: PathBuf,
}

impl DocumentPaths {
  /// The standard file names inside a server data directory.
  pub fn in_dir(dir: impl AsRef<Path>) -> Self {
    let dir = dir.as_ref();
    Self {
      user_cache:        dir.join("usercache.json"),
      whitelist:         dir.join("whitelist.json"),
      banned_players:    dir.join("banned-players.json"),
      ops:               dir.join("ops.json"),
      server_properties: dir.join("server.properties"),
    }
  }
}

/// Owned store and console handles, passed to every pass.
///
/// Passes take `&mut SyncContext`, so two passes can never run against the
/// same context at once.
pub struct SyncContext<S, D: Dialer> {
  pub store:     S,
  pub console:   ConsoleManager<D>,
  pub documents: DocumentPaths,
}

impl<S: SyncStore, D: Dialer> SyncContext<S, D> {
  pub fn new(store: S, console: ConsoleManager<D>, documents: DocumentPaths) -> Self {
    Self { store, console, documents }
  }
}
