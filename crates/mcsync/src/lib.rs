//! Reconciliation of a Minecraft server's state into the mcsync store.
//!
//! A pass reads the server's membership files and live player list
//! ([`players::reconcile`]) or its `server.properties`
//! ([`properties::sync`]) and rewrites the store to match. Both passes are
//! idempotent: unchanged inputs leave the store unchanged.

pub mod config;
pub mod context;
pub mod documents;
pub mod error;
pub mod online;
pub mod players;
pub mod properties;

pub use config::SyncConfig;
pub use context::{DocumentPaths, SyncContext};
pub use error::{Result, SyncError};
