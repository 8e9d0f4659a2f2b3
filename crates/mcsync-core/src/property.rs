//! Revisioned server properties.
//!
//! Each key carries an append-only history. Revisions count up from 1 and at
//! most one revision per key is active. Retiring a key flips its active
//! revision off; the history itself is never removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical value of a configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRevision {
  pub key:         String,
  pub value:       String,
  pub revision:    u32,
  pub recorded_at: DateTime<Utc>,
  pub active:      bool,
}

/// What an upsert did to the history of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
  /// The incoming value matched the active revision; nothing was written.
  Unchanged { revision: u32 },
  /// A new active revision was appended.
  Written { revision: u32 },
}

impl UpsertOutcome {
  pub fn revision(self) -> u32 {
    match self {
      Self::Unchanged { revision } | Self::Written { revision } => revision,
    }
  }

  pub fn is_written(self) -> bool { matches!(self, Self::Written { .. }) }
}
