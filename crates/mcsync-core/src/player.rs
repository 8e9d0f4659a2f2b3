//! Player rows and the boolean facets derived from external documents.
//!
//! A player row is created the first time its identity shows up in the user
//! cache and is never deleted. Every other fact about the player is one of
//! four independent facets, each rewritten wholesale on every pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Reason recorded for a ban entry that does not carry one.
pub const DEFAULT_BAN_REASON: &str = "Banned by an operator.";

// ─── Player ──────────────────────────────────────────────────────────────────

/// One row of the `players` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
  pub uuid:          Uuid,
  pub name:          String,
  /// Stamped when the player is first seen online after being offline.
  pub last_seen:     Option<DateTime<Utc>>,
  pub active:        bool,
  pub operator:      bool,
  pub banned:        bool,
  pub banned_reason: Option<String>,
  pub whitelisted:   bool,
}

// ─── Facets ──────────────────────────────────────────────────────────────────

/// An independent boolean fact about a player, owned by one external source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
  /// Currently connected, from the live `list` query.
  Active,
  /// Listed in `ops.json`.
  Operator,
  /// Listed in `banned-players.json`.
  Banned,
  /// Listed in `whitelist.json`.
  Whitelisted,
}

impl Facet {
  /// Column backing the facet in the `players` table.
  pub fn column(self) -> &'static str {
    match self {
      Facet::Active => "active",
      Facet::Operator => "op",
      Facet::Banned => "banned",
      Facet::Whitelisted => "whitelisted",
    }
  }
}

impl std::fmt::Display for Facet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Facet::Active => "active",
      Facet::Operator => "operator",
      Facet::Banned => "banned",
      Facet::Whitelisted => "whitelisted",
    })
  }
}

// ─── Identity matching ───────────────────────────────────────────────────────

/// How a document entry refers to a player.
///
/// Matching by UUID is exact. Matching by name is used when a source only
/// supplies a display name; a name reused by a different account over time
/// matches every row carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayerKey {
  Uuid(Uuid),
  Name(String),
}

impl PlayerKey {
  /// Build a key from an optional uuid string and an optional name, preferring
  /// the uuid whenever one is present.
  pub fn from_parts(uuid: Option<&str>, name: Option<&str>) -> Result<Self> {
    match (uuid.map(str::trim), name.map(str::trim)) {
      (Some(u), _) if !u.is_empty() => parse_uuid(u).map(PlayerKey::Uuid),
      (_, Some(n)) if !n.is_empty() => Ok(PlayerKey::Name(n.to_owned())),
      _ => Err(Error::MissingIdentity),
    }
  }
}

impl std::fmt::Display for PlayerKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PlayerKey::Uuid(u) => write!(f, "{u}"),
      PlayerKey::Name(n) => write!(f, "name:{n}"),
    }
  }
}

/// One entry to mark `true` when a facet is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetMember {
  pub key:    PlayerKey,
  /// Only meaningful for [`Facet::Banned`]; ignored for other facets.
  pub reason: Option<String>,
}

impl FacetMember {
  pub fn new(key: PlayerKey) -> Self { Self { key, reason: None } }

  pub fn with_reason(key: PlayerKey, reason: impl Into<String>) -> Self {
    Self { key, reason: Some(reason.into()) }
  }
}

/// Parse a player UUID as written by the server (hyphenated, lowercase).
pub fn parse_uuid(value: &str) -> Result<Uuid> {
  Uuid::parse_str(value).map_err(|source| Error::InvalidUuid {
    value: value.to_owned(),
    source,
  })
}
