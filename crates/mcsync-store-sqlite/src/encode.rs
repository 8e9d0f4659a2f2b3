//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are written as RFC 3339 strings. UUIDs are stored as hyphenated
//! lowercase strings, the same form the server uses in its JSON files.

use chrono::{DateTime, NaiveDateTime, Utc};
use mcsync_core::{player::Player, property::PropertyRevision};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Accepts RFC 3339 as well as SQLite's `datetime('now')` form, which older
/// databases used for property dates.
pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Empty strings are treated as "never", as written by older layouts.
pub fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  match s {
    None | Some("") => Ok(None),
    Some(s) => decode_dt(s).map(Some),
  }
}

// ─── Raw DB rows ──────────────────────────────────────────────────────────────

pub const PLAYER_COLUMNS: &str =
  "uuid, name, last_seen, active, op, banned, banned_reason, whitelisted";

/// Raw column values as read from SQLite for the `players` table.
pub struct RawPlayer {
  pub uuid:          String,
  pub name:          Option<String>,
  pub last_seen:     Option<String>,
  pub active:        Option<bool>,
  pub op:            Option<bool>,
  pub banned:        Option<bool>,
  pub banned_reason: Option<String>,
  pub whitelisted:   Option<bool>,
}

impl RawPlayer {
  /// Map a row selected with [`PLAYER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:          row.get(0)?,
      name:          row.get(1)?,
      last_seen:     row.get(2)?,
      active:        row.get(3)?,
      op:            row.get(4)?,
      banned:        row.get(5)?,
      banned_reason: row.get(6)?,
      whitelisted:   row.get(7)?,
    })
  }

  pub fn into_player(self) -> Result<Player> {
    Ok(Player {
      uuid:          decode_uuid(&self.uuid)?,
      name:          self.name.unwrap_or_default(),
      last_seen:     decode_opt_dt(self.last_seen.as_deref())?,
      active:        self.active.unwrap_or(false),
      operator:      self.op.unwrap_or(false),
      banned:        self.banned.unwrap_or(false),
      banned_reason: self.banned_reason,
      whitelisted:   self.whitelisted.unwrap_or(false),
    })
  }
}

pub const REVISION_COLUMNS: &str = "key, value, revision, date, active";

/// Raw column values as read from SQLite for the `server_properties` table.
pub struct RawRevision {
  pub key:      String,
  pub value:    String,
  pub revision: u32,
  pub date:     String,
  pub active:   bool,
}

impl RawRevision {
  /// Map a row selected with [`REVISION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      key:      row.get(0)?,
      value:    row.get(1)?,
      revision: row.get(2)?,
      date:     row.get(3)?,
      active:   row.get(4)?,
    })
  }

  pub fn into_revision(self) -> Result<PropertyRevision> {
    Ok(PropertyRevision {
      key:         self.key,
      value:       self.value,
      revision:    self.revision,
      recorded_at: decode_dt(&self.date)?,
      active:      self.active,
    })
  }
}
