//! Readers for the documents the server rewrites on disk.
//!
//! The four JSON lists are arrays of objects. The user cache carries every
//! account the server has ever seen; the whitelist, ban list and operator list
//! carry at least a uuid or a name. `server.properties` is a `key=value` text
//! file.

use std::{collections::HashMap, path::Path};

use mcsync_core::player::{DEFAULT_BAN_REASON, FacetMember, PlayerKey, parse_uuid};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Result, SyncError};

// ─── JSON lists ──────────────────────────────────────────────────────────────

/// One entry of `usercache.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCacheEntry {
  pub name: String,
  pub uuid: String,
}

/// One entry of `whitelist.json`, `banned-players.json` or `ops.json`.
///
/// Fields the engine does not use (`level`, `created`, `source`, ...) are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEntry {
  #[serde(default)]
  pub uuid:   Option<String>,
  #[serde(default)]
  pub name:   Option<String>,
  #[serde(default)]
  pub reason: Option<String>,
}

impl ListEntry {
  pub fn key(&self) -> mcsync_core::Result<PlayerKey> {
    PlayerKey::from_parts(self.uuid.as_deref(), self.name.as_deref())
  }
}

/// Read and decode a JSON array document.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
  let raw = read_text(path).await?;
  serde_json::from_str(&raw).map_err(|e| SyncError::parse(path.display(), e))
}

/// The user cache as `(uuid, name)` pairs.
pub async fn read_user_cache(path: &Path) -> Result<Vec<(Uuid, String)>> {
  read_json::<UserCacheEntry>(path)
    .await?
    .into_iter()
    .map(|entry| {
      let uuid = parse_uuid(&entry.uuid).map_err(|e| SyncError::parse(path.display(), e))?;
      Ok((uuid, entry.name))
    })
    .collect()
}

/// A membership list as facet members, without reasons.
pub async fn read_members(path: &Path) -> Result<Vec<FacetMember>> {
  read_json::<ListEntry>(path)
    .await?
    .iter()
    .map(|entry| {
      entry
        .key()
        .map(FacetMember::new)
        .map_err(|e| SyncError::parse(path.display(), e))
    })
    .collect()
}

/// The ban list as facet members, each carrying its reason.
pub async fn read_bans(path: &Path) -> Result<Vec<FacetMember>> {
  read_json::<ListEntry>(path)
    .await?
    .into_iter()
    .map(|entry| {
      let key = entry.key().map_err(|e| SyncError::parse(path.display(), e))?;
      let reason = entry
        .reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BAN_REASON.to_owned());
      Ok(FacetMember::with_reason(key, reason))
    })
    .collect()
}

// ─── server.properties ───────────────────────────────────────────────────────

/// Parse `key=value` lines.
///
/// Blank lines and lines starting with `#` or `!` are comments. Lines without
/// `=` are skipped. The value is everything after the first `=`. A key that
/// appears more than once keeps its first position and its last value.
pub fn parse_properties(text: &str) -> Vec<(String, String)> {
  let mut out: Vec<(String, String)> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for line in text.lines() {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
      continue;
    }
    let Some((key, value)) = trimmed.split_once('=') else {
      continue;
    };
    let key = key.trim();
    if key.is_empty() {
      continue;
    }

    match index.get(key) {
      Some(&i) => out[i].1 = value.to_owned(),
      None => {
        index.insert(key.to_owned(), out.len());
        out.push((key.to_owned(), value.to_owned()));
      }
    }
  }

  out
}

pub async fn read_properties(path: &Path) -> Result<Vec<(String, String)>> {
  Ok(parse_properties(&read_text(path).await?))
}

async fn read_text(path: &Path) -> Result<String> {
  tokio::fs::read_to_string(path).await.map_err(|source| SyncError::Io {
    path: path.to_path_buf(),
    source,
  })
}
