//! [`SqliteStore`], the SQLite implementation of [`SyncStore`].

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Transaction};
use uuid::Uuid;

use mcsync_core::{
  player::{Facet, FacetMember, Player, PlayerKey},
  property::{PropertyRevision, UpsertOutcome},
  store::SyncStore,
};

use crate::{
  Result,
  encode::{PLAYER_COLUMNS, REVISION_COLUMNS, RawPlayer, RawRevision, encode_dt, encode_uuid},
  schema::{MIGRATIONS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An mcsync store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    tracing::debug!(path = %path.as_ref().display(), "opening database");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let added = self
      .conn
      .call(|conn| {
        // Tables from earlier layouts lack columns; add them before the
        // indexes in SCHEMA are created.
        let mut added = Vec::new();
        for (table, column, alter) in MIGRATIONS {
          let exists: bool = conn
            .query_row(
              "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
              rusqlite::params![table],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if !exists {
            continue;
          }
          let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
          let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          drop(stmt);
          if !columns.iter().any(|c| c == column) {
            conn.execute(alter, [])?;
            added.push(format!("{table}.{column}"));
          }
        }
        conn.execute_batch(SCHEMA)?;
        Ok(added)
      })
      .await?;

    for column in added {
      tracing::info!(%column, "migrated database column");
    }
    Ok(())
  }

  /// Every revision of `key` in order, or only `revision` when given.
  async fn revisions(&self, key: String, revision: Option<u32>) -> Result<Vec<PropertyRevision>> {
    let raws: Vec<RawRevision> = self
      .conn
      .call(move |conn| {
        let rows = match revision {
          Some(r) => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {REVISION_COLUMNS} FROM server_properties WHERE key = ?1 AND revision = ?2"
            ))?;
            let rows = stmt
              .query_map(rusqlite::params![key, r], RawRevision::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
          }
          None => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {REVISION_COLUMNS} FROM server_properties WHERE key = ?1 ORDER BY revision"
            ))?;
            let rows = stmt
              .query_map(rusqlite::params![key], RawRevision::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRevision::into_revision).collect()
  }
}

// ─── Facet helpers ───────────────────────────────────────────────────────────

fn reset_facet(tx: &Transaction<'_>, facet: Facet) -> rusqlite::Result<()> {
  let sql = match facet {
    Facet::Banned => "UPDATE players SET banned = 0, banned_reason = NULL".to_owned(),
    other => format!("UPDATE players SET {} = 0", other.column()),
  };
  tx.execute(&sql, [])?;
  Ok(())
}

fn mark_member(
  tx: &Transaction<'_>,
  facet: Facet,
  member: &FacetMember,
) -> rusqlite::Result<usize> {
  let (lookup, key) = match &member.key {
    PlayerKey::Uuid(u) => ("uuid", encode_uuid(*u)),
    PlayerKey::Name(n) => ("name", n.clone()),
  };

  if facet == Facet::Banned {
    let mut stmt = tx.prepare_cached(&format!(
      "UPDATE players SET banned = 1, banned_reason = ?2 WHERE {lookup} = ?1"
    ))?;
    stmt.execute(rusqlite::params![key, member.reason])
  } else {
    let mut stmt = tx.prepare_cached(&format!(
      "UPDATE players SET {} = 1 WHERE {lookup} = ?1",
      facet.column()
    ))?;
    stmt.execute(rusqlite::params![key])
  }
}

fn uuids_with_facet(tx: &Transaction<'_>, facet: Facet) -> rusqlite::Result<HashSet<String>> {
  let mut stmt =
    tx.prepare(&format!("SELECT uuid FROM players WHERE {} = 1", facet.column()))?;
  stmt
    .query_map([], |row| row.get::<_, String>(0))?
    .collect()
}

// ─── SyncStore impl ──────────────────────────────────────────────────────────

impl SyncStore for SqliteStore {
  type Error = crate::Error;

  // ── Players ───────────────────────────────────────────────────────────────

  async fn ensure_player(&self, uuid: Uuid, name: String) -> Result<bool> {
    let uuid_str = encode_uuid(uuid);

    let (inserted, renamed) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = tx.execute(
          "INSERT OR IGNORE INTO players (
             uuid, name, last_seen, active, op, banned, banned_reason, whitelisted
           ) VALUES (?1, ?2, NULL, 0, 0, 0, NULL, 0)",
          rusqlite::params![uuid_str, name],
        )? > 0;
        // The live `list` reply only carries names, so a rename has to land
        // before the active facet is rewritten.
        let renamed = !inserted
          && tx.execute(
            "UPDATE players SET name = ?2 WHERE uuid = ?1 AND name IS NOT ?2",
            rusqlite::params![uuid_str, name],
          )? > 0;
        tx.commit()?;
        Ok((inserted, renamed))
      })
      .await?;

    if renamed {
      tracing::debug!(%uuid, "refreshed player name");
    }
    Ok(inserted)
  }

  async fn get_player(&self, uuid: Uuid) -> Result<Option<Player>> {
    let uuid_str = encode_uuid(uuid);

    let raw: Option<RawPlayer> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE uuid = ?1"),
            rusqlite::params![uuid_str],
            RawPlayer::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPlayer::into_player).transpose()
  }

  async fn list_players(&self) -> Result<Vec<Player>> {
    let raws: Vec<RawPlayer> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PLAYER_COLUMNS} FROM players ORDER BY name, uuid"
        ))?;
        let rows = stmt
          .query_map([], RawPlayer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlayer::into_player).collect()
  }

  async fn replace_facet(&self, facet: Facet, members: Vec<FacetMember>) -> Result<usize> {
    let now_str = encode_dt(Utc::now());

    let (count, unmatched) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let previously_active = if facet == Facet::Active {
          uuids_with_facet(&tx, Facet::Active)?
        } else {
          HashSet::new()
        };

        reset_facet(&tx, facet)?;

        let mut unmatched = Vec::new();
        for member in &members {
          if mark_member(&tx, facet, member)? == 0 {
            unmatched.push(member.key.to_string());
          }
        }

        let marked = uuids_with_facet(&tx, facet)?;
        if facet == Facet::Active {
          let mut stamp = tx.prepare_cached("UPDATE players SET last_seen = ?1 WHERE uuid = ?2")?;
          for uuid in marked.difference(&previously_active) {
            stamp.execute(rusqlite::params![now_str, uuid])?;
          }
        }

        let count = marked.len();
        tx.commit()?;
        Ok((count, unmatched))
      })
      .await?;

    for key in unmatched {
      tracing::debug!(%facet, %key, "no player row matches facet member");
    }
    Ok(count)
  }

  // ── Properties ────────────────────────────────────────────────────────────

  async fn upsert_property(&self, key: String, value: String) -> Result<UpsertOutcome> {
    let now_str = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let active: Option<(u32, String)> = tx
          .query_row(
            "SELECT revision, value FROM server_properties WHERE key = ?1 AND active = 1",
            rusqlite::params![key],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        if let Some((revision, current)) = &active
          && *current == value
        {
          return Ok(UpsertOutcome::Unchanged { revision: *revision });
        }

        // Retired keys keep their history, so the next revision follows the
        // highest one ever written rather than the active one.
        let latest: u32 = tx.query_row(
          "SELECT COALESCE(MAX(revision), 0) FROM server_properties WHERE key = ?1",
          rusqlite::params![key],
          |r| r.get(0),
        )?;
        let revision = latest + 1;

        tx.execute(
          "UPDATE server_properties SET active = 0 WHERE key = ?1 AND active = 1",
          rusqlite::params![key],
        )?;
        tx.execute(
          "INSERT INTO server_properties (key, value, revision, date, active)
           VALUES (?1, ?2, ?3, ?4, 1)",
          rusqlite::params![key, value, revision, now_str],
        )?;
        tx.commit()?;

        Ok(UpsertOutcome::Written { revision })
      })
      .await?;

    Ok(outcome)
  }

  async fn retire_properties_except(&self, keep: Vec<String>) -> Result<usize> {
    let retired = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(
          "CREATE TEMP TABLE IF NOT EXISTS keep_keys (key TEXT PRIMARY KEY);
           DELETE FROM keep_keys;",
        )?;
        {
          let mut insert = tx.prepare("INSERT OR IGNORE INTO keep_keys (key) VALUES (?1)")?;
          for key in &keep {
            insert.execute(rusqlite::params![key])?;
          }
        }
        let n = tx.execute(
          "UPDATE server_properties SET active = 0
           WHERE active = 1 AND key NOT IN (SELECT key FROM keep_keys)",
          [],
        )?;
        tx.execute("DELETE FROM keep_keys", [])?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    Ok(retired)
  }

  async fn active_property(&self, key: String) -> Result<Option<PropertyRevision>> {
    let raw: Option<RawRevision> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {REVISION_COLUMNS} FROM server_properties WHERE key = ?1 AND active = 1"),
            rusqlite::params![key],
            RawRevision::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRevision::into_revision).transpose()
  }

  async fn active_properties(&self) -> Result<Vec<PropertyRevision>> {
    let raws: Vec<RawRevision> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVISION_COLUMNS} FROM server_properties WHERE active = 1 ORDER BY key"
        ))?;
        let rows = stmt
          .query_map([], RawRevision::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRevision::into_revision).collect()
  }

  async fn property_history(&self, key: String) -> Result<Vec<PropertyRevision>> {
    self.revisions(key, None).await
  }

  async fn property_revision(&self, key: String, revision: u32) -> Result<Option<PropertyRevision>> {
    Ok(self.revisions(key, Some(revision)).await?.pop())
  }
}
