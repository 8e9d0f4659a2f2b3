//! Integration tests for `SqliteStore` against an in-memory database.

use mcsync_core::{
  player::{Facet, FacetMember, PlayerKey},
  property::UpsertOutcome,
  store::SyncStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seed(s: &SqliteStore, name: &str) -> Uuid {
  let id = Uuid::new_v4();
  assert!(s.ensure_player(id, name.into()).await.unwrap());
  id
}

fn by_uuid(id: Uuid) -> FacetMember { FacetMember::new(PlayerKey::Uuid(id)) }

// ─── Players ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_player_defaults_all_facets_false() {
  let s = store().await;
  let id = seed(&s, "Alice").await;

  let p = s.get_player(id).await.unwrap().unwrap();
  assert_eq!(p.name, "Alice");
  assert!(!p.active && !p.operator && !p.banned && !p.whitelisted);
  assert!(p.last_seen.is_none());
}

#[tokio::test]
async fn ensure_player_keeps_existing_facets() {
  let s = store().await;
  let id = seed(&s, "Alice").await;
  s.replace_facet(Facet::Operator, vec![by_uuid(id)]).await.unwrap();

  let inserted = s.ensure_player(id, "Alice".into()).await.unwrap();
  assert!(!inserted);

  let p = s.get_player(id).await.unwrap().unwrap();
  assert_eq!(p.name, "Alice");
  assert!(p.operator);
}

#[tokio::test]
async fn ensure_player_refreshes_name() {
  let s = store().await;
  let id = seed(&s, "Alice").await;
  s.replace_facet(Facet::Operator, vec![by_uuid(id)]).await.unwrap();

  assert!(!s.ensure_player(id, "Alicia".into()).await.unwrap());
  let n = s
    .replace_facet(Facet::Active, vec![FacetMember::new(PlayerKey::Name("Alicia".into()))])
    .await
    .unwrap();
  assert_eq!(n, 1);

  let p = s.get_player(id).await.unwrap().unwrap();
  assert_eq!(p.name, "Alicia");
  assert!(p.operator && p.active);
}

#[tokio::test]
async fn get_player_missing_returns_none() {
  let s = store().await;
  assert!(s.get_player(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_players_ordered_by_name() {
  let s = store().await;
  seed(&s, "Charlie").await;
  seed(&s, "Alice").await;
  seed(&s, "Bob").await;

  let names: Vec<String> =
    s.list_players().await.unwrap().into_iter().map(|p| p.name).collect();
  assert_eq!(names, ["Alice", "Bob", "Charlie"]);
}

// ─── Facets ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_facet_clears_players_missing_from_members() {
  let s = store().await;
  let alice = seed(&s, "Alice").await;
  let bob = seed(&s, "Bob").await;

  let n = s
    .replace_facet(Facet::Whitelisted, vec![by_uuid(alice), by_uuid(bob)])
    .await
    .unwrap();
  assert_eq!(n, 2);

  let n = s.replace_facet(Facet::Whitelisted, vec![by_uuid(alice)]).await.unwrap();
  assert_eq!(n, 1);
  assert!(s.get_player(alice).await.unwrap().unwrap().whitelisted);
  assert!(!s.get_player(bob).await.unwrap().unwrap().whitelisted);
}

#[tokio::test]
async fn replace_facet_leaves_other_facets_alone() {
  let s = store().await;
  let alice = seed(&s, "Alice").await;
  s.replace_facet(Facet::Operator, vec![by_uuid(alice)]).await.unwrap();
  s.replace_facet(Facet::Whitelisted, vec![by_uuid(alice)]).await.unwrap();

  s.replace_facet(Facet::Whitelisted, vec![]).await.unwrap();

  let p = s.get_player(alice).await.unwrap().unwrap();
  assert!(!p.whitelisted);
  assert!(p.operator);
}

#[tokio::test]
async fn replace_facet_with_empty_members_clears_everyone() {
  let s = store().await;
  let alice = seed(&s, "Alice").await;
  s.replace_facet(Facet::Operator, vec![by_uuid(alice)]).await.unwrap();

  let n = s.replace_facet(Facet::Operator, vec![]).await.unwrap();
  assert_eq!(n, 0);
  assert!(!s.get_player(alice).await.unwrap().unwrap().operator);
}

#[tokio::test]
async fn unknown_members_are_ignored() {
  let s = store().await;
  seed(&s, "Alice").await;

  let n = s
    .replace_facet(Facet::Operator, vec![
      by_uuid(Uuid::new_v4()),
      FacetMember::new(PlayerKey::Name("Nobody".into())),
    ])
    .await
    .unwrap();
  assert_eq!(n, 0);
}

#[tokio::test]
async fn ban_reason_is_recorded_and_cleared_with_flag() {
  let s = store().await;
  let alice = seed(&s, "Alice").await;

  s.replace_facet(Facet::Banned, vec![FacetMember::with_reason(
    PlayerKey::Uuid(alice),
    "griefing",
  )])
  .await
  .unwrap();
  let p = s.get_player(alice).await.unwrap().unwrap();
  assert!(p.banned);
  assert_eq!(p.banned_reason.as_deref(), Some("griefing"));

  s.replace_facet(Facet::Banned, vec![]).await.unwrap();
  let p = s.get_player(alice).await.unwrap().unwrap();
  assert!(!p.banned);
  assert!(p.banned_reason.is_none());
}

#[tokio::test]
async fn name_member_matches_by_name() {
  let s = store().await;
  let alice = seed(&s, "Alice").await;
  let bob = seed(&s, "Bob").await;

  s.replace_facet(Facet::Active, vec![FacetMember::new(PlayerKey::Name(
    "Alice".into(),
  ))])
  .await
  .unwrap();

  assert!(s.get_player(alice).await.unwrap().unwrap().active);
  assert!(!s.get_player(bob).await.unwrap().unwrap().active);
}

#[tokio::test]
async fn last_seen_stamped_only_on_transition_to_active() {
  let s = store().await;
  let alice = seed(&s, "Alice").await;
  let online = || vec![FacetMember::new(PlayerKey::Name("Alice".into()))];

  s.replace_facet(Facet::Active, online()).await.unwrap();
  let first = s.get_player(alice).await.unwrap().unwrap().last_seen;
  assert!(first.is_some());

  s.replace_facet(Facet::Active, online()).await.unwrap();
  let second = s.get_player(alice).await.unwrap().unwrap().last_seen;
  assert_eq!(first, second);

  // Going offline keeps the stamp.
  s.replace_facet(Facet::Active, vec![]).await.unwrap();
  let p = s.get_player(alice).await.unwrap().unwrap();
  assert!(!p.active);
  assert_eq!(p.last_seen, first);
}

// ─── Properties ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_upsert_creates_revision_one() {
  let s = store().await;

  let out = s.upsert_property("motd".into(), "hello".into()).await.unwrap();
  assert_eq!(out, UpsertOutcome::Written { revision: 1 });

  let active = s.active_property("motd".into()).await.unwrap().unwrap();
  assert_eq!(active.value, "hello");
  assert_eq!(active.revision, 1);
  assert!(active.active);
}

#[tokio::test]
async fn unchanged_value_writes_nothing() {
  let s = store().await;
  s.upsert_property("motd".into(), "hello".into()).await.unwrap();

  let out = s.upsert_property("motd".into(), "hello".into()).await.unwrap();
  assert_eq!(out, UpsertOutcome::Unchanged { revision: 1 });
  assert_eq!(s.property_history("motd".into()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn revisions_increase_with_single_active_row() {
  let s = store().await;
  for v in ["a", "b", "c"] {
    s.upsert_property("difficulty".into(), v.into()).await.unwrap();
  }

  let history = s.property_history("difficulty".into()).await.unwrap();
  let revisions: Vec<u32> = history.iter().map(|r| r.revision).collect();
  assert_eq!(revisions, [1, 2, 3]);

  let active: Vec<_> = history.iter().filter(|r| r.active).collect();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].value, "c");
  assert_eq!(active[0].revision, 3);
}

#[tokio::test]
async fn empty_value_is_a_real_revision() {
  let s = store().await;
  let out = s.upsert_property("level-seed".into(), String::new()).await.unwrap();
  assert_eq!(out, UpsertOutcome::Written { revision: 1 });
}

#[tokio::test]
async fn retire_keeps_history_queryable() {
  let s = store().await;
  s.upsert_property("motd".into(), "hello".into()).await.unwrap();
  s.upsert_property("pvp".into(), "true".into()).await.unwrap();

  let retired = s.retire_properties_except(vec!["pvp".into()]).await.unwrap();
  assert_eq!(retired, 1);

  assert!(s.active_property("motd".into()).await.unwrap().is_none());
  let old = s.property_revision("motd".into(), 1).await.unwrap().unwrap();
  assert_eq!(old.value, "hello");
  assert!(!old.active);

  let active = s.active_properties().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].key, "pvp");
}

#[tokio::test]
async fn retire_with_empty_keep_set_retires_everything() {
  let s = store().await;
  s.upsert_property("motd".into(), "hello".into()).await.unwrap();
  s.upsert_property("pvp".into(), "true".into()).await.unwrap();

  assert_eq!(s.retire_properties_except(vec![]).await.unwrap(), 2);
  assert!(s.active_properties().await.unwrap().is_empty());
  // Idempotent.
  assert_eq!(s.retire_properties_except(vec![]).await.unwrap(), 0);
}

#[tokio::test]
async fn retired_key_resumes_after_highest_revision() {
  let s = store().await;
  s.upsert_property("motd".into(), "a".into()).await.unwrap();
  s.upsert_property("motd".into(), "b".into()).await.unwrap();
  s.retire_properties_except(vec![]).await.unwrap();

  let out = s.upsert_property("motd".into(), "b".into()).await.unwrap();
  assert_eq!(out, UpsertOutcome::Written { revision: 3 });
  assert_eq!(s.active_property("motd".into()).await.unwrap().unwrap().revision, 3);
}

#[tokio::test]
async fn property_revision_missing_returns_none() {
  let s = store().await;
  s.upsert_property("motd".into(), "a".into()).await.unwrap();
  assert!(s.property_revision("motd".into(), 7).await.unwrap().is_none());
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_file_store_preserves_rows_and_migrates() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("legacy.db");

  // A players table from before banned_reason existed.
  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn
      .execute_batch(
        "CREATE TABLE players (
           uuid text primary key, name text, last_seen text,
           active boolean, op boolean, banned boolean, whitelisted boolean
         );
         INSERT INTO players VALUES
           ('069a79f4-44e9-4726-a5be-fca90e38aaf5', 'Notch', '', 0, 1, 0, 1);",
      )
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let players = s.list_players().await.unwrap();
  assert_eq!(players.len(), 1);
  assert!(players[0].operator && players[0].whitelisted);
  assert!(players[0].banned_reason.is_none());
  assert!(players[0].last_seen.is_none());

  s.replace_facet(Facet::Banned, vec![FacetMember::with_reason(
    PlayerKey::Uuid(players[0].uuid),
    "test",
  )])
  .await
  .unwrap();
  drop(s);

  let s = SqliteStore::open(&path).await.unwrap();
  let p = s.get_player(players[0].uuid).await.unwrap().unwrap();
  assert_eq!(p.banned_reason.as_deref(), Some("test"));
}
