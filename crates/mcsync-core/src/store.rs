//! The `SyncStore` trait.
//!
//! Implemented by storage backends (e.g. `mcsync-store-sqlite`). The
//! reconciliation engine depends on this abstraction, not on a concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  player::{Facet, FacetMember, Player},
  property::{PropertyRevision, UpsertOutcome},
};

/// Persistent state mirrored from the game server.
///
/// Player rows are insert-only; their facets are rewritten wholesale. Property
/// values are append-only revisions with a single active row per key.
///
/// Every write method runs inside one transaction: it either commits in full
/// or leaves the store untouched.
pub trait SyncStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Players ───────────────────────────────────────────────────────────

  /// Insert a player with every facet cleared unless a row with `uuid`
  /// already exists. An existing row only has its `name` refreshed; its
  /// facets are left untouched.
  ///
  /// Returns `true` if a row was inserted.
  fn ensure_player(
    &self,
    uuid: Uuid,
    name: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Retrieve a player by UUID. Returns `None` if not found.
  fn get_player(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<Option<Player>, Self::Error>> + Send + '_;

  /// List every known player, ordered by name.
  fn list_players(
    &self,
  ) -> impl Future<Output = Result<Vec<Player>, Self::Error>> + Send + '_;

  /// Clear `facet` on every player, then set it on exactly the rows matched
  /// by `members`.
  ///
  /// For [`Facet::Banned`] the member reason is stored alongside the flag and
  /// cleared reasons follow cleared flags. For [`Facet::Active`] players that
  /// were not active before the call get `last_seen` stamped.
  ///
  /// Returns the number of rows left with the facet set.
  fn replace_facet(
    &self,
    facet: Facet,
    members: Vec<FacetMember>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Properties ────────────────────────────────────────────────────────

  /// Append a new active revision for `key` unless `value` already equals
  /// the active one.
  fn upsert_property(
    &self,
    key: String,
    value: String,
  ) -> impl Future<Output = Result<UpsertOutcome, Self::Error>> + Send + '_;

  /// Deactivate the active revision of every key not present in `keep`.
  ///
  /// Returns the number of keys retired. History is retained.
  fn retire_properties_except(
    &self,
    keep: Vec<String>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// The active revision of `key`, if any.
  fn active_property(
    &self,
    key: String,
  ) -> impl Future<Output = Result<Option<PropertyRevision>, Self::Error>> + Send + '_;

  /// Every active revision, ordered by key.
  fn active_properties(
    &self,
  ) -> impl Future<Output = Result<Vec<PropertyRevision>, Self::Error>> + Send + '_;

  /// The full history of `key`, ordered by revision.
  fn property_history(
    &self,
    key: String,
  ) -> impl Future<Output = Result<Vec<PropertyRevision>, Self::Error>> + Send + '_;

  /// A single revision of `key`, active or retired.
  fn property_revision(
    &self,
    key: String,
    revision: u32,
  ) -> impl Future<Output = Result<Option<PropertyRevision>, Self::Error>> + Send + '_;
}
