//! The `TagStore` trait.
//!
//! Implemented by storage backends (e.g. `tagbook-store-memory`). The HTTP
//! layer depends on this abstraction, not on a concrete backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
  dimension::DimensionInfo,
  entity::{Entity, EntityId},
  error::Classify,
  history::Record,
  keyword::Keyword,
  view::{EntityHistory, EntityView},
};

/// Abstraction over a tagbook backend.
///
/// History is append-only: assignment, unassignment and entity creation only
/// ever add records. Vocabulary changes never rewrite history; reads resolve
/// against live keyword state instead.
///
/// Structural operations (`create_dimension`, `delete_dimension`,
/// `create_entity`) must be atomic with respect to every other operation.
pub trait TagStore: Send + Sync {
  type Error: std::error::Error
    + Classify
    + From<crate::Error>
    + Send
    + Sync
    + 'static;

  // ── Dimensions ────────────────────────────────────────────────────────

  /// All dimensions, sorted by name.
  fn list_dimensions(&self) -> Result<Vec<DimensionInfo>, Self::Error>;

  /// Create a dimension with an empty vocabulary and seed an absence record
  /// for it on every existing entity. Idempotent: an existing dimension is
  /// returned unchanged.
  fn create_dimension(
    &self,
    name: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<DimensionInfo, Self::Error>;

  /// Remove a dimension, its vocabulary, and every entity's log for it.
  ///
  /// Irreversible. Returns `false` if the dimension did not exist.
  fn delete_dimension(&self, name: &str) -> Result<bool, Self::Error>;

  // ── Vocabulary ────────────────────────────────────────────────────────

  /// Create a keyword, or undeprecate it if it already exists.
  fn create_keyword(
    &self,
    dimension: &str,
    name: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<Keyword, Self::Error>;

  /// Soft-delete a keyword. Returns `false` if the keyword does not exist;
  /// only a missing dimension is an error.
  fn delete_keyword(&self, dimension: &str, name: &str) -> Result<bool, Self::Error>;

  /// Fetch a keyword whether or not it is deprecated.
  fn get_keyword(&self, dimension: &str, name: &str) -> Result<Keyword, Self::Error>;

  /// Names of the active keywords of `dimension`, sorted.
  fn list_active(&self, dimension: &str) -> Result<Vec<String>, Self::Error>;

  /// Active keywords of `dimension` with their metadata, sorted by name.
  fn active_keywords(&self, dimension: &str) -> Result<Vec<Keyword>, Self::Error>;

  // ── Entities ──────────────────────────────────────────────────────────

  /// Create an entity with one log per existing dimension.
  ///
  /// `initial` maps dimension name to keyword name. Unknown dimensions are
  /// ignored; unknown or deprecated keywords seed an absence record. If `id`
  /// already exists nothing changes and its current view is returned.
  fn create_entity(
    &self,
    id: &EntityId,
    initial: &BTreeMap<String, String>,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<EntityView, Self::Error>;

  /// All entities, sorted by id.
  fn list_entities(&self) -> Result<Vec<Entity>, Self::Error>;

  /// Append a record pointing at `keyword`. A deprecated keyword is coerced
  /// to an absence record rather than rejected.
  fn assign(
    &self,
    id: &EntityId,
    dimension: &str,
    keyword: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<Record, Self::Error>;

  /// Append an absence record.
  fn unassign(
    &self,
    id: &EntityId,
    dimension: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<Record, Self::Error>;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Resolve the current value of one dimension; `None` means absent.
  fn current_value(
    &self,
    id: &EntityId,
    dimension: &str,
  ) -> Result<Option<Keyword>, Self::Error>;

  /// Resolve every dimension of one entity.
  fn current_values(&self, id: &EntityId) -> Result<EntityView, Self::Error>;

  /// Resolve every entity in one consistent snapshot.
  fn all_current_values(&self) -> Result<Vec<EntityView>, Self::Error>;

  /// The raw record sequence of one log, oldest first.
  fn full_history(&self, id: &EntityId, dimension: &str) -> Result<Vec<Record>, Self::Error>;

  /// Raw history of every dimension of one entity.
  fn entity_history(&self, id: &EntityId) -> Result<EntityHistory, Self::Error>;

  /// Raw history of every entity in one consistent snapshot.
  fn all_histories(&self) -> Result<Vec<EntityHistory>, Self::Error>;
}
