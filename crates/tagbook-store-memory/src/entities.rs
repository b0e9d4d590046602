//! [`EntityStore`] — every entity and its per-dimension history logs.
//!
//! Methods that change which logs exist take `&mut self` and therefore
//! require the store-wide write lock. [`EntityStore::append`] takes `&self`
//! and serialises on the single log it touches.

use std::{
  collections::BTreeMap,
  sync::{RwLock, RwLockReadGuard},
};

use chrono::{DateTime, Utc};
use tagbook_core::{
  entity::{Entity, EntityId},
  history::{HistoryLog, Record},
};

use crate::{Result, lock};

// ─── Slot ────────────────────────────────────────────────────────────────────

/// One entity plus its logs, keyed by dimension name.
#[derive(Debug)]
pub struct EntitySlot {
  pub entity: Entity,
  logs:       BTreeMap<String, RwLock<HistoryLog>>,
}

impl EntitySlot {
  /// Read-lock the log for `dimension`.
  pub fn log(&self, dimension: &str) -> Result<RwLockReadGuard<'_, HistoryLog>> {
    let log = self
      .logs
      .get(dimension)
      .ok_or_else(|| tagbook_core::Error::DimensionNotFound(dimension.to_owned()))?;
    lock::read(log, "history log")
  }

  /// Dimension names this entity has a log for, sorted.
  pub fn dimensions(&self) -> impl Iterator<Item = &str> {
    self.logs.keys().map(String::as_str)
  }

  pub fn has_log(&self, dimension: &str) -> bool { self.logs.contains_key(dimension) }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct EntityStore {
  slots: BTreeMap<EntityId, EntitySlot>,
}

impl EntityStore {
  pub fn contains(&self, id: &EntityId) -> bool { self.slots.contains_key(id) }

  pub fn get(&self, id: &EntityId) -> Result<&EntitySlot> {
    self
      .slots
      .get(id)
      .ok_or_else(|| tagbook_core::Error::EntityNotFound(id.clone()).into())
  }

  /// All slots, sorted by entity id.
  pub fn iter(&self) -> impl Iterator<Item = &EntitySlot> { self.slots.values() }

  /// Register a new entity with fully seeded logs. An existing entity with
  /// the same id is left untouched.
  pub fn insert(&mut self, entity: Entity, logs: BTreeMap<String, HistoryLog>) {
    let logs = logs
      .into_iter()
      .map(|(dimension, log)| (dimension, RwLock::new(log)))
      .collect();
    self
      .slots
      .entry(entity.id.clone())
      .or_insert(EntitySlot { entity, logs });
  }

  /// Seed an absence log for `dimension` on one entity if it has none.
  ///
  /// Returns `true` if a log was created.
  pub fn ensure_dimension(
    &mut self,
    id: &EntityId,
    dimension: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<bool> {
    let slot = self
      .slots
      .get_mut(id)
      .ok_or_else(|| tagbook_core::Error::EntityNotFound(id.clone()))?;
    Ok(seed_log(slot, dimension, author, at))
  }

  /// Seed an absence log for `dimension` on every entity lacking one.
  ///
  /// Returns the number of logs created.
  pub fn ensure_dimension_all(
    &mut self,
    dimension: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> usize {
    let mut created = 0;
    for slot in self.slots.values_mut() {
      if seed_log(slot, dimension, author, at) {
        created += 1;
      }
    }
    created
  }

  /// Append `record` to one log. Returns the log's new length.
  pub fn append(&self, id: &EntityId, dimension: &str, record: Record) -> Result<usize> {
    let slot = self.get(id)?;
    let log = slot
      .logs
      .get(dimension)
      .ok_or_else(|| tagbook_core::Error::DimensionNotFound(dimension.to_owned()))?;
    let mut log = lock::write(log, "history log")?;
    log.append(record);
    Ok(log.len())
  }

  /// Drop the log for `dimension` from every entity. Returns how many logs
  /// were removed.
  pub fn purge_dimension(&mut self, dimension: &str) -> usize {
    self
      .slots
      .values_mut()
      .filter_map(|slot| slot.logs.remove(dimension))
      .count()
  }
}

fn seed_log(slot: &mut EntitySlot, dimension: &str, author: &str, at: DateTime<Utc>) -> bool {
  if slot.logs.contains_key(dimension) {
    return false;
  }
  slot.logs.insert(
    dimension.to_owned(),
    RwLock::new(HistoryLog::seeded(Record::absent(author, at))),
  );
  true
}
