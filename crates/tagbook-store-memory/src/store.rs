//! [`MemoryStore`] — the in-memory implementation of [`TagStore`].

use std::{
  collections::BTreeMap,
  sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use tagbook_core::{
  dimension::{Dimension, DimensionInfo},
  entity::{Entity, EntityId},
  history::{HistoryLog, Record},
  keyword::Keyword,
  resolve::resolve_record,
  seed::Seed,
  store::TagStore,
  view::{CurrentValues, EntityHistory, EntityView},
};

use crate::{EntitySlot, EntityStore, Result, lock};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct State {
  dimensions: BTreeMap<String, RwLock<Dimension>>,
  entities:   EntityStore,
}

impl State {
  fn dimension(&self, name: &str) -> Result<&RwLock<Dimension>> {
    self
      .dimensions
      .get(name)
      .ok_or_else(|| tagbook_core::Error::DimensionNotFound(name.to_owned()).into())
  }

  /// Resolve one log of `slot` against the live vocabulary.
  ///
  /// The log lock is released before the vocabulary lock is taken, so no
  /// two fine-grained locks are ever held together.
  fn resolve(&self, slot: &EntitySlot, dimension: &str) -> Result<Option<Keyword>> {
    let latest = slot.log(dimension)?.latest().clone();
    let dim = lock::read(self.dimension(dimension)?, "dimension")?;
    Ok(resolve_record(&latest, &dim.keywords))
  }

  fn view(&self, slot: &EntitySlot) -> Result<EntityView> {
    let values: CurrentValues = slot
      .dimensions()
      .map(|d| Ok((d.to_owned(), self.resolve(slot, d)?)))
      .collect::<Result<_>>()?;
    Ok(EntityView { entity: slot.entity.clone(), values })
  }

  fn history(&self, slot: &EntitySlot) -> Result<EntityHistory> {
    let history: BTreeMap<String, Vec<Record>> = slot
      .dimensions()
      .map(|d| Ok((d.to_owned(), slot.log(d)?.records().to_vec())))
      .collect::<Result<_>>()?;
    Ok(EntityHistory { entity: slot.entity.clone(), history })
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tagbook store held entirely in process memory.
///
/// Cloning is cheap — clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<RwLock<State>>,
}

impl MemoryStore {
  /// An empty store with no dimensions and no entities.
  pub fn new() -> Self { Self::default() }

  /// A store populated from `seed`.
  pub fn from_seed(seed: &Seed, author: &str, at: DateTime<Utc>) -> Result<Self> {
    let store = Self::new();
    seed.apply(&store, author, at)?;
    info!(
      dimensions = seed.dimensions.len(),
      images = seed.images.len(),
      "store seeded"
    );
    Ok(store)
  }

  fn read(&self) -> Result<RwLockReadGuard<'_, State>> { lock::read(&self.state, "store") }

  fn write(&self) -> Result<RwLockWriteGuard<'_, State>> { lock::write(&self.state, "store") }
}

// ─── TagStore impl ───────────────────────────────────────────────────────────

impl TagStore for MemoryStore {
  type Error = crate::Error;

  // ── Dimensions ────────────────────────────────────────────────────────────

  fn list_dimensions(&self) -> Result<Vec<DimensionInfo>> {
    let state = self.read()?;
    state
      .dimensions
      .values()
      .map(|d| Ok(lock::read(d, "dimension")?.info.clone()))
      .collect()
  }

  fn create_dimension(
    &self,
    name: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<DimensionInfo> {
    let mut guard = self.write()?;
    let state = &mut *guard;

    if let Some(existing) = state.dimensions.get(name) {
      return Ok(lock::read(existing, "dimension")?.info.clone());
    }

    let dimension = Dimension::new(name, author, at);
    let info = dimension.info.clone();
    state.dimensions.insert(name.to_owned(), RwLock::new(dimension));
    let seeded = state.entities.ensure_dimension_all(name, author, at);

    info!(dimension = name, entities = seeded, "dimension created");
    Ok(info)
  }

  fn delete_dimension(&self, name: &str) -> Result<bool> {
    let mut guard = self.write()?;
    let state = &mut *guard;

    if state.dimensions.remove(name).is_none() {
      debug!(dimension = name, "delete of unknown dimension ignored");
      return Ok(false);
    }
    let purged = state.entities.purge_dimension(name);

    info!(dimension = name, logs = purged, "dimension deleted with its history");
    Ok(true)
  }

  // ── Vocabulary ────────────────────────────────────────────────────────────

  fn create_keyword(
    &self,
    dimension: &str,
    name: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<Keyword> {
    let state = self.read()?;
    let mut dim = lock::write(state.dimension(dimension)?, "dimension")?;
    let keyword = dim.keywords.create_or_undeprecate(name, author, at).clone();

    debug!(dimension, keyword = name, "keyword active");
    Ok(keyword)
  }

  fn delete_keyword(&self, dimension: &str, name: &str) -> Result<bool> {
    let state = self.read()?;
    let mut dim = lock::write(state.dimension(dimension)?, "dimension")?;
    let found = dim.keywords.deprecate(name);

    debug!(dimension, keyword = name, found, "keyword deprecated");
    Ok(found)
  }

  fn get_keyword(&self, dimension: &str, name: &str) -> Result<Keyword> {
    let state = self.read()?;
    let dim = lock::read(state.dimension(dimension)?, "dimension")?;
    dim.keywords.get(name).cloned().ok_or_else(|| {
      tagbook_core::Error::KeywordNotFound {
        dimension: dimension.to_owned(),
        keyword:   name.to_owned(),
      }
      .into()
    })
  }

  fn list_active(&self, dimension: &str) -> Result<Vec<String>> {
    let state = self.read()?;
    let dim = lock::read(state.dimension(dimension)?, "dimension")?;
    Ok(dim.keywords.list_active())
  }

  fn active_keywords(&self, dimension: &str) -> Result<Vec<Keyword>> {
    let state = self.read()?;
    let dim = lock::read(state.dimension(dimension)?, "dimension")?;
    Ok(dim.keywords.active().cloned().collect())
  }

  // ── Entities ──────────────────────────────────────────────────────────────

  fn create_entity(
    &self,
    id: &EntityId,
    initial: &BTreeMap<String, String>,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<EntityView> {
    let mut guard = self.write()?;
    let state = &mut *guard;

    if state.entities.contains(id) {
      debug!(entity = %id, "entity already exists; create ignored");
      return state.view(state.entities.get(id)?);
    }

    for dimension in initial.keys() {
      if !state.dimensions.contains_key(dimension) {
        debug!(entity = %id, dimension = %dimension, "initial value for unknown dimension ignored");
      }
    }

    // Build every log before touching the entity map so a failure leaves
    // nothing behind.
    let mut logs = BTreeMap::new();
    for (name, dim) in &state.dimensions {
      let dim = lock::read(dim, "dimension")?;
      let record = match initial.get(name) {
        Some(kw) => match dim.keywords.get_active(kw) {
          Some(keyword) => Record::keyword(&keyword.name, author, at),
          None => {
            debug!(entity = %id, dimension = %name, keyword = %kw, "unusable initial keyword treated as absent");
            Record::absent(author, at)
          }
        },
        None => Record::absent(author, at),
      };
      logs.insert(name.clone(), HistoryLog::seeded(record));
    }

    let entity = Entity { id: id.clone(), created_by: author.to_owned(), created_at: at };
    state.entities.insert(entity, logs);

    info!(entity = %id, "entity created");
    state.view(state.entities.get(id)?)
  }

  fn list_entities(&self) -> Result<Vec<Entity>> {
    let state = self.read()?;
    Ok(state.entities.iter().map(|slot| slot.entity.clone()).collect())
  }

  fn assign(
    &self,
    id: &EntityId,
    dimension: &str,
    keyword: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<Record> {
    let state = self.read()?;
    state.entities.get(id)?;

    let record = {
      let dim = lock::read(state.dimension(dimension)?, "dimension")?;
      let kw = dim.keywords.get(keyword).ok_or_else(|| {
        tagbook_core::Error::KeywordNotFound {
          dimension: dimension.to_owned(),
          keyword:   keyword.to_owned(),
        }
      })?;
      if kw.is_active() {
        Record::keyword(keyword, author, at)
      } else {
        debug!(entity = %id, dimension, keyword, "deprecated keyword assigned as absence");
        Record::absent(author, at)
      }
    };

    let len = state.entities.append(id, dimension, record.clone())?;
    debug!(entity = %id, dimension, records = len, "record appended");
    Ok(record)
  }

  fn unassign(
    &self,
    id: &EntityId,
    dimension: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<Record> {
    let state = self.read()?;
    let record = Record::absent(author, at);
    let len = state.entities.append(id, dimension, record.clone())?;

    debug!(entity = %id, dimension, records = len, "absence appended");
    Ok(record)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  fn current_value(&self, id: &EntityId, dimension: &str) -> Result<Option<Keyword>> {
    let state = self.read()?;
    let slot = state.entities.get(id)?;
    state.resolve(slot, dimension)
  }

  fn current_values(&self, id: &EntityId) -> Result<EntityView> {
    let state = self.read()?;
    state.view(state.entities.get(id)?)
  }

  fn all_current_values(&self) -> Result<Vec<EntityView>> {
    let state = self.read()?;
    state.entities.iter().map(|slot| state.view(slot)).collect()
  }

  fn full_history(&self, id: &EntityId, dimension: &str) -> Result<Vec<Record>> {
    let state = self.read()?;
    let slot = state.entities.get(id)?;
    Ok(slot.log(dimension)?.records().to_vec())
  }

  fn entity_history(&self, id: &EntityId) -> Result<EntityHistory> {
    let state = self.read()?;
    state.history(state.entities.get(id)?)
  }

  fn all_histories(&self) -> Result<Vec<EntityHistory>> {
    let state = self.read()?;
    state.entities.iter().map(|slot| state.history(slot)).collect()
  }
}
