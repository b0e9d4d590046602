//! Read models — computed on every read, never stored.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{entity::Entity, history::Record, keyword::Keyword};

/// Resolved current value per dimension; `None` means absent.
pub type CurrentValues = BTreeMap<String, Option<Keyword>>;

/// An entity with every dimension resolved against live vocabulary state.
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
  pub entity: Entity,
  pub values: CurrentValues,
}

/// An entity with its raw, unresolved history for every dimension.
#[derive(Debug, Clone, Serialize)]
pub struct EntityHistory {
  pub entity:  Entity,
  pub history: BTreeMap<String, Vec<Record>>,
}
