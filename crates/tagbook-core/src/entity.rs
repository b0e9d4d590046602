//! Entity — the thin envelope that tagging history hangs off.
//!
//! An entity holds only identity metadata. Its per-dimension logs are owned
//! by the store backend so that each log can be locked on its own.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-chosen entity identifier (e.g. `00000000aaaaaaaa`).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for EntityId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for EntityId {
  fn from(s: String) -> Self { Self(s) }
}

/// Identity and creation metadata of a tagged entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
  pub id:         EntityId,
  pub created_by: String,
  pub created_at: DateTime<Utc>,
}
