//! Keywords and the per-dimension vocabulary registry.
//!
//! A keyword is never removed once created. Soft deletion flips its
//! `deprecated` flag; history that points at the keyword is untouched and
//! resolution re-reads the flag on every read.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vocabulary term within one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
  pub name:       String,
  pub created_by: String,
  pub created_at: DateTime<Utc>,
  pub deprecated: bool,
}

impl Keyword {
  pub fn is_active(&self) -> bool { !self.deprecated }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// The controlled vocabulary of a single dimension, keyed by keyword name.
///
/// Iteration order is the lexicographic order of keyword names.
#[derive(Debug, Clone, Default)]
pub struct KeywordRegistry {
  keywords: BTreeMap<String, Keyword>,
}

impl KeywordRegistry {
  pub fn new() -> Self { Self::default() }

  /// Create `name`, or clear its `deprecated` flag if it already exists.
  ///
  /// Creation metadata of an existing keyword is never overwritten.
  pub fn create_or_undeprecate(
    &mut self,
    name: &str,
    author: &str,
    at: DateTime<Utc>,
  ) -> &Keyword {
    let keyword = self
      .keywords
      .entry(name.to_owned())
      .or_insert_with(|| Keyword {
        name:       name.to_owned(),
        created_by: author.to_owned(),
        created_at: at,
        deprecated: false,
      });
    keyword.deprecated = false;
    keyword
  }

  /// Mark `name` deprecated. Returns `false` when no such keyword exists.
  pub fn deprecate(&mut self, name: &str) -> bool {
    match self.keywords.get_mut(name) {
      Some(keyword) => {
        keyword.deprecated = true;
        true
      }
      None => false,
    }
  }

  pub fn get(&self, name: &str) -> Option<&Keyword> { self.keywords.get(name) }

  /// Look up `name` and return it only while it is active.
  pub fn get_active(&self, name: &str) -> Option<&Keyword> {
    self.get(name).filter(|k| k.is_active())
  }

  /// Names of all active keywords, sorted.
  pub fn list_active(&self) -> Vec<String> {
    self.active().map(|k| k.name.clone()).collect()
  }

  /// All active keywords, sorted by name.
  pub fn active(&self) -> impl Iterator<Item = &Keyword> {
    self.keywords.values().filter(|k| k.is_active())
  }

  pub fn len(&self) -> usize { self.keywords.len() }

  pub fn is_empty(&self) -> bool { self.keywords.is_empty() }
}
