//! Records and the append-only history log.
//!
//! A [`HistoryLog`] holds every assignment ever made for one (entity,
//! dimension) pair, in append order. Records are immutable and the log only
//! grows; there is no replace or remove.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable assignment fact: a keyword (by name, within the log's
/// dimension) or absence, plus who made the change and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  /// `None` records the absence of a value.
  pub keyword:     Option<String>,
  pub author:      String,
  pub recorded_at: DateTime<Utc>,
}

impl Record {
  pub fn absent(author: &str, at: DateTime<Utc>) -> Self {
    Self { keyword: None, author: author.to_owned(), recorded_at: at }
  }

  pub fn keyword(name: &str, author: &str, at: DateTime<Utc>) -> Self {
    Self {
      keyword:     Some(name.to_owned()),
      author:      author.to_owned(),
      recorded_at: at,
    }
  }

  pub fn is_absent(&self) -> bool { self.keyword.is_none() }
}

/// Ordered, never-empty sequence of [`Record`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
  records: Vec<Record>,
}

impl HistoryLog {
  /// A log seeded with its first record.
  pub fn seeded(first: Record) -> Self { Self { records: vec![first] } }

  pub fn append(&mut self, record: Record) { self.records.push(record); }

  /// The most recently appended record.
  pub fn latest(&self) -> &Record {
    // Non-empty by construction: the only constructor seeds one record.
    &self.records[self.records.len() - 1]
  }

  pub fn records(&self) -> &[Record] { &self.records }

  /// Never zero.
  #[allow(clippy::len_without_is_empty)]
  pub fn len(&self) -> usize { self.records.len() }
}
