//! Resolution — folding a history log into a current value.
//!
//! Only the latest record matters. If it names a keyword, the keyword's
//! *live* state in the registry decides: a deprecated keyword resolves to
//! absence without touching the log, and undeprecating it restores the value
//! wherever it is still the latest record.

use crate::{
  history::{HistoryLog, Record},
  keyword::{Keyword, KeywordRegistry},
};

/// Resolve a single record against live vocabulary state.
pub fn resolve_record(record: &Record, keywords: &KeywordRegistry) -> Option<Keyword> {
  let name = record.keyword.as_deref()?;
  keywords.get_active(name).cloned()
}

/// The current value of a log: its latest record, resolved.
pub fn current_value(log: &HistoryLog, keywords: &KeywordRegistry) -> Option<Keyword> {
  resolve_record(log.latest(), keywords)
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, TimeZone, Utc};

  use super::*;

  fn t() -> DateTime<Utc> { Utc.timestamp_opt(100, 0).unwrap() }

  fn registry() -> KeywordRegistry {
    let mut reg = KeywordRegistry::new();
    reg.create_or_undeprecate("Batman", "seed", t());
    reg.create_or_undeprecate("Doctor", "seed", t());
    reg
  }

  #[test]
  fn absence_resolves_to_none() {
    let log = HistoryLog::seeded(Record::absent("seed", t()));
    assert!(current_value(&log, &registry()).is_none());
  }

  #[test]
  fn latest_record_wins() {
    let mut log = HistoryLog::seeded(Record::keyword("Doctor", "a", t()));
    log.append(Record::keyword("Batman", "a", t()));
    assert_eq!(current_value(&log, &registry()).unwrap().name, "Batman");

    log.append(Record::absent("a", t()));
    assert!(current_value(&log, &registry()).is_none());
  }

  #[test]
  fn deprecation_is_read_live() {
    let mut reg = registry();
    let log = HistoryLog::seeded(Record::keyword("Batman", "a", t()));

    reg.deprecate("Batman");
    assert!(current_value(&log, &reg).is_none());
    assert_eq!(log.latest().keyword.as_deref(), Some("Batman"));

    reg.create_or_undeprecate("Batman", "b", t());
    assert_eq!(current_value(&log, &reg).unwrap().name, "Batman");
  }

  #[test]
  fn deprecated_earlier_value_does_not_shadow_latest() {
    let mut reg = registry();
    let mut log = HistoryLog::seeded(Record::keyword("Doctor", "a", t()));
    log.append(Record::keyword("Batman", "a", t()));
    reg.deprecate("Doctor");

    assert_eq!(current_value(&log, &reg).unwrap().name, "Batman");
  }

  #[test]
  fn unknown_keyword_resolves_to_none() {
    let log = HistoryLog::seeded(Record::keyword("Ghost", "a", t()));
    assert!(current_value(&log, &registry()).is_none());
  }
}
