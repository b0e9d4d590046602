//! Behavioural tests for `MemoryStore`.

use std::{collections::BTreeMap, sync::Barrier, thread};

use chrono::{DateTime, TimeZone, Utc};
use tagbook_core::{
  Classify,
  entity::EntityId,
  seed::Seed,
  store::TagStore,
};

use crate::{Error, MemoryStore};

fn t(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

fn id(s: &str) -> EntityId { EntityId::from(s) }

/// Character {Batman, Doctor} and Mood {Gloomy, Gory}; no entities.
fn store() -> MemoryStore {
  let s = MemoryStore::new();
  for (dim, words) in [("Character", ["Batman", "Doctor"]), ("Mood", ["Gloomy", "Gory"])] {
    s.create_dimension(dim, "root", t(0)).unwrap();
    for w in words {
      s.create_keyword(dim, w, "root", t(0)).unwrap();
    }
  }
  s
}

fn create(s: &MemoryStore, name: &str) -> EntityId {
  let eid = id(name);
  s.create_entity(&eid, &BTreeMap::new(), "alice", t(1)).unwrap();
  eid
}

fn current(s: &MemoryStore, eid: &EntityId, dim: &str) -> Option<String> {
  s.current_value(eid, dim).unwrap().map(|k| k.name)
}

// ─── Vocabulary ──────────────────────────────────────────────────────────────

#[test]
fn create_keyword_is_idempotent() {
  let s = store();
  let first = s.get_keyword("Character", "Batman").unwrap();
  let again = s.create_keyword("Character", "Batman", "bob", t(50)).unwrap();

  assert_eq!(first, again);
  assert_eq!(again.created_by, "root");
  assert_eq!(s.list_active("Character").unwrap(), ["Batman", "Doctor"]);
}

#[test]
fn deprecated_keyword_hidden_from_active_but_gettable() {
  let s = store();
  assert!(s.delete_keyword("Mood", "Gory").unwrap());

  assert_eq!(s.list_active("Mood").unwrap(), ["Gloomy"]);
  let names: Vec<_> =
    s.active_keywords("Mood").unwrap().into_iter().map(|k| k.name).collect();
  assert_eq!(names, ["Gloomy"]);
  assert!(s.get_keyword("Mood", "Gory").unwrap().deprecated);
}

#[test]
fn delete_unknown_keyword_is_silent() {
  let s = store();
  assert!(!s.delete_keyword("Mood", "Cheerful").unwrap());
}

#[test]
fn vocabulary_ops_on_unknown_dimension_are_not_found() {
  let s = store();
  assert!(s.delete_keyword("Weather", "Rain").unwrap_err().is_not_found());
  assert!(s.create_keyword("Weather", "Rain", "a", t(1)).unwrap_err().is_not_found());
  assert!(s.list_active("Weather").unwrap_err().is_not_found());
  assert!(s.get_keyword("Mood", "Rain").unwrap_err().is_not_found());
}

// ─── Entity creation ─────────────────────────────────────────────────────────

#[test]
fn new_entity_has_seeded_log_per_dimension() {
  let s = store();
  let img = create(&s, "img1");

  for dim in ["Character", "Mood"] {
    let history = s.full_history(&img, dim).unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].is_absent());
    assert_eq!(history[0].author, "alice");
    assert_eq!(history[0].recorded_at, t(1));
  }
}

#[test]
fn create_entity_with_initial_assignments() {
  let s = store();
  s.delete_keyword("Mood", "Gory").unwrap();

  let initial = BTreeMap::from([
    ("Character".to_owned(), "Batman".to_owned()),
    ("Mood".to_owned(), "Gory".to_owned()),
    ("Weather".to_owned(), "Rain".to_owned()),
  ]);
  let view = s.create_entity(&id("img1"), &initial, "alice", t(1)).unwrap();

  assert_eq!(view.values.len(), 2);
  assert_eq!(view.values["Character"].as_ref().unwrap().name, "Batman");
  // deprecated keyword at creation time seeds absence, not a dangling ref
  assert!(view.values["Mood"].is_none());
  assert!(s.full_history(&id("img1"), "Mood").unwrap()[0].is_absent());
  // unknown dimension silently ignored
  assert!(s.full_history(&id("img1"), "Weather").unwrap_err().is_not_found());
}

#[test]
fn unknown_initial_keyword_is_absent() {
  let s = store();
  let initial = BTreeMap::from([("Character".to_owned(), "Joker".to_owned())]);
  let view = s.create_entity(&id("img1"), &initial, "alice", t(1)).unwrap();
  assert!(view.values["Character"].is_none());
}

#[test]
fn recreating_entity_keeps_history() {
  let s = store();
  let img = create(&s, "img1");
  s.assign(&img, "Character", "Batman", "alice", t(2)).unwrap();

  let view = s
    .create_entity(&img, &BTreeMap::new(), "bob", t(3))
    .unwrap();
  assert_eq!(view.entity.created_by, "alice");
  assert_eq!(view.values["Character"].as_ref().unwrap().name, "Batman");
  assert_eq!(s.full_history(&img, "Character").unwrap().len(), 2);
  assert_eq!(s.list_entities().unwrap().len(), 1);
}

// ─── Assignment & resolution ─────────────────────────────────────────────────

#[test]
fn assign_then_resolve() {
  let s = store();
  let img = create(&s, "img1");

  let record = s.assign(&img, "Character", "Batman", "bob", t(2)).unwrap();
  assert_eq!(record.keyword.as_deref(), Some("Batman"));
  assert_eq!(current(&s, &img, "Character").as_deref(), Some("Batman"));
  assert_eq!(current(&s, &img, "Mood"), None);
}

#[test]
fn repeated_assignment_appends_every_time() {
  let s = store();
  let img = create(&s, "img1");
  s.assign(&img, "Mood", "Gloomy", "bob", t(2)).unwrap();
  s.assign(&img, "Mood", "Gloomy", "bob", t(3)).unwrap();

  let history = s.full_history(&img, "Mood").unwrap();
  assert_eq!(history.len(), 3);
  assert_eq!(history[1].recorded_at, t(2));
  assert_eq!(history[2].recorded_at, t(3));
}

#[test]
fn assign_deprecated_keyword_appends_absence() {
  let s = store();
  let img = create(&s, "img1");
  s.assign(&img, "Character", "Doctor", "bob", t(2)).unwrap();
  s.delete_keyword("Character", "Batman").unwrap();

  let record = s.assign(&img, "Character", "Batman", "bob", t(3)).unwrap();
  assert!(record.is_absent());
  assert_eq!(current(&s, &img, "Character"), None);

  // Undeprecating later must not resurrect the coerced write.
  s.create_keyword("Character", "Batman", "root", t(4)).unwrap();
  assert_eq!(current(&s, &img, "Character"), None);
}

#[test]
fn assign_errors_are_not_found() {
  let s = store();
  let img = create(&s, "img1");

  let e = s.assign(&id("nope"), "Mood", "Gory", "a", t(2)).unwrap_err();
  assert!(matches!(e, Error::Core(tagbook_core::Error::EntityNotFound(_))));

  let e = s.assign(&img, "Weather", "Rain", "a", t(2)).unwrap_err();
  assert!(matches!(e, Error::Core(tagbook_core::Error::DimensionNotFound(_))));

  let e = s.assign(&img, "Mood", "Cheerful", "a", t(2)).unwrap_err();
  assert!(matches!(e, Error::Core(tagbook_core::Error::KeywordNotFound { .. })));

  // nothing was appended by the failed writes
  assert_eq!(s.full_history(&img, "Mood").unwrap().len(), 1);
}

#[test]
fn unassign_restores_seed_state() {
  let s = store();
  let img = create(&s, "img1");
  s.assign(&img, "Mood", "Gory", "bob", t(2)).unwrap();
  s.unassign(&img, "Mood", "bob", t(3)).unwrap();

  assert_eq!(current(&s, &img, "Mood"), None);
  let history = s.full_history(&img, "Mood").unwrap();
  assert_eq!(history.len(), 3);
  assert!(history[2].is_absent());

  assert!(s.unassign(&img, "Weather", "bob", t(4)).unwrap_err().is_not_found());
  assert!(s.unassign(&id("nope"), "Mood", "bob", t(4)).unwrap_err().is_not_found());
}

#[test]
fn deprecation_blanks_every_holder_without_appending() {
  let s = store();
  let x = create(&s, "x");
  let y = create(&s, "y");
  s.assign(&x, "Mood", "Gory", "a", t(2)).unwrap();
  s.assign(&y, "Mood", "Gory", "a", t(2)).unwrap();

  s.delete_keyword("Mood", "Gory").unwrap();
  assert_eq!(current(&s, &x, "Mood"), None);
  assert_eq!(current(&s, &y, "Mood"), None);
  assert_eq!(s.full_history(&x, "Mood").unwrap().len(), 2);
  assert_eq!(s.full_history(&y, "Mood").unwrap().len(), 2);
  // the audit trail still names the keyword
  assert_eq!(
    s.full_history(&x, "Mood").unwrap()[1].keyword.as_deref(),
    Some("Gory")
  );

  s.create_keyword("Mood", "Gory", "root", t(3)).unwrap();
  assert_eq!(current(&s, &x, "Mood").as_deref(), Some("Gory"));
  assert_eq!(current(&s, &y, "Mood").as_deref(), Some("Gory"));
  assert_eq!(s.full_history(&y, "Mood").unwrap().len(), 2);
}

#[test]
fn undeprecate_only_restores_where_still_latest() {
  let s = store();
  let x = create(&s, "x");
  s.assign(&x, "Mood", "Gory", "a", t(2)).unwrap();
  s.assign(&x, "Mood", "Gloomy", "a", t(3)).unwrap();
  s.delete_keyword("Mood", "Gory").unwrap();
  s.create_keyword("Mood", "Gory", "root", t(4)).unwrap();

  assert_eq!(current(&s, &x, "Mood").as_deref(), Some("Gloomy"));
}

#[test]
fn batman_scenario() {
  let s = store();
  let img = create(&s, "img1");

  s.assign(&img, "Character", "Batman", "alice", t(2)).unwrap();
  s.delete_keyword("Character", "Batman").unwrap();
  assert_eq!(current(&s, &img, "Character"), None);

  s.create_keyword("Character", "Batman", "root", t(3)).unwrap();
  assert_eq!(current(&s, &img, "Character").as_deref(), Some("Batman"));
}

#[test]
fn current_values_resolves_every_dimension() {
  let s = store();
  let img = create(&s, "img1");
  s.assign(&img, "Character", "Doctor", "a", t(2)).unwrap();

  let view = s.current_values(&img).unwrap();
  assert_eq!(view.entity.id, img);
  let keys: Vec<_> = view.values.keys().map(String::as_str).collect();
  assert_eq!(keys, ["Character", "Mood"]);
  assert_eq!(view.values["Character"].as_ref().unwrap().name, "Doctor");
  assert!(view.values["Mood"].is_none());

  assert!(s.current_values(&id("nope")).unwrap_err().is_not_found());
}

// ─── Structural fan-out ──────────────────────────────────────────────────────

#[test]
fn create_dimension_fans_out_to_existing_entities() {
  let s = store();
  let a = create(&s, "A");
  let b = create(&s, "B");

  let info = s.create_dimension("Mood2", "root", t(10)).unwrap();
  assert_eq!(info.name, "Mood2");

  for e in [&a, &b] {
    let history = s.full_history(e, "Mood2").unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].is_absent());
    assert_eq!(history[0].recorded_at, t(10));
  }
  assert!(s.list_active("Mood2").unwrap().is_empty());
}

#[test]
fn create_dimension_is_idempotent() {
  let s = store();
  let a = create(&s, "A");
  s.assign(&a, "Mood", "Gory", "x", t(2)).unwrap();

  let info = s.create_dimension("Mood", "other", t(99)).unwrap();
  assert_eq!(info.created_by, "root");
  assert_eq!(s.full_history(&a, "Mood").unwrap().len(), 2);
  assert_eq!(s.list_active("Mood").unwrap(), ["Gloomy", "Gory"]);
}

#[test]
fn entity_created_after_dimension_gets_it() {
  let s = store();
  s.create_dimension("Theme", "root", t(5)).unwrap();
  let late = create(&s, "late");
  assert_eq!(s.full_history(&late, "Theme").unwrap().len(), 1);
}

#[test]
fn delete_dimension_purges_history_and_recreate_is_fresh() {
  let s = store();
  let a = create(&s, "A");
  let b = create(&s, "B");
  s.create_dimension("Mood2", "root", t(10)).unwrap();
  s.create_keyword("Mood2", "Tense", "root", t(10)).unwrap();
  s.assign(&a, "Mood2", "Tense", "x", t(11)).unwrap();

  assert!(s.delete_dimension("Mood2").unwrap());
  for e in [&a, &b] {
    assert!(s.full_history(e, "Mood2").unwrap_err().is_not_found());
    assert!(!s.current_values(e).unwrap().values.contains_key("Mood2"));
  }
  assert!(s.list_active("Mood2").unwrap_err().is_not_found());

  s.create_dimension("Mood2", "root", t(20)).unwrap();
  assert!(s.list_active("Mood2").unwrap().is_empty());
  assert!(s.get_keyword("Mood2", "Tense").unwrap_err().is_not_found());
  let history = s.full_history(&a, "Mood2").unwrap();
  assert_eq!(history.len(), 1);
  assert!(history[0].is_absent());
  assert_eq!(history[0].recorded_at, t(20));
}

#[test]
fn delete_unknown_dimension_reports_false() {
  let s = store();
  assert!(!s.delete_dimension("Weather").unwrap());
  let names: Vec<_> =
    s.list_dimensions().unwrap().into_iter().map(|d| d.name).collect();
  assert_eq!(names, ["Character", "Mood"]);
}

// ─── Bulk reads ──────────────────────────────────────────────────────────────

#[test]
fn bulk_reads_cover_every_entity() {
  let s = store();
  let a = create(&s, "A");
  create(&s, "B");
  s.assign(&a, "Character", "Batman", "x", t(2)).unwrap();

  let views = s.all_current_values().unwrap();
  assert_eq!(views.len(), 2);
  assert_eq!(views[0].entity.id, a);
  assert!(views[1].values["Character"].is_none());

  let histories = s.all_histories().unwrap();
  assert_eq!(histories.len(), 2);
  assert_eq!(histories[0].history["Character"].len(), 2);

  let one = s.entity_history(&a).unwrap();
  assert_eq!(one.history.len(), 2);
  assert!(s.entity_history(&id("nope")).unwrap_err().is_not_found());
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[test]
fn starter_seed_loads() {
  let s = MemoryStore::from_seed(&Seed::starter(), "<seed>", t(0)).unwrap();

  assert_eq!(s.list_dimensions().unwrap().len(), 5);
  let a = id("00000000aaaaaaaa");
  assert_eq!(current(&s, &a, "Character").as_deref(), Some("Batman"));
  assert_eq!(current(&s, &a, "Theme").as_deref(), Some("Love"));
  assert_eq!(s.full_history(&a, "Theme").unwrap().len(), 2);
  assert!(
    s.current_values(&id("00000000bbbbbbbb"))
      .unwrap()
      .values
      .values()
      .all(Option::is_none)
  );
}

#[test]
fn seed_with_unknown_keyword_fails() {
  use tagbook_core::seed::{SeedAssignment, SeedDimension, SeedImage};

  let seed = Seed {
    dimensions: vec![SeedDimension {
      name:     "Mood".to_owned(),
      keywords: vec!["Gory".to_owned()],
    }],
    images:     vec![SeedImage {
      id:          id("img1"),
      initial:     Vec::new(),
      assignments: vec![SeedAssignment {
        dimension: "Mood".to_owned(),
        keyword:   "Gloomy".to_owned(),
      }],
    }],
  };
  let err = MemoryStore::from_seed(&seed, "<seed>", t(0)).unwrap_err();
  assert!(err.is_not_found());
}

// ─── Entity store primitives ─────────────────────────────────────────────────

#[test]
fn entity_store_primitives() {
  use tagbook_core::{entity::Entity, history::Record};

  use crate::EntityStore;

  let mut es = EntityStore::default();
  let e = Entity { id: id("e"), created_by: "a".into(), created_at: t(0) };
  es.insert(e, BTreeMap::new());

  assert!(es.ensure_dimension(&id("e"), "Mood", "a", t(1)).unwrap());
  assert!(!es.ensure_dimension(&id("e"), "Mood", "b", t(2)).unwrap());
  assert!(es.ensure_dimension(&id("x"), "Mood", "a", t(1)).unwrap_err().is_not_found());

  assert_eq!(es.append(&id("e"), "Mood", Record::keyword("Gory", "a", t(3))).unwrap(), 2);
  assert!(es.append(&id("e"), "Theme", Record::absent("a", t(3))).is_err());

  assert_eq!(es.ensure_dimension_all("Theme", "a", t(4)), 1);
  assert_eq!(es.purge_dimension("Mood"), 1);
  assert_eq!(es.purge_dimension("Mood"), 0);
  let slot = es.get(&id("e")).unwrap();
  assert!(!slot.has_log("Mood"));
  assert!(slot.has_log("Theme"));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[test]
fn fan_out_races_with_entity_creation() {
  let s = store();
  let barrier = Barrier::new(9);

  thread::scope(|scope| {
    for n in 0..8 {
      let s = s.clone();
      let barrier = &barrier;
      scope.spawn(move || {
        barrier.wait();
        for i in 0..25 {
          let eid = id(&format!("e{n}-{i}"));
          s.create_entity(&eid, &BTreeMap::new(), "w", t(1)).unwrap();
        }
      });
    }
    let s = s.clone();
    let barrier = &barrier;
    scope.spawn(move || {
      barrier.wait();
      s.create_dimension("Mood2", "root", t(2)).unwrap();
    });
  });

  let entities = s.list_entities().unwrap();
  assert_eq!(entities.len(), 200);
  for e in entities {
    let history = s.full_history(&e.id, "Mood2").unwrap();
    assert_eq!(history.len(), 1, "entity {} has {} seed records", e.id, history.len());
  }
}

#[test]
fn concurrent_appends_to_one_log_are_all_kept() {
  let s = store();
  let img = create(&s, "img1");

  thread::scope(|scope| {
    for n in 0..4 {
      let s = s.clone();
      let img = img.clone();
      scope.spawn(move || {
        let word = if n % 2 == 0 { "Gory" } else { "Gloomy" };
        for i in 0..50 {
          s.assign(&img, "Mood", word, "w", t(i)).unwrap();
        }
      });
    }
  });

  assert_eq!(s.full_history(&img, "Mood").unwrap().len(), 201);
}

#[test]
fn bulk_reads_never_see_partial_fan_out() {
  let s = store();
  for n in 0..150 {
    create(&s, &format!("img{n}"));
  }

  thread::scope(|scope| {
    let writer = s.clone();
    scope.spawn(move || {
      for i in 0..30 {
        writer.create_dimension("Weather", "root", t(i)).unwrap();
        writer.delete_dimension("Weather").unwrap();
      }
    });

    let reader = s.clone();
    scope.spawn(move || {
      for _ in 0..100 {
        let views = reader.all_current_values().unwrap();
        let with = views.iter().filter(|v| v.values.contains_key("Weather")).count();
        assert!(with == 0 || with == views.len(), "{with} of {} views", views.len());

        let histories = reader.all_histories().unwrap();
        let with = histories.iter().filter(|h| h.history.contains_key("Weather")).count();
        assert!(with == 0 || with == histories.len(), "{with} of {} histories", histories.len());
      }
    });
  });

  assert!(s.all_current_values().unwrap().iter().all(|v| !v.values.contains_key("Weather")));
}

#[test]
fn delete_dimension_races_with_assign() {
  let s = store();
  let img = create(&s, "img1");
  let barrier = Barrier::new(2);

  thread::scope(|scope| {
    let writer = s.clone();
    let barrier = &barrier;
    scope.spawn(move || {
      barrier.wait();
      assert!(writer.delete_dimension("Mood").unwrap());
    });

    let s = s.clone();
    let img = img.clone();
    scope.spawn(move || {
      barrier.wait();
      for i in 0..100 {
        if let Err(err) = s.assign(&img, "Mood", "Gory", "w", t(i)) {
          assert!(err.is_not_found(), "unexpected error: {err}");
        }
      }
    });
  });

  assert!(s.full_history(&img, "Mood").unwrap_err().is_not_found());
  assert!(!s.current_values(&img).unwrap().values.contains_key("Mood"));

  s.create_dimension("Mood", "root", t(200)).unwrap();
  assert_eq!(s.full_history(&img, "Mood").unwrap().len(), 1);
}
