//! Seed data — the vocabulary and images a fresh store starts with.
//!
//! Deserialised from the `[seed]` table of the server configuration; when
//! absent, [`Seed::starter`] is used.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{entity::EntityId, store::TagStore};

/// Dimensions with their initial vocabulary plus any pre-tagged images.
///
/// Names are carried as values rather than table keys so that configuration
/// loaders that normalise key case cannot alter them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
  #[serde(default)]
  pub dimensions: Vec<SeedDimension>,
  #[serde(default)]
  pub images:     Vec<SeedImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDimension {
  pub name:     String,
  #[serde(default)]
  pub keywords: Vec<String>,
}

/// An image created at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedImage {
  pub id:          EntityId,
  /// Values applied at creation, with the same leniency as any other
  /// entity creation.
  #[serde(default)]
  pub initial:     Vec<SeedAssignment>,
  /// Further assignments appended in order after creation.
  #[serde(default)]
  pub assignments: Vec<SeedAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAssignment {
  pub dimension: String,
  pub keyword:   String,
}

impl SeedAssignment {
  fn new(dimension: &str, keyword: &str) -> Self {
    Self { dimension: dimension.to_owned(), keyword: keyword.to_owned() }
  }
}

impl Seed {
  /// The stock vocabulary: five dimensions and two demo images.
  pub fn starter() -> Self {
    let vocab: [(&str, &[&str]); 5] = [
      ("Character", &["Batman", "Kurt Cobain", "Teacher", "Doctor"]),
      ("Subject", &["Military", "Climate Change", "Food", "Queen Mary", "Gaming"]),
      ("Setting", &["Kitchen", "Hospital", "Desert", "Barn", "College", "Stalingrad"]),
      ("Theme", &["Growing up", "Underdog", "Transformation", "Love", "Adventure"]),
      ("Mood", &["Gory", "Thrilling", "Gloomy", "Ecstatic", "Melancholy", "Patriotic"]),
    ];

    let dimensions = vocab
      .iter()
      .map(|(name, words)| SeedDimension {
        name:     name.to_string(),
        keywords: words.iter().map(|w| w.to_string()).collect(),
      })
      .collect();

    let images = vec![
      SeedImage {
        id:          EntityId::from("00000000aaaaaaaa"),
        initial:     vec![
          SeedAssignment::new("Character", "Batman"),
          SeedAssignment::new("Theme", "Adventure"),
        ],
        assignments: vec![SeedAssignment::new("Theme", "Love")],
      },
      SeedImage {
        id:          EntityId::from("00000000bbbbbbbb"),
        initial:     Vec::new(),
        assignments: Vec::new(),
      },
    ];

    Self { dimensions, images }
  }

  /// Load this seed into `store`, stamping every record with `author`/`at`.
  ///
  /// An assignment naming an unknown keyword is reported as `NotFound`.
  pub fn apply<S: TagStore>(
    &self,
    store: &S,
    author: &str,
    at: DateTime<Utc>,
  ) -> Result<(), S::Error> {
    for dimension in &self.dimensions {
      store.create_dimension(&dimension.name, author, at)?;
      for keyword in &dimension.keywords {
        store.create_keyword(&dimension.name, keyword, author, at)?;
      }
    }

    for image in &self.images {
      let initial: BTreeMap<String, String> = image
        .initial
        .iter()
        .map(|a| (a.dimension.clone(), a.keyword.clone()))
        .collect();
      store.create_entity(&image.id, &initial, author, at)?;
      for a in &image.assignments {
        store.assign(&image.id, &a.dimension, &a.keyword, author, at)?;
      }
    }

    Ok(())
  }
}
