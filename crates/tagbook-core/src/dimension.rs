//! Dimension — a named categorical axis that owns its vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keyword::KeywordRegistry;

/// A dimension together with its keyword registry.
#[derive(Debug, Clone)]
pub struct Dimension {
  pub info:     DimensionInfo,
  pub keywords: KeywordRegistry,
}

impl Dimension {
  /// A fresh dimension with an empty vocabulary.
  pub fn new(name: &str, author: &str, at: DateTime<Utc>) -> Self {
    Self {
      info:     DimensionInfo {
        name:       name.to_owned(),
        created_by: author.to_owned(),
        created_at: at,
      },
      keywords: KeywordRegistry::new(),
    }
  }

  pub fn name(&self) -> &str { &self.info.name }
}

/// Identity and creation metadata of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionInfo {
  pub name:       String,
  pub created_by: String,
  pub created_at: DateTime<Utc>,
}
