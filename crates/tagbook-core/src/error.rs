//! Error types for `tagbook-core`.

use thiserror::Error;

use crate::entity::EntityId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("dimension not found: {0}")]
  DimensionNotFound(String),

  #[error("entity not found: {0}")]
  EntityNotFound(EntityId),

  #[error("keyword not found: {dimension}/{keyword}")]
  KeywordNotFound { dimension: String, keyword: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse error category shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A dimension, entity or keyword referenced by name does not exist.
  NotFound,
  /// A fault inside the backend itself.
  Internal,
}

/// Lets callers tell domain misses apart from backend faults without knowing
/// the concrete backend error type.
pub trait Classify {
  fn kind(&self) -> ErrorKind;

  fn is_not_found(&self) -> bool { self.kind() == ErrorKind::NotFound }
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind { ErrorKind::NotFound }
}
