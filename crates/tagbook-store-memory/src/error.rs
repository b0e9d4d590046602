//! Error type for `tagbook-store-memory`.

use tagbook_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] tagbook_core::Error),

  /// A thread panicked while holding one of the store's locks.
  #[error("{0} lock poisoned")]
  Poisoned(&'static str),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::Poisoned(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
