//! Poison-aware lock acquisition.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Error, Result};

pub(crate) fn read<'a, T>(
  lock: &'a RwLock<T>,
  what: &'static str,
) -> Result<RwLockReadGuard<'a, T>> {
  lock.read().map_err(|_| Error::Poisoned(what))
}

pub(crate) fn write<'a, T>(
  lock: &'a RwLock<T>,
  what: &'static str,
) -> Result<RwLockWriteGuard<'a, T>> {
  lock.write().map_err(|_| Error::Poisoned(what))
}
