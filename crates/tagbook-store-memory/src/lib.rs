//! In-memory backend for the tagbook attribute store.
//!
//! Every dimension's vocabulary and every (entity, dimension) log sits behind
//! its own lock. A store-wide lock above them is taken exclusively only by
//! structural operations, which fan out across all entities.

mod entities;
mod lock;
mod store;

pub mod error;

pub use entities::{EntitySlot, EntityStore};
pub use error::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
