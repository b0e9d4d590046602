//! Core types and trait definitions for the tagbook attribute store.
//!
//! This crate is deliberately free of HTTP and locking concerns. It defines
//! the vocabulary model, the append-only history log, live resolution, and
//! the [`store::TagStore`] trait that backends implement.

pub mod dimension;
pub mod entity;
pub mod error;
pub mod history;
pub mod keyword;
pub mod resolve;
pub mod seed;
pub mod store;
pub mod view;

pub use error::{Classify, Error, ErrorKind, Result};
