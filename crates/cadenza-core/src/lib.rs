//! Core domain model for cadenza.
//!
//! This crate defines the composer/composition model, the key signature and
//! format taxonomies with their display-name registry, the SQLite schema,
//! and the [`Catalog`] service that resolves composers and performs
//! transactional writes.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod registry;
pub mod schema;
pub mod taxonomy;

pub use catalog::Catalog;
pub use error::{Error, Result};
