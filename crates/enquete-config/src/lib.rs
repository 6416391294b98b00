//! YAML configuration loading for the enquete importer.
//!
//! The whole file is validated up front: a structural problem anywhere
//! (missing keys, malformed catalogs, unknown encodings) is returned as a
//! [`ConfigError`] before any facility is processed.

#![deny(unsafe_code)]

mod catalog;
mod error;
mod loader;
mod raw;

pub use error::{ConfigError, Result};
pub use loader::{load_config, parse_config};
