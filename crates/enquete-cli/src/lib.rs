//! CLI library components for the enquete importer.

pub mod logging;
pub mod summary;
