//! Catalog resolution, worksheet selection and header lookup.

#![deny(unsafe_code)]

mod error;
mod header;
mod resolver;
mod worksheet;

pub use error::{HeaderError, MappingError};
pub use header::{HeaderIndex, find_column_index};
pub use resolver::{BoundField, CatalogSource, MappingResolver, ResolvedMapping};
pub use worksheet::{WorksheetSelection, select_worksheet};
