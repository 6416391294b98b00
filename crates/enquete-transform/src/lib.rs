//! Row coercion for enquete imports.
//!
//! A [`RowCoercer`] turns the raw text cells of one sheet row into a
//! [`TypedRecord`](enquete_model::TypedRecord) following a resolved
//! mapping. Character replacement is an injectable [`CharReplacer`];
//! [`RecordStamp`] adds the importer-generated columns.

#![deny(unsafe_code)]

pub mod charset;
pub mod coercer;
pub mod datetime;
pub mod error;
pub mod generated;
pub mod numeric;
pub mod width;

pub use charset::{CharReplacer, ReplaceFn};
pub use coercer::RowCoercer;
pub use error::{CoercionError, RowError};
pub use generated::RecordStamp;
