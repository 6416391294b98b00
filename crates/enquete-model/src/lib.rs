//! Data model shared by the enquete import crates.
//!
//! Everything here is plain data: corporations, facilities, mapping catalogs
//! and the typed values produced by row coercion. Loading (YAML) lives in
//! `enquete-config`; decision logic lives in `enquete-map` and
//! `enquete-transform`.

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod organization;
pub mod record;
pub mod value;

pub use catalog::{
    ConversionTable, FieldSpec, INTEGER2_CLAMP, IntRange, MappingCatalog, MappingScope,
};
pub use config::{Config, DEFAULT_TIMEZONE, GoogleSettings, TextSettings};
pub use error::{ModelError, Result};
pub use ids::{ColumnName, TableName};
pub use organization::{
    Corporation, DbConfig, Facility, FacilityCode, ImportJobSpec, MappingReference, SpreadsheetRef,
};
pub use record::{
    ENQUETE_KEY_COLUMN, FACILITY_CODE_COLUMN, GENERATED_COLUMNS, IMPORT_DATE_COLUMN, RecordBatch,
    TypedRecord,
};
pub use value::{Value, ValueType};
