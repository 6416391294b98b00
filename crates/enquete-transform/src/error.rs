//! Error types for row coercion.

use enquete_map::HeaderError;
use enquete_model::ValueType;
use thiserror::Error;

/// A cell that could not be converted to its declared type.
///
/// The message leaves the cell value out; it is respondent data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column '{column}' (header '{header}'): cell is not a valid {value_type}")]
pub struct CoercionError {
    pub column: String,
    pub header: String,
    /// Cell text after trimming and conversion.
    pub value: String,
    pub value_type: ValueType,
}

/// Failure to turn one raw row into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

impl RowError {
    /// Destination column the failure belongs to, when known.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Header(_) => None,
            Self::Coercion(err) => Some(&err.column),
        }
    }
}
