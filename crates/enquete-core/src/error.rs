//! Error types for selection and facility imports.

use enquete_db::SinkError;
use enquete_ingest::SheetError;
use enquete_map::{HeaderError, MappingError};
use enquete_transform::RowError;
use thiserror::Error;

/// Command-line selectors that name nothing in the configuration. Fatal
/// before any facility runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown corporation(s): {}", .0.join(", "))]
    UnknownCorporations(Vec<String>),

    #[error("unknown facility filter(s): {}", .0.join(", "))]
    UnknownFacilities(Vec<String>),
}

/// Failure of one facility import. Other facilities still run.
#[derive(Debug, Error)]
pub enum FacilityError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Header(#[from] HeaderError),

    /// A row failed coercion under the abort-facility policy.
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: RowError,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl FacilityError {
    /// Coarse error kind, as shown in the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "configuration",
            Self::Header(_) => "header not found",
            Self::Row {
                source: RowError::Header(_),
                ..
            } => "header not found",
            Self::Row { .. } => "type coercion",
            Self::Sheet(_) | Self::Sink(_) => "external I/O",
        }
    }
}

#[cfg(test)]
mod tests {
    use enquete_model::ValueType;
    use enquete_transform::CoercionError;

    use super::*;

    #[test]
    fn test_row_error_display_names_row_and_column() {
        let err = FacilityError::Row {
            row: 3,
            source: RowError::Coercion(CoercionError {
                column: "age".to_string(),
                header: "年齢".to_string(),
                value: "abc".to_string(),
                value_type: ValueType::Integer,
            }),
        };
        assert_eq!(
            err.to_string(),
            "row 3: column 'age' (header '年齢'): cell is not a valid integer"
        );
        assert_eq!(err.kind(), "type coercion");
    }

    #[test]
    fn test_selection_error_display() {
        let err = SelectionError::UnknownFacilities(vec!["acme.nagoya".to_string(), "sendai".to_string()]);
        assert_eq!(err.to_string(), "unknown facility filter(s): acme.nagoya, sendai");
    }
}
