use thiserror::Error;

use crate::value::ValueType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid column name '{0}'")]
    InvalidColumnName(String),

    #[error("invalid table name '{0}'")]
    InvalidTableName(String),

    /// A column key may only have one declared type within a catalog.
    #[error(
        "column '{column}' in catalog '{catalog}' is declared as both {first} and {second}"
    )]
    DuplicateColumn {
        catalog: String,
        column: String,
        first: ValueType,
        second: ValueType,
    },

    #[error("column '{column}' in catalog '{catalog}' is generated by the importer")]
    ReservedColumn { catalog: String, column: String },

    #[error("invalid clamp range [{min}, {max}]")]
    InvalidRange { min: i64, max: i64 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
