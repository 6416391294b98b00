//! Error types for writing records.

use thiserror::Error;

/// Errors from a record sink. All of them are scoped to the facility
/// being written.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Connection to the corporation database failed.
    #[error("failed to connect to database of corporation '{corporation}': {source}")]
    Connect {
        corporation: String,
        #[source]
        source: postgres::Error,
    },

    #[error("database error: {0}")]
    Postgres(#[from] postgres::Error),

    /// Column name is not a plain SQL identifier.
    #[error("invalid column name '{0}'")]
    InvalidColumn(String),

    #[error("no columns to insert into table {table}")]
    NoColumns { table: String },

    /// Sink refused the write (used by test doubles).
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SinkError>;
