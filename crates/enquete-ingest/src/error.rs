//! Error types for reading spreadsheets.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a sheet source. All of them are scoped to the facility
/// being read.
#[derive(Debug, Error)]
pub enum SheetError {
    // === Credentials ===
    /// Service-account key file could not be read.
    #[error("failed to read credentials {path}: {source}")]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Service-account key file is not a valid key.
    #[error("invalid credentials {path}: {source}")]
    CredentialsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Assertion could not be signed with the service-account key.
    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    // === Transport ===
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid request URL: {0}")]
    Url(String),

    // === Content ===
    #[error("worksheet '{worksheet}' not found in spreadsheet {spreadsheet}")]
    WorksheetNotFound {
        spreadsheet: String,
        worksheet: String,
    },

    #[error("spreadsheet {spreadsheet} has no worksheets")]
    NoWorksheets { spreadsheet: String },

    /// Worksheet has no header row.
    #[error("worksheet '{worksheet}' in spreadsheet {spreadsheet} is empty")]
    EmptyWorksheet {
        spreadsheet: String,
        worksheet: String,
    },
}

pub type Result<T> = std::result::Result<T, SheetError>;
