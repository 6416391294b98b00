//! Error types for configuration loading.

use std::path::PathBuf;

use enquete_model::ModelError;
use thiserror::Error;

/// Structural configuration errors. Any of these is fatal to the whole run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid YAML or does not match the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Shape error at a specific location.
    #[error("{path}: failed to parse: {source}")]
    Shape {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no corporations configured")]
    NoCorporations,

    /// Required key absent or empty.
    #[error("{path}: '{key}' is required")]
    MissingKey { path: String, key: &'static str },

    /// Value present but unusable.
    #[error("{path}: {message}")]
    Invalid { path: String, message: String },

    /// Value rejected by the data model (names, duplicate columns).
    #[error("{path}: {source}")]
    Model {
        path: String,
        #[source]
        source: ModelError,
    },
}

impl ConfigError {
    pub(crate) fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn model(path: impl Into<String>, source: ModelError) -> Self {
        Self::Model {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingKey {
            path: "corporations.acme.facilities.tokyo".to_string(),
            key: "facility_code",
        };
        assert_eq!(
            err.to_string(),
            "corporations.acme.facilities.tokyo: 'facility_code' is required"
        );
    }
}
