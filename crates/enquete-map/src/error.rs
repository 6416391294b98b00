//! Error types for header lookup and mapping resolution.

use thiserror::Error;

/// A declared header is absent from the sheet's header row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("header '{0}' not found in header row")]
    Missing(String),

    /// Every header a mapping needs that the sheet lacks.
    #[error("headers not found in header row: {}", format_headers(.headers))]
    NotFound { headers: Vec<String> },
}

fn format_headers(headers: &[String]) -> String {
    headers
        .iter()
        .map(|header| format!("'{header}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// No catalog could be resolved for an import job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error(
        "no mapping catalog for {corporation}.{facility}: no selected, facility, corporation or root default catalog"
    )]
    NoCatalog {
        corporation: String,
        facility: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_every_header() {
        let err = HeaderError::NotFound {
            headers: vec!["氏名".to_string(), "年齢".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "headers not found in header row: '氏名', '年齢'"
        );
    }
}
