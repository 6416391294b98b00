//! Literal header lookup.
//!
//! Headers are compared byte for byte: no trimming, no case folding and no
//! width folding. A header written with a trailing space in the sheet only
//! matches a declaration with the same trailing space.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::HeaderError;

/// Position of `declared` in `header_row`.
///
/// Empty header cells never match, and when the same header appears twice
/// the first occurrence wins.
pub fn find_column_index(header_row: &[String], declared: &str) -> Result<usize, HeaderError> {
    if declared.is_empty() {
        return Err(HeaderError::Missing(String::new()));
    }
    header_row
        .iter()
        .position(|cell| cell == declared)
        .ok_or_else(|| HeaderError::Missing(declared.to_string()))
}

/// Header row indexed for repeated lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: BTreeMap<String, usize>,
    width: usize,
}

impl HeaderIndex {
    pub fn new(header_row: &[String]) -> Self {
        let mut positions = BTreeMap::new();
        for (index, cell) in header_row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            positions.entry(cell.clone()).or_insert(index);
        }
        Self {
            positions,
            width: header_row.len(),
        }
    }

    pub fn get(&self, declared: &str) -> Option<usize> {
        self.positions.get(declared).copied()
    }

    pub fn contains(&self, declared: &str) -> bool {
        self.positions.contains_key(declared)
    }

    /// Number of cells in the header row, empty ones included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Positions of every `required` header, or one error naming all that
    /// are missing.
    pub fn resolve<'a, I>(&self, required: I) -> Result<BTreeMap<&'a str, usize>, HeaderError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = BTreeMap::new();
        let mut missing = BTreeSet::new();
        for header in required {
            match self.get(header) {
                Some(index) => {
                    found.insert(header, index);
                }
                None => {
                    missing.insert(header.to_string());
                }
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(HeaderError::NotFound {
                headers: missing.into_iter().collect(),
            })
        }
    }
}
