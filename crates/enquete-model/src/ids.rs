use std::fmt;

use crate::ModelError;

/// A destination column name.
///
/// Column names are interpolated into SQL, so only plain identifiers
/// (`[A-Za-z_][A-Za-z0-9_]*`) are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if !is_identifier(trimmed) {
            return Err(ModelError::InvalidColumnName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A destination table name, optionally schema-qualified (`schema.table`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        let mut parts = trimmed.split('.');
        let valid = match (parts.next(), parts.next(), parts.next()) {
            (Some(table), None, None) => is_identifier(table),
            (Some(schema), Some(table), None) => is_identifier(schema) && is_identifier(table),
            _ => false,
        };
        if !valid {
            return Err(ModelError::InvalidTableName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names() {
        assert_eq!(ColumnName::new(" name ").unwrap().as_str(), "name");
        assert!(ColumnName::new("room_number2").is_ok());
        assert!(ColumnName::new("2nd").is_err());
        assert!(ColumnName::new("name; DROP").is_err());
        assert!(ColumnName::new("").is_err());
    }

    #[test]
    fn table_names() {
        assert!(TableName::new("enquetes").is_ok());
        assert!(TableName::new("survey.enquetes").is_ok());
        assert!(TableName::new("a.b.c").is_err());
        assert!(TableName::new("enquetes;").is_err());
        assert!(TableName::new(".enquetes").is_err());
    }
}
