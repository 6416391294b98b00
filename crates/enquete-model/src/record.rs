//! Typed records and the batches handed to the record sink.

use std::collections::BTreeMap;

use crate::value::Value;

pub const FACILITY_CODE_COLUMN: &str = "facility_code";
pub const ENQUETE_KEY_COLUMN: &str = "enquete_key";
pub const IMPORT_DATE_COLUMN: &str = "import_date";

/// Columns the importer fills in itself, appended after the mapped columns.
pub const GENERATED_COLUMNS: [&str; 3] =
    [FACILITY_CODE_COLUMN, ENQUETE_KEY_COLUMN, IMPORT_DATE_COLUMN];

/// One coerced row keyed by destination column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedRecord {
    values: BTreeMap<String, Value>,
}

impl TypedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for TypedRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

/// Records for one table write, with the column order used for the insert.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    columns: Vec<String>,
    records: Vec<TypedRecord>,
}

impl RecordBatch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: TypedRecord) {
        self.records.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[TypedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row values aligned with [`columns`](Self::columns); columns a record
    /// lacks read as [`Value::Null`].
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> {
        self.records.iter().map(|record| {
            self.columns
                .iter()
                .map(|column| record.get(column).unwrap_or(&Value::Null))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_align_with_columns() {
        let mut batch = RecordBatch::new(vec!["name".to_string(), "age".to_string()]);
        batch.push([("age", Value::Integer(30)), ("name", Value::Text("山田".into()))]
            .into_iter()
            .collect());
        batch.push([("name", Value::Text("佐藤".into()))].into_iter().collect());

        let rows: Vec<Vec<&Value>> = batch.rows().collect();
        assert_eq!(rows[0], vec![&Value::Text("山田".into()), &Value::Integer(30)]);
        assert_eq!(rows[1], vec![&Value::Text("佐藤".into()), &Value::Null]);
    }
}
