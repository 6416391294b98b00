//! SQL statement builders.
//!
//! Table and column names are interpolated unquoted; [`TableName`] and
//! [`ColumnName`] only admit plain identifiers. Values are always bound
//! as parameters.

use std::fmt::Write;

use enquete_model::{ColumnName, FACILITY_CODE_COLUMN, TableName};

use crate::error::{Result, SinkError};

/// PostgreSQL limit on bind parameters per statement.
pub const MAX_BIND_PARAMETERS: usize = 65_535;

/// Upper bound on rows per `INSERT`, whatever the column count.
pub const MAX_ROWS_PER_INSERT: usize = 500;

pub fn delete_statement(table: &TableName) -> String {
    format!("DELETE FROM {table} WHERE {FACILITY_CODE_COLUMN} = $1")
}

/// Rows that fit into one `INSERT` of `column_count` columns.
pub fn rows_per_insert(column_count: usize) -> usize {
    if column_count == 0 {
        return MAX_ROWS_PER_INSERT;
    }
    (MAX_BIND_PARAMETERS / column_count).clamp(1, MAX_ROWS_PER_INSERT)
}

/// Multi-row `INSERT` with `rows` tuples of numbered placeholders.
pub fn insert_statement(table: &TableName, columns: &[String], rows: usize) -> Result<String> {
    if columns.is_empty() {
        return Err(SinkError::NoColumns {
            table: table.to_string(),
        });
    }
    let columns = columns
        .iter()
        .map(|column| {
            ColumnName::new(column.as_str()).map_err(|_| SinkError::InvalidColumn(column.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut sql = format!("INSERT INTO {table} (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(column.as_str());
    }
    sql.push_str(") VALUES ");

    let width = columns.len();
    for row in 0..rows {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for col in 0..width {
            if col > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "${}", row * width + col + 1);
        }
        sql.push(')');
    }
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn table() -> TableName {
        TableName::new("survey.enquetes").unwrap()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_delete_statement() {
        assert_snapshot!(
            delete_statement(&table()),
            @"DELETE FROM survey.enquetes WHERE facility_code = $1"
        );
    }

    #[test]
    fn test_insert_statement_numbers_placeholders_row_major() {
        let sql = insert_statement(&table(), &columns(&["name", "age", "facility_code"]), 2).unwrap();
        assert_snapshot!(
            sql,
            @"INSERT INTO survey.enquetes (name, age, facility_code) VALUES ($1, $2, $3), ($4, $5, $6)"
        );
    }

    #[test]
    fn test_insert_statement_rejects_bad_columns() {
        assert!(matches!(
            insert_statement(&table(), &columns(&["name; DROP TABLE x"]), 1),
            Err(SinkError::InvalidColumn(_))
        ));
        assert!(matches!(
            insert_statement(&table(), &[], 1),
            Err(SinkError::NoColumns { .. })
        ));
    }

    #[test]
    fn test_rows_per_insert_respects_parameter_limit() {
        assert_eq!(rows_per_insert(3), MAX_ROWS_PER_INSERT);
        assert_eq!(rows_per_insert(200), 327);
        assert_eq!(rows_per_insert(70_000), 1);
        assert!(rows_per_insert(131) * 131 <= MAX_BIND_PARAMETERS);
    }
}
