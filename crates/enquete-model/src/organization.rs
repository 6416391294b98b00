//! Corporations, facilities and their import settings.

use std::fmt;

use crate::catalog::{MappingCatalog, MappingScope};
use crate::ids::TableName;
use crate::value::Value;

/// Identifier of a facility in the destination database.
///
/// The code is opaque to the importer; configuration may give it as an
/// integer or as a string and it is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacilityCode {
    Integer(i64),
    Text(String),
}

impl fmt::Display for FacilityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(code) => write!(f, "{code}"),
            Self::Text(code) => f.write_str(code),
        }
    }
}

impl From<&FacilityCode> for Value {
    fn from(code: &FacilityCode) -> Self {
        match code {
            FacilityCode::Integer(code) => Value::Integer(*code),
            FacilityCode::Text(code) => Value::Text(code.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetRef {
    pub id: String,
    pub worksheet: Option<String>,
}

/// PostgreSQL connection parameters of a corporation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub options: Option<String>,
}

// Keeps the password out of logs and panics.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("options", &self.options)
            .finish()
    }
}

/// How an import job names its catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingReference {
    Named(String),
    Inline(MappingCatalog),
}

/// One entry of a facility's `imports` list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportJobSpec {
    pub table: Option<TableName>,
    pub mapping: Option<MappingReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facility {
    pub key: String,
    pub facility_code: FacilityCode,
    pub spreadsheet: SpreadsheetRef,
    pub mappings: MappingScope,
    /// Catalog key selected for this facility; never empty when present.
    pub mapping: Option<String>,
    pub table: Option<TableName>,
    /// Delete the facility's existing rows before inserting.
    pub delete: bool,
    pub enquete_key_prefix: Option<String>,
    pub enquete_key_suffix: Option<String>,
    pub imports: Vec<ImportJobSpec>,
}

impl Facility {
    pub fn new(key: impl Into<String>, facility_code: FacilityCode, spreadsheet_id: &str) -> Self {
        Self {
            key: key.into(),
            facility_code,
            spreadsheet: SpreadsheetRef {
                id: spreadsheet_id.to_string(),
                worksheet: None,
            },
            mappings: MappingScope::new(),
            mapping: None,
            table: None,
            delete: true,
            enquete_key_prefix: None,
            enquete_key_suffix: None,
            imports: Vec::new(),
        }
    }

    /// The facility's import jobs; a facility without `imports` has one
    /// job that uses its own `mapping` and `table`. Jobs that leave
    /// `table` or `mapping` unset inherit the facility's.
    pub fn import_jobs(&self) -> Vec<ImportJobSpec> {
        if self.imports.is_empty() {
            vec![ImportJobSpec {
                table: self.table.clone(),
                mapping: self.mapping.clone().map(MappingReference::Named),
            }]
        } else {
            self.imports
                .iter()
                .map(|job| ImportJobSpec {
                    table: job.table.clone().or_else(|| self.table.clone()),
                    mapping: job
                        .mapping
                        .clone()
                        .or_else(|| self.mapping.clone().map(MappingReference::Named)),
                })
                .collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corporation {
    pub key: String,
    pub db: DbConfig,
    pub mappings: MappingScope,
    /// Catalog key for facilities that select none themselves.
    pub mapping: Option<String>,
    pub facilities: Vec<Facility>,
}

impl Corporation {
    pub fn facility(&self, key: &str) -> Option<&Facility> {
        self.facilities.iter().find(|facility| facility.key == key)
    }
}
