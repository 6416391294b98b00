//! Raw deserialization targets mirroring the YAML layout.
//!
//! Maps whose order matters (corporations, facilities, catalog sections)
//! stay as [`Mapping`], which keeps file order.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub google: Option<RawGoogle>,
    #[serde(default)]
    pub timezone: Option<Value>,
    #[serde(default)]
    pub encoding: Option<Value>,
    #[serde(default)]
    pub replacement_char: Option<Value>,
    #[serde(default)]
    pub mappings: Option<Mapping>,
    #[serde(default)]
    pub corporations: Option<Mapping>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawGoogle {
    #[serde(default)]
    pub worksheet: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCorporation {
    #[serde(default)]
    pub db: Option<RawDb>,
    #[serde(default)]
    pub mappings: Option<Mapping>,
    /// Catalog key used by facilities without their own `mapping`.
    #[serde(default)]
    pub mapping: Option<Value>,
    #[serde(default)]
    pub facilities: Option<Mapping>,
}

/// Connection keys as accepted by libpq-style clients.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDb {
    #[serde(default)]
    pub host: Option<Value>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, alias = "database")]
    pub dbname: Option<Value>,
    #[serde(default, alias = "username")]
    pub user: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
    #[serde(default)]
    pub options: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawFacility {
    #[serde(default)]
    pub facility_code: Option<Value>,
    #[serde(default)]
    pub spreadsheet: Option<RawSpreadsheet>,
    /// Legacy flat form of `spreadsheet.id`.
    #[serde(default)]
    pub spreadsheet_id: Option<Value>,
    /// Legacy flat form of `spreadsheet.worksheet`.
    #[serde(default)]
    pub worksheet: Option<Value>,
    #[serde(default)]
    pub mappings: Option<Mapping>,
    #[serde(default)]
    pub mapping: Option<Value>,
    #[serde(default)]
    pub table: Option<Value>,
    #[serde(default)]
    pub delete: Option<bool>,
    #[serde(default)]
    pub enquete_key_prefix: Option<Value>,
    #[serde(default)]
    pub enquete_key_suffix: Option<Value>,
    #[serde(default)]
    pub imports: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSpreadsheet {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub worksheet: Option<Value>,
}

/// Renders a scalar as trimmed text; `None` for null, empty and non-scalars.
pub(crate) fn scalar_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Key of a YAML map entry as text.
pub(crate) fn key_text(key: &Value) -> Option<String> {
    scalar_text(Some(key))
}
