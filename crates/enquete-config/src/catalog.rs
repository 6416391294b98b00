//! Parsing of `mappings` blocks into catalogs and scopes.
//!
//! A `mappings` block is either a map of named catalogs (plus shared
//! `conversion*` tables), or a single catalog definition, which then
//! becomes that level's `default` catalog.

use enquete_model::{
    ColumnName, ConversionTable, FieldSpec, IntRange, MappingCatalog, MappingScope, ValueType,
};
use serde_yaml::{Mapping, Value};

use crate::error::{ConfigError, Result};
use crate::raw::{key_text, scalar_text};

const CONVERSION_PREFIX: &str = "conversion";
const CLAMP_PREFIX: &str = "clamp";

/// Match order for section prefixes; `datetime` must be tried before `date`.
const SECTION_MATCH_ORDER: [ValueType; 5] = [
    ValueType::DateTime,
    ValueType::Date,
    ValueType::String,
    ValueType::Text,
    ValueType::Integer,
];

/// Classified key of a catalog definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CatalogKey<'a> {
    Section(ValueType, &'a str),
    Conversion(&'a str),
    Clamp(&'a str),
}

pub(crate) fn classify_key(key: &str) -> Option<CatalogKey<'_>> {
    if let Some(suffix) = key.strip_prefix(CONVERSION_PREFIX) {
        return Some(CatalogKey::Conversion(suffix));
    }
    if let Some(suffix) = key.strip_prefix(CLAMP_PREFIX) {
        return Some(CatalogKey::Clamp(suffix));
    }
    SECTION_MATCH_ORDER.into_iter().find_map(|value_type| {
        key.strip_prefix(value_type.section_name())
            .map(|suffix| CatalogKey::Section(value_type, suffix))
    })
}

/// True when every key of the map is a section, conversion or clamp key.
pub(crate) fn is_catalog_definition(map: &Mapping) -> bool {
    !map.is_empty()
        && map
            .keys()
            .all(|key| key_text(key).is_some_and(|key| classify_key(&key).is_some()))
}

/// Parses one `mappings` block.
pub(crate) fn parse_scope(path: &str, block: Option<&Mapping>) -> Result<MappingScope> {
    let mut scope = MappingScope::new();
    let Some(block) = block else {
        return Ok(scope);
    };
    if block.is_empty() {
        return Ok(scope);
    }

    if is_catalog_definition(block) {
        let catalog = parse_catalog(path, MappingScope::DEFAULT_CATALOG, block)?;
        scope.insert_catalog(catalog);
        return Ok(scope);
    }

    for (key, value) in block {
        let name = key_text(key)
            .ok_or_else(|| ConfigError::invalid(path, "catalog names must be strings"))?;
        let entry_path = format!("{path}.{name}");
        if let Some(CatalogKey::Conversion(suffix)) = classify_key(&name) {
            scope.insert_conversion(suffix, parse_conversion(&entry_path, value)?);
            continue;
        }
        let catalog = match value {
            Value::Null => MappingCatalog::new(name.as_str()),
            Value::Mapping(map) => parse_catalog(&entry_path, &name, map)?,
            _ => {
                return Err(ConfigError::invalid(
                    entry_path,
                    "catalog definition must be a map",
                ));
            }
        };
        scope.insert_catalog(catalog);
    }
    Ok(scope)
}

/// Parses a single catalog definition.
pub(crate) fn parse_catalog(path: &str, name: &str, map: &Mapping) -> Result<MappingCatalog> {
    let mut catalog = MappingCatalog::new(name);
    for (key, value) in map {
        let key = key_text(key)
            .ok_or_else(|| ConfigError::invalid(path, "catalog keys must be strings"))?;
        let entry_path = format!("{path}.{key}");
        match classify_key(&key) {
            Some(CatalogKey::Section(value_type, suffix)) => {
                parse_section(&entry_path, &mut catalog, value_type, suffix, value)?;
            }
            Some(CatalogKey::Conversion(suffix)) => {
                catalog.set_conversion(suffix, parse_conversion(&entry_path, value)?);
            }
            Some(CatalogKey::Clamp(suffix)) => {
                catalog.set_clamp(suffix, parse_clamp(&entry_path, value)?);
            }
            None => {
                return Err(ConfigError::invalid(
                    entry_path,
                    "unknown catalog section (expected string, text, integer, date, datetime, conversion or clamp)",
                ));
            }
        }
    }
    Ok(catalog)
}

fn parse_section(
    path: &str,
    catalog: &mut MappingCatalog,
    value_type: ValueType,
    suffix: &str,
    value: &Value,
) -> Result<()> {
    let fields = match value {
        Value::Null => return Ok(()),
        Value::Mapping(fields) => fields,
        _ => {
            return Err(ConfigError::invalid(
                path,
                format!("mapping section '{value_type}' must be a map"),
            ));
        }
    };
    for (column, header) in fields {
        let column = key_text(column)
            .ok_or_else(|| ConfigError::invalid(path, "column keys must be strings"))?;
        let column = ColumnName::new(column).map_err(|err| ConfigError::model(path, err))?;
        let header = match header {
            Value::String(header) => header.clone(),
            Value::Null => String::new(),
            other => scalar_text(Some(other)).ok_or_else(|| {
                ConfigError::invalid(
                    format!("{path}.{column}"),
                    "header name must be a string",
                )
            })?,
        };
        catalog
            .push_field(value_type, FieldSpec::new(column, header).with_variant(suffix))
            .map_err(|err| ConfigError::model(path, err))?;
    }
    Ok(())
}

fn parse_conversion(path: &str, value: &Value) -> Result<ConversionTable> {
    match value {
        Value::Null => Ok(ConversionTable::new()),
        Value::Mapping(entries) => {
            let mut table = ConversionTable::new();
            for (from, to) in entries {
                let from = scalar_text(Some(from)).unwrap_or_default();
                let to = scalar_text(Some(to)).unwrap_or_default();
                table.insert(from, to);
            }
            Ok(table)
        }
        _ => Err(ConfigError::invalid(path, "conversion must be a map")),
    }
}

fn parse_clamp(path: &str, value: &Value) -> Result<IntRange> {
    let bounds = match value {
        Value::Sequence(items) if items.len() == 2 => {
            (items[0].as_i64(), items[1].as_i64())
        }
        _ => (None, None),
    };
    match bounds {
        (Some(min), Some(max)) => IntRange::new(min, max).map_err(|err| ConfigError::model(path, err)),
        _ => Err(ConfigError::invalid(path, "clamp must be a [min, max] pair of integers")),
    }
}
