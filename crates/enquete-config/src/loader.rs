//! Builds a validated [`Config`] from YAML text.

use std::path::Path;

use chrono_tz::Tz;
use encoding_rs::Encoding;
use enquete_model::{
    Config, Corporation, DEFAULT_TIMEZONE, DbConfig, Facility, FacilityCode, GoogleSettings,
    ImportJobSpec, MappingReference, MappingScope, SpreadsheetRef, TableName, TextSettings,
};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::catalog::{is_catalog_definition, parse_catalog, parse_scope};
use crate::error::{ConfigError, Result};
use crate::raw::{
    RawConfig, RawCorporation, RawDb, RawFacility, RawSpreadsheet, key_text, scalar_text,
};

/// Reads and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text)?;
    info!(
        path = %path.display(),
        corporations = config.corporations.len(),
        facilities = config.facilities().count(),
        "configuration loaded"
    );
    Ok(config)
}

/// Parses and validates configuration text.
pub fn parse_config(text: &str) -> Result<Config> {
    let raw: RawConfig = serde_yaml::from_str(text)?;

    let mappings = parse_scope("mappings", raw.mappings.as_ref())?;
    let corporations = match raw.corporations.as_ref() {
        Some(corporations) if !corporations.is_empty() => corporations,
        _ => return Err(ConfigError::NoCorporations),
    };

    let corporations = corporations
        .iter()
        .map(|(key, value)| {
            let key = key_text(key).ok_or_else(|| {
                ConfigError::invalid("corporations", "corporation keys must be strings")
            })?;
            parse_corporation(&key, value)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Config {
        google: GoogleSettings {
            worksheet: raw.google.as_ref().and_then(|g| scalar_text(g.worksheet.as_ref())),
        },
        timezone: parse_timezone(raw.timezone.as_ref())?,
        text: parse_text_settings(raw.encoding.as_ref(), raw.replacement_char.as_ref())?,
        mappings,
        corporations,
    })
}

fn parse_timezone(value: Option<&Value>) -> Result<Tz> {
    match scalar_text(value) {
        None => Ok(DEFAULT_TIMEZONE),
        Some(name) => name.parse::<Tz>().map_err(|_| {
            ConfigError::invalid("timezone", format!("unknown timezone '{name}'"))
        }),
    }
}

fn parse_text_settings(
    encoding: Option<&Value>,
    replacement: Option<&Value>,
) -> Result<TextSettings> {
    let defaults = TextSettings::default();
    let label = scalar_text(encoding).unwrap_or(defaults.encoding);
    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        ConfigError::invalid("encoding", format!("unknown encoding '{label}'"))
    })?;

    let replacement_char = match replacement {
        None | Some(Value::Null) => defaults.replacement_char,
        Some(Value::String(text)) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(ConfigError::invalid(
                        "replacement_char",
                        "must be exactly one character",
                    ));
                }
            }
        }
        Some(_) => {
            return Err(ConfigError::invalid(
                "replacement_char",
                "must be exactly one character",
            ));
        }
    };
    let mut buf = [0u8; 4];
    let (_, _, unmappable) = encoding.encode(replacement_char.encode_utf8(&mut buf));
    if unmappable {
        return Err(ConfigError::invalid(
            "replacement_char",
            format!(
                "'{replacement_char}' cannot be represented in {}",
                encoding.name()
            ),
        ));
    }

    Ok(TextSettings {
        encoding: encoding.name().to_string(),
        replacement_char,
    })
}

fn parse_corporation(key: &str, value: &Value) -> Result<Corporation> {
    let path = format!("corporations.{key}");
    let raw: RawCorporation = from_value(&path, value)?;

    let db = raw.db.ok_or(ConfigError::MissingKey {
        path: path.clone(),
        key: "db",
    })?;
    let mappings = parse_scope(&format!("{path}.mappings"), raw.mappings.as_ref())?;
    let facilities = match raw.facilities.as_ref() {
        Some(facilities) if !facilities.is_empty() => facilities,
        _ => {
            return Err(ConfigError::MissingKey {
                path,
                key: "facilities",
            });
        }
    };

    let facilities = facilities
        .iter()
        .map(|(facility_key, value)| {
            let facility_key = key_text(facility_key).ok_or_else(|| {
                ConfigError::invalid(format!("{path}.facilities"), "facility keys must be strings")
            })?;
            parse_facility(&format!("{path}.facilities.{facility_key}"), &facility_key, value)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(corporation = key, facilities = facilities.len(), "corporation parsed");
    Ok(Corporation {
        key: key.to_string(),
        db: db_config(db),
        mappings,
        mapping: scalar_text(raw.mapping.as_ref()),
        facilities,
    })
}

fn db_config(raw: RawDb) -> DbConfig {
    DbConfig {
        host: scalar_text(raw.host.as_ref()),
        port: raw.port,
        dbname: scalar_text(raw.dbname.as_ref()),
        user: scalar_text(raw.user.as_ref()),
        password: scalar_text(raw.password.as_ref()),
        options: scalar_text(raw.options.as_ref()),
    }
}

fn parse_facility(path: &str, key: &str, value: &Value) -> Result<Facility> {
    let raw: RawFacility = from_value(path, value)?;

    let facility_code = parse_facility_code(path, raw.facility_code.as_ref())?;
    let (spreadsheet_id, nested_worksheet) = match raw.spreadsheet.as_ref() {
        Some(RawSpreadsheet { id, worksheet }) => (
            scalar_text(id.as_ref()),
            scalar_text(worksheet.as_ref()),
        ),
        None => (None, None),
    };
    let spreadsheet_id = spreadsheet_id
        .or_else(|| scalar_text(raw.spreadsheet_id.as_ref()))
        .ok_or_else(|| ConfigError::MissingKey {
            path: path.to_string(),
            key: "spreadsheet.id",
        })?;

    let mut facility = Facility::new(key, facility_code, &spreadsheet_id);
    facility.spreadsheet = SpreadsheetRef {
        id: spreadsheet_id,
        worksheet: nested_worksheet.or_else(|| scalar_text(raw.worksheet.as_ref())),
    };
    facility.mappings = parse_scope(&format!("{path}.mappings"), raw.mappings.as_ref())?;
    facility.mapping = scalar_text(raw.mapping.as_ref());
    facility.table = parse_table(&format!("{path}.table"), raw.table.as_ref())?;
    facility.delete = raw.delete.unwrap_or(true);
    facility.enquete_key_prefix = scalar_text(raw.enquete_key_prefix.as_ref());
    facility.enquete_key_suffix = scalar_text(raw.enquete_key_suffix.as_ref());
    facility.imports = raw
        .imports
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, job)| parse_import_job(&format!("{path}.imports[{index}]"), job))
        .collect::<Result<Vec<_>>>()?;
    Ok(facility)
}

fn parse_facility_code(path: &str, value: Option<&Value>) -> Result<FacilityCode> {
    match value {
        Some(Value::Number(number)) => number.as_i64().map(FacilityCode::Integer).ok_or_else(|| {
            ConfigError::invalid(
                format!("{path}.facility_code"),
                format!("facility code {number} is not an integer"),
            )
        }),
        Some(Value::String(code)) if !code.trim().is_empty() => {
            Ok(FacilityCode::Text(code.trim().to_string()))
        }
        None | Some(Value::Null) | Some(Value::String(_)) => Err(ConfigError::MissingKey {
            path: path.to_string(),
            key: "facility_code",
        }),
        Some(_) => Err(ConfigError::invalid(
            format!("{path}.facility_code"),
            "facility code must be an integer or a string",
        )),
    }
}

fn parse_table(path: &str, value: Option<&Value>) -> Result<Option<TableName>> {
    scalar_text(value)
        .map(|name| TableName::new(name).map_err(|err| ConfigError::model(path, err)))
        .transpose()
}

/// Parses one `imports` entry.
///
/// Accepted forms: a catalog key, an inline catalog definition, or a map
/// with optional `table` and `mapping` keys. A null entry is a job with
/// every setting inherited.
fn parse_import_job(path: &str, value: &Value) -> Result<ImportJobSpec> {
    match value {
        Value::Null => Ok(ImportJobSpec::default()),
        Value::String(_) | Value::Number(_) => Ok(ImportJobSpec {
            table: None,
            mapping: scalar_text(Some(value)).map(MappingReference::Named),
        }),
        Value::Mapping(map) if is_catalog_definition(map) => Ok(ImportJobSpec {
            table: None,
            mapping: Some(MappingReference::Inline(parse_catalog(
                path,
                MappingScope::DEFAULT_CATALOG,
                map,
            )?)),
        }),
        Value::Mapping(map) => parse_job_map(path, map),
        _ => Err(ConfigError::invalid(
            path,
            "import entry must be a catalog key or a map",
        )),
    }
}

fn parse_job_map(path: &str, map: &Mapping) -> Result<ImportJobSpec> {
    let mut table = None;
    let mut mapping = None;
    for (key, value) in map {
        let key = key_text(key).unwrap_or_default();
        match key.as_str() {
            "table" => table = parse_table(&format!("{path}.table"), Some(value))?,
            "mapping" => {
                let mapping_path = format!("{path}.mapping");
                mapping = match value {
                    Value::Mapping(inline) => Some(MappingReference::Inline(parse_catalog(
                        &mapping_path,
                        MappingScope::DEFAULT_CATALOG,
                        inline,
                    )?)),
                    other => scalar_text(Some(other)).map(MappingReference::Named),
                };
            }
            other => {
                return Err(ConfigError::invalid(
                    path,
                    format!("unknown import key '{other}' (expected table or mapping)"),
                ));
            }
        }
    }
    Ok(ImportJobSpec { table, mapping })
}

fn from_value<T: serde::de::DeserializeOwned>(path: &str, value: &Value) -> Result<T> {
    let value = match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other.clone(),
    };
    serde_yaml::from_value(value).map_err(|source| ConfigError::Shape {
        path: path.to_string(),
        source,
    })
}
