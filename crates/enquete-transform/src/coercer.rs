//! Raw row to typed record conversion.

use std::borrow::Cow;

use chrono_tz::Tz;
use enquete_map::{BoundField, HeaderError, HeaderIndex, ResolvedMapping};
use enquete_model::{DEFAULT_TIMEZONE, TextSettings, TypedRecord, Value, ValueType};
use tracing::debug;

use crate::charset::CharReplacer;
use crate::datetime::{is_null_date, parse_date, parse_datetime};
use crate::error::{CoercionError, RowError};
use crate::numeric::parse_integer;
use crate::width::kana_to_full_width;

/// Converts raw sheet rows into typed records for a resolved mapping.
#[derive(Debug, Clone)]
pub struct RowCoercer {
    replacer: CharReplacer,
    timezone: Tz,
}

impl Default for RowCoercer {
    fn default() -> Self {
        Self::new(CharReplacer::default())
    }
}

impl RowCoercer {
    pub fn new(replacer: CharReplacer) -> Self {
        Self {
            replacer,
            timezone: DEFAULT_TIMEZONE,
        }
    }

    /// Coercer for configured text settings; `None` for an unknown
    /// encoding label.
    pub fn from_settings(text: &TextSettings, timezone: Tz) -> Option<Self> {
        CharReplacer::for_label(&text.encoding, text.replacement_char)
            .map(|replacer| Self::new(replacer).with_timezone(timezone))
    }

    /// Timezone for date/time cells without an offset.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Coerces one data row.
    ///
    /// Every field of the mapping gets an entry; empty cells and cells
    /// beyond the end of the row become [`Value::Null`]. Sheet columns the
    /// mapping does not declare are ignored.
    pub fn coerce(
        &self,
        row: &[String],
        mapping: &ResolvedMapping,
        headers: &HeaderIndex,
    ) -> Result<TypedRecord, RowError> {
        let mut record = TypedRecord::new();
        for field in mapping.fields() {
            let value = if field.header.is_empty() {
                Value::Null
            } else {
                let index = headers
                    .get(&field.header)
                    .ok_or_else(|| HeaderError::Missing(field.header.clone()))?;
                let raw = row.get(index).map_or("", String::as_str);
                self.coerce_value(field, raw)?
            };
            record.insert(field.column.as_str(), value);
        }
        Ok(record)
    }

    /// Coerces one cell for `field`.
    pub fn coerce_value(&self, field: &BoundField, raw: &str) -> Result<Value, CoercionError> {
        let trimmed = raw.trim();
        let cell = match &field.conversion {
            Some(table) => table.apply(trimmed),
            None => trimmed,
        };
        let fail = || CoercionError {
            column: field.column.to_string(),
            header: field.header.clone(),
            value: cell.to_string(),
            value_type: field.value_type,
        };

        match field.value_type {
            ValueType::String | ValueType::Text => {
                if cell.is_empty() {
                    return Ok(Value::Null);
                }
                let replaced = self.replacer.replace(cell);
                if let Cow::Owned(_) = replaced {
                    debug!(column = %field.column, "replaced unencodable characters");
                }
                Ok(Value::Text(kana_to_full_width(&replaced).into_owned()))
            }
            ValueType::Integer => {
                if cell.is_empty() {
                    return Ok(Value::Null);
                }
                let parsed = parse_integer(cell).ok_or_else(fail)?;
                let bounded = field.clamp.map_or(parsed, |range| range.clamp(parsed));
                Ok(Value::Integer(bounded))
            }
            ValueType::Date => {
                if is_null_date(cell) {
                    return Ok(Value::Null);
                }
                parse_date(cell, self.timezone)
                    .map(Value::Date)
                    .ok_or_else(fail)
            }
            ValueType::DateTime => {
                if is_null_date(cell) {
                    return Ok(Value::Null);
                }
                parse_datetime(cell, self.timezone)
                    .map(Value::DateTime)
                    .ok_or_else(fail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use enquete_model::{ColumnName, ConversionTable, IntRange};

    use super::*;

    fn field(value_type: ValueType, column: &str) -> BoundField {
        BoundField {
            value_type,
            column: ColumnName::new(column).unwrap(),
            header: column.to_string(),
            conversion: None,
            clamp: None,
        }
    }

    #[test]
    fn test_string_is_trimmed_and_folded() {
        let coercer = RowCoercer::default();
        let value = coercer
            .coerce_value(&field(ValueType::String, "name"), "  ﾔﾏﾀﾞ  ")
            .unwrap();
        assert_eq!(value, Value::Text("ヤマダ".to_string()));
    }

    #[test]
    fn test_text_uses_character_policy() {
        let coercer = RowCoercer::new(CharReplacer::default().with_replace_fn(|_| '〓'));
        let value = coercer
            .coerce_value(&field(ValueType::Text, "memo"), "とても良い😀")
            .unwrap();
        assert_eq!(value, Value::Text("とても良い〓".to_string()));
    }

    #[test]
    fn test_conversion_applies_before_coercion() {
        let mut revisit = field(ValueType::String, "revisit");
        revisit.conversion = Some([("Yes", "はい")].into_iter().collect::<ConversionTable>());
        let coercer = RowCoercer::default();
        assert_eq!(
            coercer.coerce_value(&revisit, " Yes ").unwrap(),
            Value::Text("はい".to_string())
        );

        let mut score = field(ValueType::Integer, "score");
        score.conversion = Some([("満点", "100")].into_iter().collect::<ConversionTable>());
        assert_eq!(coercer.coerce_value(&score, "満点").unwrap(), Value::Integer(100));
    }

    #[test]
    fn test_clamp_bounds_integers() {
        let mut score = field(ValueType::Integer, "score");
        score.clamp = Some(IntRange::new(1, 5).unwrap());
        let coercer = RowCoercer::default();
        assert_eq!(coercer.coerce_value(&score, "9").unwrap(), Value::Integer(5));
        assert_eq!(coercer.coerce_value(&score, "0").unwrap(), Value::Integer(1));
    }

    #[test]
    fn test_empty_cells_are_null_for_every_type() {
        let coercer = RowCoercer::default();
        for value_type in ValueType::ALL {
            assert_eq!(
                coercer.coerce_value(&field(value_type, "col"), "   ").unwrap(),
                Value::Null,
                "{value_type}"
            );
        }
    }

    #[test]
    fn test_zero_date_is_null() {
        let coercer = RowCoercer::default();
        assert_eq!(
            coercer.coerce_value(&field(ValueType::Date, "start_date"), "0").unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_unparseable_date_fails() {
        let coercer = RowCoercer::default();
        let err = coercer
            .coerce_value(&field(ValueType::DateTime, "answered_at"), "昨日")
            .unwrap_err();
        assert_eq!(err.column, "answered_at");
        assert_eq!(err.value_type, ValueType::DateTime);
    }
}
