//! Columns the importer adds to every record.

use chrono::{DateTime, FixedOffset};
use enquete_model::{
    ENQUETE_KEY_COLUMN, FACILITY_CODE_COLUMN, Facility, FacilityCode, IMPORT_DATE_COLUMN,
    TypedRecord, Value,
};

use crate::width::ascii_to_half_width;

/// Column holding the respondent's room number.
pub const ROOM_NUMBER_COLUMN: &str = "room_number";
/// Column holding the respondent's move-in date.
pub const START_DATE_COLUMN: &str = "start_date";

/// Adds `facility_code`, `enquete_key` and `import_date` to records.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStamp {
    facility_code: FacilityCode,
    key_prefix: Option<String>,
    key_suffix: Option<String>,
    import_date: DateTime<FixedOffset>,
}

impl RecordStamp {
    pub fn new(facility_code: FacilityCode, import_date: DateTime<FixedOffset>) -> Self {
        Self {
            facility_code,
            key_prefix: None,
            key_suffix: None,
            import_date,
        }
    }

    /// Stamp using the facility's code and enquete key affixes.
    pub fn for_facility(facility: &Facility, import_date: DateTime<FixedOffset>) -> Self {
        Self::new(facility.facility_code.clone(), import_date)
            .with_key_affixes(
                facility.enquete_key_prefix.clone(),
                facility.enquete_key_suffix.clone(),
            )
    }

    pub fn with_key_affixes(mut self, prefix: Option<String>, suffix: Option<String>) -> Self {
        self.key_prefix = prefix;
        self.key_suffix = suffix;
        self
    }

    pub fn apply(&self, record: &mut TypedRecord) {
        let key = self.enquete_key(record).map_or(Value::Null, Value::Text);
        record.insert(FACILITY_CODE_COLUMN, Value::from(&self.facility_code));
        record.insert(ENQUETE_KEY_COLUMN, key);
        record.insert(IMPORT_DATE_COLUMN, Value::DateTime(self.import_date));
    }

    /// `{prefix}{room}-{YYYYMMDD}-1[-{suffix}]`, or `None` when the room
    /// number is not a plain number or the start date is missing.
    pub fn enquete_key(&self, record: &TypedRecord) -> Option<String> {
        let room = room_number(record.get(ROOM_NUMBER_COLUMN)?)?;
        let start = match record.get(START_DATE_COLUMN)? {
            Value::Date(date) => date.format("%Y%m%d").to_string(),
            Value::DateTime(datetime) => datetime.format("%Y%m%d").to_string(),
            _ => return None,
        };

        let mut key = format!("{room}-{start}-1");
        if let Some(prefix) = &self.key_prefix {
            key.insert_str(0, prefix);
        }
        if let Some(suffix) = &self.key_suffix {
            key.push('-');
            key.push_str(suffix);
        }
        Some(key)
    }
}

fn room_number(value: &Value) -> Option<String> {
    match value {
        Value::Integer(room) if *room >= 0 => Some(room.to_string()),
        Value::Text(room) => {
            let room = ascii_to_half_width(room);
            (!room.is_empty() && room.chars().all(|ch| ch.is_ascii_digit()))
                .then(|| room.into_owned())
        }
        _ => None,
    }
}
