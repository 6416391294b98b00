//! Flexible calendar date parsing.
//!
//! Accepted inputs, after normalisation:
//! - Year-first dates with `/`, `-` or `.` separators, or none: `2024/4/1`,
//!   `2024-04-01`, `20240401`
//! - Japanese markers: `2024年4月1日` (the ideographic space counts as a
//!   space)
//! - ISO 8601 / RFC 3339 timestamps, with or without an offset
//! - US month-first dates: `4/1/2024 10:30`
//! - English month names: `April 1, 2024`, `Apr 1 2024`
//!
//! Two-digit years read as 20yy: `24/4/1` is 2024-04-01.
//!
//! Values without an offset are localised in the configured timezone.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use chrono_tz::Tz;

use crate::width::ascii_to_half_width;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y/%m/%d %H:%M:%S%.f %z",
    "%Y/%m/%d %H:%M:%S%.f%:z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y.%m.%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %H:%M:%S%.f",
    "%B %d, %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// True for cells that read as "no date": empty or a bare `0`.
pub fn is_null_date(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "0"
}

fn normalize(value: &str) -> String {
    let mut text = ascii_to_half_width(value.trim()).into_owned();
    if text.contains(['年', '月', '日']) {
        text = text.replace(['年', '月'], "/").replace('日', "");
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a non-null date/time cell; `None` when no format matches.
pub fn parse_datetime(value: &str, timezone: Tz) -> Option<DateTime<FixedOffset>> {
    let text = normalize(value);
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&text) {
        return Some(parsed);
    }
    if let Some(parsed) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&text, format).ok())
    {
        return Some(parsed);
    }

    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })?;
    localize(expand_short_year(naive)?, timezone)
}

fn expand_short_year(naive: NaiveDateTime) -> Option<NaiveDateTime> {
    match naive.year() {
        year @ 0..100 => naive.with_year(2000 + year),
        _ => Some(naive),
    }
}

/// Attaches `timezone` to a wall-clock time; ambiguous times take the
/// earlier instant and nonexistent ones are rejected.
pub fn localize(naive: NaiveDateTime, timezone: Tz) -> Option<DateTime<FixedOffset>> {
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.fixed_offset())
}

/// Parses a non-null date cell; the date is read in the value's own offset.
pub fn parse_date(value: &str, timezone: Tz) -> Option<NaiveDate> {
    parse_datetime(value, timezone).map(|parsed| parsed.date_naive())
}
