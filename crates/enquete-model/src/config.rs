//! The validated, immutable configuration consumed by the import engine.

use chrono_tz::Tz;

use crate::catalog::MappingScope;
use crate::organization::{Corporation, Facility};

/// Timezone applied to date/time cells that carry no offset.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleSettings {
    /// Worksheet used when a facility does not name one.
    pub worksheet: Option<String>,
}

/// Destination text encoding and the substitute for characters it cannot
/// represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSettings {
    /// WHATWG encoding label, e.g. `shift_jis`.
    pub encoding: String,
    pub replacement_char: char,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            encoding: "shift_jis".to_string(),
            replacement_char: '?',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub google: GoogleSettings,
    pub timezone: Tz,
    pub text: TextSettings,
    /// Root-level catalogs and conversion tables.
    pub mappings: MappingScope,
    /// Corporations in file order.
    pub corporations: Vec<Corporation>,
}

impl Config {
    pub fn new(corporations: Vec<Corporation>) -> Self {
        Self {
            google: GoogleSettings::default(),
            timezone: DEFAULT_TIMEZONE,
            text: TextSettings::default(),
            mappings: MappingScope::new(),
            corporations,
        }
    }

    pub fn corporation(&self, key: &str) -> Option<&Corporation> {
        self.corporations.iter().find(|corp| corp.key == key)
    }

    /// Every `(corporation, facility)` pair in file order.
    pub fn facilities(&self) -> impl Iterator<Item = (&Corporation, &Facility)> {
        self.corporations
            .iter()
            .flat_map(|corp| corp.facilities.iter().map(move |facility| (corp, facility)))
    }
}
