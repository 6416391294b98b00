//! Worksheet selection.

use std::fmt;

use enquete_model::{Facility, GoogleSettings};

/// Which worksheet of a spreadsheet to read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorksheetSelection {
    Named(String),
    /// The spreadsheet's first worksheet, as ordered by the sheet source.
    FirstSheet,
}

impl WorksheetSelection {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::FirstSheet => None,
        }
    }
}

impl fmt::Display for WorksheetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::FirstSheet => f.write_str("(first sheet)"),
        }
    }
}

/// Picks the facility's worksheet, then the global default, then the
/// first sheet.
pub fn select_worksheet(facility: &Facility, google: &GoogleSettings) -> WorksheetSelection {
    let tiers: [&dyn Fn() -> Option<String>; 2] = [
        &|| non_empty(facility.spreadsheet.worksheet.as_deref()),
        &|| non_empty(google.worksheet.as_deref()),
    ];
    tiers
        .iter()
        .find_map(|tier| tier())
        .map_or(WorksheetSelection::FirstSheet, WorksheetSelection::Named)
}

fn non_empty(name: Option<&str>) -> Option<String> {
    name.filter(|name| !name.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use enquete_model::FacilityCode;

    use super::*;

    fn facility(worksheet: Option<&str>) -> Facility {
        let mut facility = Facility::new("tokyo", FacilityCode::Integer(1), "sheet");
        facility.spreadsheet.worksheet = worksheet.map(str::to_string);
        facility
    }

    fn google(worksheet: Option<&str>) -> GoogleSettings {
        GoogleSettings {
            worksheet: worksheet.map(str::to_string),
        }
    }

    #[test]
    fn facility_worksheet_wins() {
        assert_eq!(
            select_worksheet(&facility(Some("回答")), &google(Some("Default"))),
            WorksheetSelection::Named("回答".to_string())
        );
    }

    #[test]
    fn global_worksheet_is_second() {
        assert_eq!(
            select_worksheet(&facility(None), &google(Some("Default"))),
            WorksheetSelection::Named("Default".to_string())
        );
        assert_eq!(
            select_worksheet(&facility(Some("  ")), &google(Some("Default"))),
            WorksheetSelection::Named("Default".to_string())
        );
    }

    #[test]
    fn falls_back_to_first_sheet() {
        let selection = select_worksheet(&facility(None), &google(None));
        assert_eq!(selection, WorksheetSelection::FirstSheet);
        assert_eq!(selection.name(), None);
    }
}
