//! The sheet-source seam.

use enquete_map::WorksheetSelection;

use crate::error::{Result, SheetError};
use crate::values::SheetValues;

/// Read access to spreadsheets.
pub trait SheetSource {
    /// Worksheet titles in sheet order.
    fn worksheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>>;

    /// Reads the header row and data rows of the selected worksheet.
    fn read_values(
        &self,
        spreadsheet_id: &str,
        selection: &WorksheetSelection,
    ) -> Result<SheetValues>;
}

impl<S: SheetSource + ?Sized> SheetSource for &S {
    fn worksheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        (**self).worksheet_titles(spreadsheet_id)
    }

    fn read_values(
        &self,
        spreadsheet_id: &str,
        selection: &WorksheetSelection,
    ) -> Result<SheetValues> {
        (**self).read_values(spreadsheet_id, selection)
    }
}

/// Title of the worksheet `selection` designates among `titles`.
pub fn resolve_title(
    spreadsheet_id: &str,
    titles: &[String],
    selection: &WorksheetSelection,
) -> Result<String> {
    match selection {
        WorksheetSelection::Named(name) => titles
            .iter()
            .find(|title| *title == name)
            .cloned()
            .ok_or_else(|| SheetError::WorksheetNotFound {
                spreadsheet: spreadsheet_id.to_string(),
                worksheet: name.clone(),
            }),
        WorksheetSelection::FirstSheet => {
            titles.first().cloned().ok_or_else(|| SheetError::NoWorksheets {
                spreadsheet: spreadsheet_id.to_string(),
            })
        }
    }
}
