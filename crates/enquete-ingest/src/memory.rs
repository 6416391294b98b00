//! Sheet source backed by in-memory grids.

use std::collections::BTreeMap;

use enquete_map::WorksheetSelection;
use tracing::debug;

use crate::error::{Result, SheetError};
use crate::source::{SheetSource, resolve_title};
use crate::values::SheetValues;

/// Spreadsheets held in memory, keyed by spreadsheet id. Worksheets keep
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySheetSource {
    spreadsheets: BTreeMap<String, Vec<(String, Vec<Vec<String>>)>>,
}

impl MemorySheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_worksheet<R, C>(&mut self, spreadsheet_id: &str, title: &str, rows: R)
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let grid: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.spreadsheets
            .entry(spreadsheet_id.to_string())
            .or_default()
            .push((title.to_string(), grid));
    }

    /// Builder form of [`insert_worksheet`](Self::insert_worksheet).
    pub fn with_worksheet<R, C>(mut self, spreadsheet_id: &str, title: &str, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.insert_worksheet(spreadsheet_id, title, rows);
        self
    }

    fn worksheets(&self, spreadsheet_id: &str) -> Result<&[(String, Vec<Vec<String>>)]> {
        self.spreadsheets
            .get(spreadsheet_id)
            .map(Vec::as_slice)
            .ok_or_else(|| SheetError::Api {
                status: 404,
                message: format!("spreadsheet {spreadsheet_id} not found"),
            })
    }
}

impl SheetSource for MemorySheetSource {
    fn worksheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        Ok(self
            .worksheets(spreadsheet_id)?
            .iter()
            .map(|(title, _)| title.clone())
            .collect())
    }

    fn read_values(
        &self,
        spreadsheet_id: &str,
        selection: &WorksheetSelection,
    ) -> Result<SheetValues> {
        let titles = self.worksheet_titles(spreadsheet_id)?;
        let title = resolve_title(spreadsheet_id, &titles, selection)?;
        let grid = self
            .worksheets(spreadsheet_id)?
            .iter()
            .find(|(name, _)| *name == title)
            .map(|(_, grid)| grid.clone())
            .unwrap_or_default();
        debug!(spreadsheet = spreadsheet_id, worksheet = %title, rows = grid.len(), "worksheet read");
        SheetValues::from_grid(title.as_str(), grid).ok_or_else(|| SheetError::EmptyWorksheet {
            spreadsheet: spreadsheet_id.to_string(),
            worksheet: title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sheet_and_named_sheet() {
        let source = MemorySheetSource::new()
            .with_worksheet("sheet", "回答", [vec!["氏名"], vec!["山田"]])
            .with_worksheet("sheet", "集計", [vec!["合計"], vec!["1"]]);

        let first = source
            .read_values("sheet", &WorksheetSelection::FirstSheet)
            .unwrap();
        assert_eq!(first.worksheet, "回答");
        assert_eq!(first.header, vec!["氏名".to_string()]);

        let named = source
            .read_values("sheet", &WorksheetSelection::Named("集計".to_string()))
            .unwrap();
        assert_eq!(named.rows, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_missing_spreadsheet_and_empty_sheet() {
        let source = MemorySheetSource::new().with_worksheet("sheet", "空", Vec::<Vec<&str>>::new());
        assert!(source.worksheet_titles("other").is_err());
        let err = source
            .read_values("sheet", &WorksheetSelection::FirstSheet)
            .unwrap_err();
        assert!(matches!(err, SheetError::EmptyWorksheet { .. }));
    }
}
