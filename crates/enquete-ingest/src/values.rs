//! Header and data rows read from one worksheet.

/// The cells of one worksheet, as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetValues {
    /// Title of the worksheet that was read.
    pub worksheet: String,
    pub header: Vec<String>,
    /// Data rows below the header, in sheet order. Rows may be shorter
    /// than the header when trailing cells are empty.
    pub rows: Vec<Vec<String>>,
}

/// One non-blank data row with its 1-based sheet row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRow<'a> {
    pub number: usize,
    pub cells: &'a [String],
}

impl SheetValues {
    /// Splits a value grid into header and data rows; `None` for an empty
    /// grid.
    pub fn from_grid(worksheet: impl Into<String>, grid: Vec<Vec<String>>) -> Option<Self> {
        let mut grid = grid.into_iter();
        let header = grid.next()?;
        Some(Self {
            worksheet: worksheet.into(),
            header,
            rows: grid.collect(),
        })
    }

    /// Data rows that have at least one non-blank cell.
    pub fn data_rows(&self) -> impl Iterator<Item = DataRow<'_>> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, cells)| !is_blank_row(cells))
            .map(|(index, cells)| DataRow {
                // Row 1 is the header.
                number: index + 2,
                cells,
            })
    }

    pub fn blank_row_count(&self) -> usize {
        self.rows.iter().filter(|cells| is_blank_row(cells)).count()
    }
}

pub fn is_blank_row(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}
