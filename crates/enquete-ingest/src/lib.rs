//! Spreadsheet sources for enquete imports.
//!
//! [`SheetSource`] is the seam the import orchestrator reads through.
//! [`GoogleSheetsClient`] talks to Google Sheets as a service account;
//! [`MemorySheetSource`] serves grids held in memory.

#![deny(unsafe_code)]

pub mod error;
pub mod google;
pub mod memory;
pub mod source;
pub mod values;

pub use error::{Result, SheetError};
pub use google::{GoogleSheetsClient, ServiceAccountKey};
pub use memory::MemorySheetSource;
pub use source::{SheetSource, resolve_title};
pub use values::{DataRow, SheetValues, is_blank_row};
