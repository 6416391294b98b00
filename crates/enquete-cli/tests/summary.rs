//! Plain-text content of the run summary.

use enquete_cli::summary::{failure_lines, status_text, summary_row};
use enquete_core::{FacilityError, FacilityOutcome, FacilityStatus, ImportStage, JobOutcome, RunReport};
use enquete_db::WriteSummary;
use enquete_ingest::SheetError;
use enquete_map::{CatalogSource, HeaderError};
use enquete_model::FacilityCode;

fn done(facility: &str, inserted: u64, skipped: usize) -> FacilityOutcome {
    FacilityOutcome {
        corporation: "acme".to_string(),
        facility: facility.to_string(),
        facility_code: FacilityCode::Integer(101),
        worksheet: Some("フォームの回答 1".to_string()),
        jobs: vec![
            JobOutcome {
                table: "enquetes".to_string(),
                catalog: "default".to_string(),
                source: CatalogSource::CorporationDefault,
                written: WriteSummary {
                    deleted: Some(3),
                    inserted,
                },
                skipped_rows: skipped,
            },
            JobOutcome {
                table: "seasonal".to_string(),
                catalog: "default".to_string(),
                source: CatalogSource::RootDefault,
                written: WriteSummary {
                    deleted: None,
                    inserted: 1,
                },
                skipped_rows: 0,
            },
        ],
        blank_rows: 0,
        status: FacilityStatus::Done,
    }
}

fn failed(facility: &str, stage: ImportStage, error: FacilityError) -> FacilityOutcome {
    FacilityOutcome {
        corporation: "acme".to_string(),
        facility: facility.to_string(),
        facility_code: FacilityCode::Text("OSK".to_string()),
        worksheet: None,
        jobs: Vec::new(),
        blank_rows: 0,
        status: FacilityStatus::Failed { stage, error },
    }
}

#[test]
fn successful_facility_row() {
    let row = summary_row(&done("tokyo", 4, 1));
    assert_eq!(
        row,
        [
            "acme".to_string(),
            "tokyo".to_string(),
            "101".to_string(),
            "フォームの回答 1".to_string(),
            "enquetes, seasonal".to_string(),
            "5".to_string(),
            "1".to_string(),
            "ok".to_string(),
        ]
    );
}

#[test]
fn failed_facility_row_names_stage() {
    let outcome = failed(
        "osaka",
        ImportStage::RowCoercing,
        FacilityError::Header(HeaderError::NotFound {
            headers: vec!["入居日".to_string()],
        }),
    );
    let row = summary_row(&outcome);
    assert_eq!(row[2], "OSK");
    assert_eq!(row[3], "-");
    assert_eq!(row[4], "-");
    assert_eq!(row[5], "0");
    assert_eq!(status_text(&outcome), "failed (row-coercing)");
}

#[test]
fn failure_lines_list_only_failed_facilities() {
    let report = RunReport {
        outcomes: vec![
            done("tokyo", 2, 0),
            failed(
                "nagoya",
                ImportStage::RowsFetching,
                FacilityError::Sheet(SheetError::NoWorksheets {
                    spreadsheet: "sheet-nagoya".to_string(),
                }),
            ),
        ],
    };
    assert_eq!(report.inserted(), 3);
    insta::assert_snapshot!(
        failure_lines(&report).join("\n"),
        @"acme.nagoya [external I/O]: spreadsheet sheet-nagoya has no worksheets"
    );
}
