use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use enquete_core::{FacilityOutcome, FacilityPlan, RunReport};

pub fn print_summary(report: &RunReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Corporation"),
        header_cell("Facility"),
        header_cell("Code"),
        header_cell("Worksheet"),
        header_cell("Tables"),
        header_cell("Inserted"),
        header_cell("Skipped"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    align_column(&mut table, 7, CellAlignment::Center);

    for outcome in &report.outcomes {
        let row = summary_row(outcome);
        table.add_row(vec![
            Cell::new(&row[0]).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(&row[1]),
            Cell::new(&row[2]),
            text_cell(&row[3]),
            text_cell(&row[4]),
            Cell::new(&row[5]),
            count_cell(outcome.skipped_rows(), Color::Yellow),
            status_cell(outcome),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} facilities", report.outcomes.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(report.inserted()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(report.failed_count(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let failures = failure_lines(report);
    if !failures.is_empty() {
        eprintln!("Errors:");
        for line in failures {
            eprintln!("- {line}");
        }
    }
}

/// Plain-text cells of one summary row.
pub fn summary_row(outcome: &FacilityOutcome) -> [String; 8] {
    let tables = if outcome.jobs.is_empty() {
        "-".to_string()
    } else {
        outcome
            .jobs
            .iter()
            .map(|job| job.table.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    [
        outcome.corporation.clone(),
        outcome.facility.clone(),
        outcome.facility_code.to_string(),
        outcome.worksheet.clone().unwrap_or_else(|| "-".to_string()),
        tables,
        outcome.inserted().to_string(),
        outcome.skipped_rows().to_string(),
        status_text(outcome),
    ]
}

pub fn status_text(outcome: &FacilityOutcome) -> String {
    match outcome.failed_stage() {
        None => "ok".to_string(),
        Some(stage) => format!("failed ({stage})"),
    }
}

/// `corporation.facility [kind]: message` for every failed facility.
pub fn failure_lines(report: &RunReport) -> Vec<String> {
    report
        .failed()
        .filter_map(|outcome| {
            let error = outcome.error()?;
            Some(format!(
                "{}.{} [{}]: {error}",
                outcome.corporation,
                outcome.facility,
                error.kind()
            ))
        })
        .collect()
}

pub fn print_plan(plans: &[FacilityPlan]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Facility"),
        header_cell("Code"),
        header_cell("Spreadsheet"),
        header_cell("Worksheet"),
        header_cell("Table"),
        header_cell("Catalog"),
        header_cell("Replace"),
    ]);
    apply_plan_table_style(&mut table);
    align_column(&mut table, 6, CellAlignment::Center);

    for plan in plans {
        for (index, job) in plan.jobs.iter().enumerate() {
            let (facility, code, spreadsheet, worksheet) = if index == 0 {
                (
                    Cell::new(format!("{}.{}", plan.corporation, plan.facility))
                        .fg(Color::Blue)
                        .add_attribute(Attribute::Bold),
                    Cell::new(plan.facility_code.to_string()),
                    Cell::new(&plan.spreadsheet_id),
                    Cell::new(plan.worksheet.to_string()),
                )
            } else {
                (dim_cell(""), dim_cell(""), dim_cell(""), dim_cell(""))
            };
            let catalog = match &job.mapping {
                Ok(mapping) => Cell::new(format!(
                    "{} ({}, {} fields)",
                    mapping.catalog, mapping.source, mapping.fields
                )),
                Err(err) => Cell::new(err.to_string()).fg(Color::Red),
            };
            table.add_row(vec![
                facility,
                code,
                spreadsheet,
                worksheet,
                Cell::new(job.table.as_str()),
                catalog,
                flag_cell(plan.delete),
            ]);
        }
    }
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn apply_plan_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(outcome: &FacilityOutcome) -> Cell {
    if outcome.is_success() {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(status_text(outcome)).fg(Color::Red)
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn text_cell(value: &str) -> Cell {
    if value == "-" {
        dim_cell(value)
    } else {
        Cell::new(value)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
