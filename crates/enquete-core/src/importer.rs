//! The per-facility import pipeline.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, Utc};
use enquete_db::{RecordSink, SinkConnector};
use enquete_ingest::SheetSource;
use enquete_map::{HeaderIndex, MappingResolver, ResolvedMapping, select_worksheet};
use enquete_model::{
    Config, Corporation, Facility, FacilityCode, GENERATED_COLUMNS, RecordBatch, TableName,
};
use enquete_transform::{RecordStamp, RowCoercer, RowError};
use tracing::{debug, error, info, info_span, warn};

use crate::error::FacilityError;
use crate::options::{ImportOptions, RowFailurePolicy};
use crate::report::{FacilityOutcome, FacilityStatus, JobOutcome, RunReport};
use crate::selection::Target;
use crate::stage::ImportStage;

/// Imports facilities one at a time from a sheet source into a sink.
///
/// Each facility gets its own sink connection, opened once its records
/// are ready and dropped before the next facility starts.
pub struct Importer<'c, S, C> {
    config: &'c Config,
    source: S,
    connector: C,
    coercer: RowCoercer,
    options: ImportOptions,
    import_date: DateTime<FixedOffset>,
    /// Tables already cleared for a facility code during this run.
    cleared: BTreeSet<(TableName, FacilityCode)>,
}

struct PreparedJob {
    table: TableName,
    mapping: ResolvedMapping,
    batch: RecordBatch,
    skipped_rows: usize,
}

/// Mutable state of one facility import.
struct Progress {
    stage: ImportStage,
    worksheet: Option<String>,
    blank_rows: usize,
    jobs: Vec<JobOutcome>,
}

impl Progress {
    fn advance(&mut self, next: ImportStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "{} -> {next}",
            self.stage
        );
        debug!(from = %self.stage, to = %next, "stage");
        self.stage = next;
    }
}

impl<'c, S, C> Importer<'c, S, C>
where
    S: SheetSource,
    C: SinkConnector,
{
    pub fn new(config: &'c Config, source: S, connector: C, options: ImportOptions) -> Self {
        let coercer = RowCoercer::from_settings(&config.text, config.timezone)
            .unwrap_or_else(|| RowCoercer::default().with_timezone(config.timezone));
        Self {
            config,
            source,
            connector,
            coercer,
            options,
            import_date: Utc::now().with_timezone(&config.timezone).fixed_offset(),
            cleared: BTreeSet::new(),
        }
    }

    pub fn with_coercer(mut self, coercer: RowCoercer) -> Self {
        self.coercer = coercer;
        self
    }

    /// Timestamp written to `import_date`; defaults to the start of the run.
    pub fn with_import_date(mut self, import_date: DateTime<FixedOffset>) -> Self {
        self.import_date = import_date;
        self
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Imports every target in order. Facility failures are recorded in
    /// the report and never stop the run.
    pub fn run(&mut self, targets: &[Target<'c>]) -> RunReport {
        info!(facilities = targets.len(), "import started");
        let mut report = RunReport::default();
        for (corporation, facility) in targets {
            report
                .outcomes
                .push(self.import_facility(corporation, facility));
        }
        info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            inserted = report.inserted(),
            "import finished"
        );
        report
    }

    pub fn import_facility(
        &mut self,
        corporation: &Corporation,
        facility: &Facility,
    ) -> FacilityOutcome {
        let span = info_span!(
            "facility",
            corporation = %corporation.key,
            facility = %facility.key
        );
        let _enter = span.enter();
        info!(facility_code = %facility.facility_code, "processing facility");

        let mut progress = Progress {
            stage: ImportStage::Pending,
            worksheet: None,
            blank_rows: 0,
            jobs: Vec::new(),
        };
        let status = match self.run_pipeline(corporation, facility, &mut progress) {
            Ok(()) => {
                progress.advance(ImportStage::Done);
                info!(
                    inserted = progress.jobs.iter().map(|job| job.written.inserted).sum::<u64>(),
                    "facility imported"
                );
                FacilityStatus::Done
            }
            Err(err) => {
                let stage = progress.stage;
                progress.advance(ImportStage::Failed);
                error!(stage = %stage, kind = err.kind(), error = %err, "facility import failed");
                FacilityStatus::Failed { stage, error: err }
            }
        };

        FacilityOutcome {
            corporation: corporation.key.clone(),
            facility: facility.key.clone(),
            facility_code: facility.facility_code.clone(),
            worksheet: progress.worksheet,
            jobs: progress.jobs,
            blank_rows: progress.blank_rows,
            status,
        }
    }

    fn run_pipeline(
        &mut self,
        corporation: &Corporation,
        facility: &Facility,
        progress: &mut Progress,
    ) -> Result<(), FacilityError> {
        progress.advance(ImportStage::WorksheetResolving);
        let selection = select_worksheet(facility, &self.config.google);
        debug!(worksheet = %selection, "worksheet selected");

        progress.advance(ImportStage::RowsFetching);
        let values = self
            .source
            .read_values(&facility.spreadsheet.id, &selection)?;
        progress.worksheet = Some(values.worksheet.clone());
        progress.blank_rows = values.blank_row_count();
        info!(
            worksheet = %values.worksheet,
            rows = values.rows.len() - progress.blank_rows,
            blank_rows = progress.blank_rows,
            "worksheet read"
        );

        progress.advance(ImportStage::MappingResolving);
        let specs = facility.import_jobs();
        let jobs = specs
            .iter()
            .map(|job| -> Result<_, FacilityError> {
                let mapping = MappingResolver::new(&self.config.mappings)
                    .resolve_job(corporation, facility, job)?;
                let table = job
                    .table
                    .clone()
                    .unwrap_or_else(|| self.options.default_table.clone());
                Ok((table, mapping))
            })
            .collect::<Result<Vec<_>, _>>()?;

        progress.advance(ImportStage::RowCoercing);
        let headers = HeaderIndex::new(&values.header);
        headers.resolve(jobs.iter().flat_map(|(_, mapping)| mapping.required_headers()))?;
        let stamp = RecordStamp::for_facility(facility, self.import_date);
        let mut prepared = Vec::with_capacity(jobs.len());
        for (table, mapping) in jobs {
            let mut columns: Vec<String> = mapping
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            columns.extend(GENERATED_COLUMNS.iter().map(|column| (*column).to_string()));

            let mut batch = RecordBatch::new(columns);
            let mut skipped_rows = 0;
            for row in values.data_rows() {
                match self.coercer.coerce(row.cells, &mapping, &headers) {
                    Ok(mut record) => {
                        stamp.apply(&mut record);
                        batch.push(record);
                    }
                    Err(err) => match self.options.row_failure {
                        RowFailurePolicy::AbortFacility => {
                            return Err(FacilityError::Row {
                                row: row.number,
                                source: err,
                            });
                        }
                        RowFailurePolicy::SkipRow => {
                            self.log_skipped_row(&table, row.number, &err);
                            skipped_rows += 1;
                        }
                    },
                }
            }
            debug!(
                table = %table,
                catalog = mapping.catalog(),
                records = batch.len(),
                skipped_rows,
                "rows coerced"
            );
            prepared.push(PreparedJob {
                table,
                mapping,
                batch,
                skipped_rows,
            });
        }

        progress.advance(ImportStage::Writing);
        let mut sink = self.connector.connect(&corporation.key, &corporation.db)?;
        for job in prepared {
            let key = (job.table.clone(), facility.facility_code.clone());
            let replace = facility.delete && !self.cleared.contains(&key);
            let written =
                sink.write_batch(&job.table, &facility.facility_code, &job.batch, replace)?;
            if replace {
                self.cleared.insert(key);
            }
            info!(
                table = %job.table,
                catalog = job.mapping.catalog(),
                written = %written,
                "records written"
            );
            progress.jobs.push(JobOutcome {
                table: job.table.to_string(),
                catalog: job.mapping.catalog().to_string(),
                source: job.mapping.source(),
                written,
                skipped_rows: job.skipped_rows,
            });
        }
        Ok(())
    }

    fn log_skipped_row(&self, table: &TableName, row: usize, err: &RowError) {
        let column = err.column().unwrap_or_default();
        match err {
            RowError::Coercion(coercion) if self.options.log_data => warn!(
                table = %table,
                row,
                column,
                value = %coercion.value,
                error = %err,
                "row skipped"
            ),
            _ => warn!(table = %table, row, column, error = %err, "row skipped"),
        }
    }
}
