//! A sink that only reports what it would write.

use enquete_model::{DbConfig, FacilityCode, RecordBatch, TableName};
use tracing::info;

use crate::error::Result;
use crate::sink::{RecordSink, SinkConnector, WriteSummary};

#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunConnector;

impl SinkConnector for DryRunConnector {
    type Sink = DryRunSink;

    fn connect(&self, corporation: &str, _db: &DbConfig) -> Result<DryRunSink> {
        Ok(DryRunSink {
            corporation: corporation.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct DryRunSink {
    corporation: String,
}

impl RecordSink for DryRunSink {
    fn write_batch(
        &mut self,
        table: &TableName,
        facility_code: &FacilityCode,
        batch: &RecordBatch,
        replace: bool,
    ) -> Result<WriteSummary> {
        info!(
            corporation = %self.corporation,
            table = %table,
            facility_code = %facility_code,
            replace,
            records = batch.len(),
            columns = batch.columns().len(),
            "dry run: nothing written"
        );
        Ok(WriteSummary {
            deleted: None,
            inserted: batch.len() as u64,
        })
    }
}
