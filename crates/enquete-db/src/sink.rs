//! Record sink traits.

use std::fmt;

use enquete_model::{DbConfig, FacilityCode, RecordBatch, TableName};

use crate::error::Result;

/// Outcome of one [`RecordSink::write_batch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Rows deleted before the insert; `None` when nothing was deleted
    /// because replacement was off or the sink does not count.
    pub deleted: Option<u64>,
    pub inserted: u64,
}

impl fmt::Display for WriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.deleted {
            Some(deleted) => write!(f, "{deleted} deleted, {} inserted", self.inserted),
            None => write!(f, "{} inserted", self.inserted),
        }
    }
}

/// Destination for the records of one facility.
pub trait RecordSink {
    /// Writes `batch` into `table`.
    ///
    /// With `replace`, rows whose `facility_code` equals `facility_code`
    /// are deleted first, even when the batch is empty. Delete and insert
    /// commit together or not at all.
    fn write_batch(
        &mut self,
        table: &TableName,
        facility_code: &FacilityCode,
        batch: &RecordBatch,
        replace: bool,
    ) -> Result<WriteSummary>;
}

/// Opens a [`RecordSink`] for a corporation database.
pub trait SinkConnector {
    type Sink: RecordSink;

    fn connect(&self, corporation: &str, db: &DbConfig) -> Result<Self::Sink>;
}

impl<C: SinkConnector + ?Sized> SinkConnector for &C {
    type Sink = C::Sink;

    fn connect(&self, corporation: &str, db: &DbConfig) -> Result<Self::Sink> {
        (**self).connect(corporation, db)
    }
}
