//! In-memory tables for tests and local runs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use enquete_model::{
    DbConfig, FACILITY_CODE_COLUMN, FacilityCode, RecordBatch, TableName, TypedRecord, Value,
};

use crate::error::{Result, SinkError};
use crate::sink::{RecordSink, SinkConnector, WriteSummary};

/// One `write_batch` call as seen by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    pub corporation: String,
    pub table: String,
    pub facility_code: FacilityCode,
    pub replace: bool,
    pub columns: Vec<String>,
    pub records: usize,
}

#[derive(Debug, Default)]
struct Store {
    tables: BTreeMap<String, Vec<TypedRecord>>,
    writes: Vec<RecordedWrite>,
    connections: usize,
}

/// Shared in-memory database. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    store: Arc<Mutex<Store>>,
    unreachable: BTreeSet<String>,
    read_only: BTreeSet<String>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connections for `corporation` fail.
    pub fn with_unreachable(mut self, corporation: impl Into<String>) -> Self {
        self.unreachable.insert(corporation.into());
        self
    }

    /// Writes to `table` fail without touching its rows.
    pub fn with_read_only_table(mut self, table: impl Into<String>) -> Self {
        self.read_only.insert(table.into());
        self
    }

    /// Pre-existing rows of `table`.
    pub fn seed(&self, table: &str, records: impl IntoIterator<Item = TypedRecord>) {
        self.lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(records);
    }

    pub fn records(&self, table: &str) -> Vec<TypedRecord> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.lock().writes.clone()
    }

    pub fn connections(&self) -> usize {
        self.lock().connections
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SinkConnector for MemoryConnector {
    type Sink = MemorySink;

    fn connect(&self, corporation: &str, _db: &DbConfig) -> Result<MemorySink> {
        if self.unreachable.contains(corporation) {
            return Err(SinkError::Unavailable(format!(
                "database of corporation '{corporation}' is unreachable"
            )));
        }
        self.lock().connections += 1;
        Ok(MemorySink {
            connector: self.clone(),
            corporation: corporation.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct MemorySink {
    connector: MemoryConnector,
    corporation: String,
}

impl RecordSink for MemorySink {
    fn write_batch(
        &mut self,
        table: &TableName,
        facility_code: &FacilityCode,
        batch: &RecordBatch,
        replace: bool,
    ) -> Result<WriteSummary> {
        if self.connector.read_only.contains(table.as_str()) {
            return Err(SinkError::Unavailable(format!("table {table} is read-only")));
        }

        let mut store = self.connector.lock();
        store.writes.push(RecordedWrite {
            corporation: self.corporation.clone(),
            table: table.to_string(),
            facility_code: facility_code.clone(),
            replace,
            columns: batch.columns().to_vec(),
            records: batch.len(),
        });

        let rows = store.tables.entry(table.to_string()).or_default();
        let deleted = replace.then(|| {
            let code = Value::from(facility_code);
            let before = rows.len();
            rows.retain(|record| record.get(FACILITY_CODE_COLUMN) != Some(&code));
            (before - rows.len()) as u64
        });
        rows.extend(batch.records().iter().cloned());

        Ok(WriteSummary {
            deleted,
            inserted: batch.len() as u64,
        })
    }
}
