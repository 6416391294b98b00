//! Record sinks for the enquete importer.
//!
//! A [`SinkConnector`] opens one [`RecordSink`] per facility; the sink
//! replaces the facility's rows and inserts the new batch in a single
//! transaction. [`PostgresConnector`] is the production sink,
//! [`DryRunConnector`] only logs and [`MemoryConnector`] keeps tables in
//! memory.

#![deny(unsafe_code)]

pub mod dry_run;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod sink;
pub mod sql;
pub mod value;

pub use dry_run::{DryRunConnector, DryRunSink};
pub use error::{Result, SinkError};
pub use memory::{MemoryConnector, MemorySink, RecordedWrite};
pub use self::postgres::{PostgresConnector, PostgresSink};
pub use sink::{RecordSink, SinkConnector, WriteSummary};
pub use value::SqlValue;
