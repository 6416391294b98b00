//! Import orchestration for enquete spreadsheets.
//!
//! [`Selection`] picks the facilities of a run; the [`Importer`] takes
//! each through worksheet selection, row fetching, mapping resolution,
//! row coercion and writing, and records a [`FacilityOutcome`] per
//! facility. A failed facility never stops the others.

#![deny(unsafe_code)]

pub mod error;
pub mod importer;
pub mod options;
pub mod plan;
pub mod report;
pub mod selection;
pub mod stage;

pub use error::{FacilityError, SelectionError};
pub use importer::Importer;
pub use options::{DEFAULT_TABLE, ImportOptions, RowFailurePolicy};
pub use plan::{FacilityPlan, JobPlan, MappingPlan, plan_facilities};
pub use report::{FacilityOutcome, FacilityStatus, JobOutcome, RunReport};
pub use selection::{Selection, Target, qualified_key};
pub use stage::ImportStage;
