//! Per-facility outcomes and the run report.

use enquete_db::WriteSummary;
use enquete_map::CatalogSource;
use enquete_model::FacilityCode;

use crate::error::FacilityError;
use crate::stage::ImportStage;

/// One table written for a facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub table: String,
    pub catalog: String,
    pub source: CatalogSource,
    pub written: WriteSummary,
    /// Rows left out under the skip-row policy.
    pub skipped_rows: usize,
}

#[derive(Debug)]
pub enum FacilityStatus {
    Done,
    /// Import stopped at `stage`.
    Failed {
        stage: ImportStage,
        error: FacilityError,
    },
}

#[derive(Debug)]
pub struct FacilityOutcome {
    pub corporation: String,
    pub facility: String,
    pub facility_code: FacilityCode,
    /// Title of the worksheet that was read, once known.
    pub worksheet: Option<String>,
    pub jobs: Vec<JobOutcome>,
    pub blank_rows: usize,
    pub status: FacilityStatus,
}

impl FacilityOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, FacilityStatus::Done)
    }

    pub fn error(&self) -> Option<&FacilityError> {
        match &self.status {
            FacilityStatus::Done => None,
            FacilityStatus::Failed { error, .. } => Some(error),
        }
    }

    pub fn failed_stage(&self) -> Option<ImportStage> {
        match &self.status {
            FacilityStatus::Done => None,
            FacilityStatus::Failed { stage, .. } => Some(*stage),
        }
    }

    pub fn inserted(&self) -> u64 {
        self.jobs.iter().map(|job| job.written.inserted).sum()
    }

    pub fn skipped_rows(&self) -> usize {
        self.jobs.iter().map(|job| job.skipped_rows).sum()
    }
}

/// Outcomes of every attempted facility, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<FacilityOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(FacilityOutcome::is_success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &FacilityOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }

    pub fn inserted(&self) -> u64 {
        self.outcomes.iter().map(FacilityOutcome::inserted).sum()
    }
}
