//! What an import would do, without reading sheets or writing rows.

use enquete_map::{CatalogSource, MappingError, MappingResolver, WorksheetSelection, select_worksheet};
use enquete_model::{Config, FacilityCode, TableName};

use crate::selection::Target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPlan {
    pub table: TableName,
    pub mapping: Result<MappingPlan, MappingError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPlan {
    pub catalog: String,
    pub source: CatalogSource,
    pub fields: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityPlan {
    pub corporation: String,
    pub facility: String,
    pub facility_code: FacilityCode,
    pub spreadsheet_id: String,
    pub worksheet: WorksheetSelection,
    pub delete: bool,
    pub jobs: Vec<JobPlan>,
}

impl FacilityPlan {
    pub fn is_resolvable(&self) -> bool {
        self.jobs.iter().all(|job| job.mapping.is_ok())
    }
}

/// Worksheet, tables and catalogs each target would use.
pub fn plan_facilities(
    config: &Config,
    targets: &[Target<'_>],
    default_table: &TableName,
) -> Vec<FacilityPlan> {
    targets
        .iter()
        .map(|(corporation, facility)| {
            let specs = facility.import_jobs();
            let jobs = specs
                .iter()
                .map(|job| JobPlan {
                    table: job.table.clone().unwrap_or_else(|| default_table.clone()),
                    mapping: MappingResolver::new(&config.mappings)
                        .resolve_job(corporation, facility, job)
                        .map(|mapping| MappingPlan {
                            catalog: mapping.catalog().to_string(),
                            source: mapping.source(),
                            fields: mapping.fields().len(),
                        }),
                })
                .collect();
            FacilityPlan {
                corporation: corporation.key.clone(),
                facility: facility.key.clone(),
                facility_code: facility.facility_code.clone(),
                spreadsheet_id: facility.spreadsheet.id.clone(),
                worksheet: select_worksheet(facility, &config.google),
                delete: facility.delete,
                jobs,
            }
        })
        .collect()
}
