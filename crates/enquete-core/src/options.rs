use std::fmt;
use std::str::FromStr;

use enquete_model::TableName;

/// Table used when neither the import job nor the facility names one.
pub const DEFAULT_TABLE: &str = "enquetes";

/// What to do with a row that fails coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowFailurePolicy {
    /// Fail the facility; nothing is written for it.
    #[default]
    AbortFacility,
    /// Log the row and continue without it.
    SkipRow,
}

impl RowFailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AbortFacility => "abort-facility",
            Self::SkipRow => "skip-row",
        }
    }
}

impl fmt::Display for RowFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RowFailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "abort-facility" => Ok(Self::AbortFacility),
            "skip-row" => Ok(Self::SkipRow),
            other => Err(format!("unknown row failure policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub default_table: TableName,
    pub row_failure: RowFailurePolicy,
    /// Include cell values in row-level log events.
    pub log_data: bool,
}

impl ImportOptions {
    pub fn new(default_table: TableName) -> Self {
        Self {
            default_table,
            row_failure: RowFailurePolicy::default(),
            log_data: false,
        }
    }

    pub fn with_row_failure(mut self, policy: RowFailurePolicy) -> Self {
        self.row_failure = policy;
        self
    }

    pub fn with_log_data(mut self, log_data: bool) -> Self {
        self.log_data = log_data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_round_trips_through_str() {
        for policy in [RowFailurePolicy::AbortFacility, RowFailurePolicy::SkipRow] {
            assert_eq!(policy.as_str().parse::<RowFailurePolicy>(), Ok(policy));
        }
        assert!("skip".parse::<RowFailurePolicy>().is_err());
    }

    #[test]
    fn defaults() {
        let options = ImportOptions::new(TableName::new(DEFAULT_TABLE).unwrap());
        assert_eq!(options.default_table.as_str(), "enquetes");
        assert_eq!(options.row_failure, RowFailurePolicy::AbortFacility);
        assert!(!options.log_data);
    }
}
