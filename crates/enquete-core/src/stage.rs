//! Per-facility import stages.

use std::fmt;

/// Where a facility import is. Stages advance in declaration order;
/// `Failed` can follow any stage before `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportStage {
    Pending,
    WorksheetResolving,
    RowsFetching,
    MappingResolving,
    RowCoercing,
    Writing,
    Done,
    Failed,
}

impl ImportStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::WorksheetResolving => "worksheet-resolving",
            Self::RowsFetching => "rows-fetching",
            Self::MappingResolving => "mapping-resolving",
            Self::RowCoercing => "row-coercing",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` may follow `self`.
    pub fn can_advance_to(self, next: ImportStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == Self::Failed || next as u8 == self as u8 + 1
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_advance_one_step_at_a_time() {
        assert!(ImportStage::Pending.can_advance_to(ImportStage::WorksheetResolving));
        assert!(ImportStage::Writing.can_advance_to(ImportStage::Done));
        assert!(!ImportStage::Pending.can_advance_to(ImportStage::RowsFetching));
        assert!(!ImportStage::RowCoercing.can_advance_to(ImportStage::MappingResolving));
    }

    #[test]
    fn test_failed_reachable_until_terminal() {
        assert!(ImportStage::Pending.can_advance_to(ImportStage::Failed));
        assert!(ImportStage::Writing.can_advance_to(ImportStage::Failed));
        assert!(!ImportStage::Done.can_advance_to(ImportStage::Failed));
        assert!(!ImportStage::Failed.can_advance_to(ImportStage::Failed));
    }
}
