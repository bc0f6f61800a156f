// crates/labeler/src/jobs/types.rs
//! Types for the background job system.

use crate::pipeline::RunReport;

/// The two recurring jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Ingest,
    Label,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingest => "ingest",
            Self::Label => "label",
        }
    }
}

/// Why a labeling tick did not start a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A run in this process still holds the lock.
    InProcess,
    /// The ledger shows another run (possibly another process) in progress.
    LedgerBusy,
}

/// Result of one labeling tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelJobOutcome {
    Ran { run_id: i64, report: RunReport },
    Skipped(SkipReason),
}
