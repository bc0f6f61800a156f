// crates/labeler/src/jobs/mod.rs
//! Scheduled ingestion and labeling jobs.

pub mod label;
pub mod scheduler;
pub mod types;

pub use label::LabelJob;
pub use scheduler::Scheduler;
pub use types::{JobKind, LabelJobOutcome, SkipReason};
