// crates/db/src/queries/mod.rs
// Post, run ledger and dashboard queries for the sentiment-pulse database.

mod posts;
mod runs;
mod stats;

pub(crate) use posts::now_timestamp;
pub use runs::{LabelRun, LabelRunStatus, LabelRunSummary};
pub use stats::{LabelShare, SentimentStats};
