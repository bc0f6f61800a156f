// crates/labeler/src/lib.rs
//! Scheduled Reddit ingestion and LLM sentiment labeling.

pub mod cli;
pub mod error;
pub mod ingest;
pub mod jobs;
pub mod logging;
pub mod pipeline;

pub use error::{IngestError, JobError, PipelineError};
pub use ingest::{IngestReport, Ingestor, RedditClient, RedditPost};
pub use jobs::{LabelJob, LabelJobOutcome, Scheduler, SkipReason};
pub use pipeline::{PipelineRunner, RunOutcome, RunReport};
