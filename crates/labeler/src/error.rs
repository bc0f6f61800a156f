// crates/labeler/src/error.rs
use sentiment_pulse_core::StoreError;
use sentiment_pulse_db::DbError;
use thiserror::Error;

/// Failures that end a labeling run early with nothing more to report.
///
/// Invocation failures are not here: they are outcomes recorded in the
/// run report, not errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Storage failure during labeling: {0}")]
    Storage(#[from] StoreError),
}

/// Failures of one ingestion pass over one subreddit.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP request for r/{subreddit} failed: {source}")]
    Http {
        subreddit: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("r/{subreddit} listing returned HTTP {status}")]
    Status { subreddit: String, status: u16 },

    #[error("r/{subreddit} listing could not be decoded: {message}")]
    Decode { subreddit: String, message: String },

    #[error("Storage failure during ingestion: {0}")]
    Storage(#[from] StoreError),
}

/// Failures of a scheduled job, wrapping the job-specific errors.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Label run ledger error: {0}")]
    Ledger(#[from] DbError),
}
