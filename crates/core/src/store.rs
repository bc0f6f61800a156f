// crates/core/src/store.rs
//! The narrow storage interface the labeling pipeline and ingestion consume.

use async_trait::async_trait;
use thiserror::Error;

use crate::sentiment::{NewPost, PostFields, Sentiment};

/// Failure in the storage backend. Always fatal for the current run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage failure: {0}")]
    Backend(String),

    #[error("Post not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage gateway for posts.
///
/// Implementations must be safe to share between the ingestion and labeling
/// jobs; each call acquires its own connection.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Whether a post with this external id is already stored.
    async fn post_exists(&self, post_id: &str) -> StoreResult<bool>;

    /// Insert a pending post. Returns `false` if the id already existed.
    async fn add_record(&self, post: &NewPost) -> StoreResult<bool>;

    /// Ids of every post without a sentiment, in insertion order.
    async fn list_pending_ids(&self) -> StoreResult<Vec<String>>;

    /// Prompt fields of one post, `None` if the post does not exist.
    async fn fetch_fields(&self, post_id: &str) -> StoreResult<Option<PostFields>>;

    /// Record the label and the model that produced it.
    async fn set_sentiment(
        &self,
        post_id: &str,
        sentiment: Sentiment,
        model_version: &str,
    ) -> StoreResult<()>;

    /// Record an `INVALID` outcome for the given model.
    async fn set_invalid(&self, post_id: &str, model_version: &str) -> StoreResult<()> {
        self.set_sentiment(post_id, Sentiment::Invalid, model_version)
            .await
    }

    /// Total number of stored posts.
    async fn count(&self) -> StoreResult<i64>;

    /// Id of the most recently labeled post, used to build health-check
    /// probes. `None` when nothing has been labeled yet.
    async fn fetch_any_labeled_id(&self) -> StoreResult<Option<String>>;
}
