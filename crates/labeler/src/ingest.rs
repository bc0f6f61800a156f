// crates/labeler/src/ingest.rs
//! Reddit `/new` listing ingestion into the post store.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sentiment_pulse_core::{ConfigError, IngestConfig, NewPost, PostStore};
use tokio_util::sync::CancellationToken;

use crate::error::IngestError;

/// One post as returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditPost {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub subreddit: Option<String>,
}

impl RedditPost {
    fn into_new_post(self, requested: &str) -> NewPost {
        let created_at = DateTime::from_timestamp(self.created_utc as i64, 0).unwrap_or_else(Utc::now);
        NewPost {
            post_id: self.id,
            created_at,
            source: self.subreddit.unwrap_or_else(|| requested.to_string()),
            title: self.title,
            body: self.selftext,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RedditPost,
}

/// Result of ingesting one subreddit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub subreddit: String,
    /// Posts returned by the listing.
    pub seen: usize,
    /// Posts that were new and got stored.
    pub inserted: usize,
}

/// HTTP client for the public Reddit JSON listings.
pub struct RedditClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
    post_limit: u32,
    request_delay: Duration,
}

impl RedditClient {
    pub fn new(config: &IngestConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            post_limit: config.post_limit,
            request_delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    /// Newest posts of a subreddit, up to the configured post limit.
    pub async fn fetch_new(&self, subreddit: &str) -> Result<Vec<RedditPost>, IngestError> {
        let limit = self.post_limit as usize;
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let page_limit = (limit - posts.len()).min(self.page_size as usize);
            let page = self
                .fetch_page(subreddit, page_limit, after.as_deref())
                .await?;
            let count = page.children.len();
            posts.extend(
                page.children
                    .into_iter()
                    .take(limit - posts.len())
                    .map(|c| c.data),
            );

            match page.after {
                Some(cursor) if count > 0 => after = Some(cursor),
                _ => break,
            }
            if posts.len() < limit && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        Ok(posts)
    }

    async fn fetch_page(
        &self,
        subreddit: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<ListingData, IngestError> {
        let url = format!("{}/r/{}/new.json", self.base_url, subreddit);
        let mut query = vec![("limit", limit.to_string()), ("raw_json", "1".to_string())];
        if let Some(cursor) = after {
            query.push(("after", cursor.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|source| IngestError::Http {
                subreddit: subreddit.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                subreddit: subreddit.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| IngestError::Http {
            subreddit: subreddit.to_string(),
            source,
        })?;
        let listing: Listing =
            serde_json::from_str(&body).map_err(|e| IngestError::Decode {
                subreddit: subreddit.to_string(),
                message: e.to_string(),
            })?;
        Ok(listing.data)
    }
}

/// Stores new posts from Reddit, skipping ids already present.
pub struct Ingestor<'a> {
    client: &'a RedditClient,
    store: &'a dyn PostStore,
    insert_delay: Duration,
}

impl<'a> Ingestor<'a> {
    pub fn new(client: &'a RedditClient, store: &'a dyn PostStore, insert_delay: Duration) -> Self {
        Self {
            client,
            store,
            insert_delay,
        }
    }

    /// Ingest one subreddit.
    pub async fn ingest_subreddit(&self, subreddit: &str) -> Result<IngestReport, IngestError> {
        let posts = self.client.fetch_new(subreddit).await?;
        let mut report = IngestReport {
            subreddit: subreddit.to_string(),
            seen: posts.len(),
            inserted: 0,
        };

        for post in posts {
            if self.store.post_exists(&post.id).await? {
                tracing::debug!(post_id = %post.id, "post already stored");
                continue;
            }
            let record = post.into_new_post(subreddit);
            if self.store.add_record(&record).await? {
                report.inserted += 1;
                tracing::debug!(post_id = %record.post_id, subreddit, "post stored");
                if !self.insert_delay.is_zero() {
                    tokio::time::sleep(self.insert_delay).await;
                }
            }
        }

        let total = self.store.count().await?;
        tracing::info!(
            subreddit,
            seen = report.seen,
            inserted = report.inserted,
            total_posts = total,
            "ingestion finished"
        );
        Ok(report)
    }

    /// Ingest each subreddit in turn. A failing subreddit is logged and does
    /// not stop the others; cancellation stops between subreddits.
    pub async fn ingest_all(
        &self,
        subreddits: &[String],
        cancel: &CancellationToken,
    ) -> Vec<Result<IngestReport, IngestError>> {
        let mut results = Vec::with_capacity(subreddits.len());
        for subreddit in subreddits {
            if cancel.is_cancelled() {
                break;
            }
            let result = self.ingest_subreddit(subreddit).await;
            if let Err(e) = &result {
                tracing::warn!(subreddit = %subreddit, error = %e, "ingestion failed");
            }
            results.push(result);
        }
        results
    }
}
