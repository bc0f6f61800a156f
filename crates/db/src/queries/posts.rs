// crates/db/src/queries/posts.rs
// Post CRUD operations and the PostStore implementation.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sentiment_pulse_core::{NewPost, PostFields, PostStore, Sentiment, StoreResult};

use crate::{Database, DbResult};

/// Fixed-width UTC timestamp so stored values sort lexicographically.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    /// Check whether a post with the given external id exists.
    pub async fn post_exists(&self, post_id: &str) -> DbResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM posts WHERE post_id = ?1")
            .bind(post_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.is_some())
    }

    /// Insert a new pending post. Returns `false` when the id already exists.
    pub async fn add_post(&self, post: &NewPost) -> DbResult<bool> {
        let created_at = post.created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO posts (post_id, created_at, subreddit, title, content)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&post.post_id)
        .bind(&created_at)
        .bind(&post.source)
        .bind(&post.title)
        .bind(&post.body)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Ids of posts with no sentiment, oldest insertion first.
    pub async fn get_pending_post_ids(&self) -> DbResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT post_id FROM posts WHERE sentiment IS NULL ORDER BY id ASC")
                .fetch_all(self.pool())
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Title, content and subreddit of a post.
    pub async fn get_post_fields(&self, post_id: &str) -> DbResult<Option<PostFields>> {
        let row: Option<(Option<String>, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT title, content, subreddit FROM posts WHERE post_id = ?1",
        )
        .bind(post_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|(title, body, source)| PostFields {
            title,
            body,
            source,
        }))
    }

    /// Write a label and the model that produced it.
    pub async fn update_post_sentiment(
        &self,
        post_id: &str,
        sentiment: Sentiment,
        model_version: &str,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE posts SET
                sentiment = ?2,
                model_version = ?3,
                labeled_at = ?4
            WHERE post_id = ?1
            "#,
        )
        .bind(post_id)
        .bind(sentiment.as_str())
        .bind(model_version)
        .bind(now_timestamp())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Stored label of a post; `Ok(None)` for pending or missing posts.
    pub async fn get_post_sentiment(
        &self,
        post_id: &str,
    ) -> DbResult<Option<(Sentiment, Option<String>)>> {
        let row: Option<(Option<String>, Option<String>)> =
            sqlx::query_as("SELECT sentiment, model_version FROM posts WHERE post_id = ?1")
                .bind(post_id)
                .fetch_optional(self.pool())
                .await?;
        match row {
            Some((Some(label), model)) => {
                let sentiment = Sentiment::parse(&label).ok_or_else(|| {
                    crate::DbError::CorruptRow(format!("post {post_id} has label '{label}'"))
                })?;
                Ok(Some((sentiment, model)))
            }
            _ => Ok(None),
        }
    }

    /// Total number of stored posts.
    pub async fn count_posts(&self) -> DbResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool())
            .await?;
        Ok(row.0)
    }

    /// Number of posts still waiting for a label.
    pub async fn count_pending_posts(&self) -> DbResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE sentiment IS NULL")
            .fetch_one(self.pool())
            .await?;
        Ok(row.0)
    }

    /// Id of the most recently labeled post (ties go to the newest row).
    pub async fn get_latest_labeled_post_id(&self) -> DbResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT post_id FROM posts
            WHERE sentiment IS NOT NULL
            ORDER BY labeled_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|(id,)| id))
    }
}

#[async_trait]
impl PostStore for Database {
    async fn post_exists(&self, post_id: &str) -> StoreResult<bool> {
        Ok(Database::post_exists(self, post_id).await?)
    }

    async fn add_record(&self, post: &NewPost) -> StoreResult<bool> {
        Ok(self.add_post(post).await?)
    }

    async fn list_pending_ids(&self) -> StoreResult<Vec<String>> {
        Ok(self.get_pending_post_ids().await?)
    }

    async fn fetch_fields(&self, post_id: &str) -> StoreResult<Option<PostFields>> {
        Ok(self.get_post_fields(post_id).await?)
    }

    async fn set_sentiment(
        &self,
        post_id: &str,
        sentiment: Sentiment,
        model_version: &str,
    ) -> StoreResult<()> {
        Ok(self
            .update_post_sentiment(post_id, sentiment, model_version)
            .await?)
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.count_posts().await?)
    }

    async fn fetch_any_labeled_id(&self) -> StoreResult<Option<String>> {
        Ok(self.get_latest_labeled_post_id().await?)
    }
}
