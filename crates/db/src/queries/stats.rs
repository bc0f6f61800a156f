// crates/db/src/queries/stats.rs
// Label distribution queries backing the `stats` command.

use serde::Serialize;

use crate::{Database, DbResult};

/// Count and share of one label among valid labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LabelShare {
    pub count: i64,
    /// Percentage of POSITIVE + NEUTRAL + NEGATIVE, rounded to two decimals.
    pub percentage: f64,
}

/// Sentiment distribution for one source (or all sources).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentStats {
    pub source: Option<String>,
    pub positive: LabelShare,
    pub neutral: LabelShare,
    pub negative: LabelShare,
    /// Posts labeled INVALID. Not part of the percentage base.
    pub invalid: i64,
    /// Posts still waiting for a label.
    pub pending: i64,
}

impl SentimentStats {
    /// Number of posts carrying one of the three valid labels.
    pub fn valid_total(&self) -> i64 {
        self.positive.count + self.neutral.count + self.negative.count
    }
}

fn share(count: i64, total: i64) -> LabelShare {
    let percentage = if total == 0 {
        0.0
    } else {
        (count as f64 * 10_000.0 / total as f64).round() / 100.0
    };
    LabelShare { count, percentage }
}

impl Database {
    /// Label distribution, optionally restricted to one subreddit.
    pub async fn sentiment_stats(&self, source: Option<&str>) -> DbResult<SentimentStats> {
        let rows: Vec<(Option<String>, i64)> = sqlx::query_as(
            r#"
            SELECT sentiment, COUNT(*) FROM posts
            WHERE (?1 IS NULL OR subreddit = ?1)
            GROUP BY sentiment
            "#,
        )
        .bind(source)
        .fetch_all(self.pool())
        .await?;

        let (mut positive, mut neutral, mut negative, mut invalid, mut pending) = (0, 0, 0, 0, 0);
        for (label, count) in rows {
            match label.as_deref() {
                Some("POSITIVE") => positive = count,
                Some("NEUTRAL") => neutral = count,
                Some("NEGATIVE") => negative = count,
                Some(_) => invalid += count,
                None => pending = count,
            }
        }

        let total = positive + neutral + negative;
        Ok(SentimentStats {
            source: source.map(str::to_owned),
            positive: share(positive, total),
            neutral: share(neutral, total),
            negative: share(negative, total),
            invalid,
            pending,
        })
    }

    /// Distinct subreddits with at least one stored post, sorted.
    pub async fn list_sources(&self) -> DbResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT subreddit FROM posts WHERE subreddit IS NOT NULL ORDER BY subreddit",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }
}
