// crates/db/src/queries/runs.rs
// Label run ledger. The single-running-row index doubles as the run lock.

use chrono::{Duration, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::Row;

use super::now_timestamp;
use crate::{Database, DbError, DbResult};

/// Lifecycle of a labeling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelRunStatus {
    Running,
    Completed,
    Failed,
}

impl LabelRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Counters recorded when a run finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRunSummary {
    pub model: Option<String>,
    pub snapshot_size: i64,
    pub processed: i64,
    pub labeled: i64,
    pub invalid: i64,
    /// Short outcome tag, e.g. "completed", "aborted:rate_limited".
    pub outcome: String,
}

/// One row of the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct LabelRun {
    pub id: i64,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub status: LabelRunStatus,
    pub model: Option<String>,
    pub snapshot_size: i64,
    pub processed: i64,
    pub labeled: i64,
    pub invalid: i64,
    pub outcome: Option<String>,
    pub error_message: Option<String>,
}

struct LabelRunRow {
    id: i64,
    started_at: String,
    completed_at: Option<String>,
    status: String,
    model: Option<String>,
    snapshot_size: i64,
    processed: i64,
    labeled: i64,
    invalid: i64,
    outcome: Option<String>,
    error_message: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for LabelRunRow {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            started_at: row.try_get("started_at")?,
            completed_at: row.try_get("completed_at")?,
            status: row.try_get("status")?,
            model: row.try_get("model")?,
            snapshot_size: row.try_get("snapshot_size")?,
            processed: row.try_get("processed")?,
            labeled: row.try_get("labeled")?,
            invalid: row.try_get("invalid")?,
            outcome: row.try_get("outcome")?,
            error_message: row.try_get("error_message")?,
        })
    }
}

impl LabelRunRow {
    fn into_label_run(self) -> DbResult<LabelRun> {
        let status = LabelRunStatus::parse(&self.status).ok_or_else(|| {
            DbError::CorruptRow(format!("label run {} has status '{}'", self.id, self.status))
        })?;
        Ok(LabelRun {
            id: self.id,
            started_at: self.started_at,
            completed_at: self.completed_at,
            status,
            model: self.model,
            snapshot_size: self.snapshot_size,
            processed: self.processed,
            labeled: self.labeled,
            invalid: self.invalid,
            outcome: self.outcome,
            error_message: self.error_message,
        })
    }
}

impl Database {
    /// Claim the run slot. Returns the new run id, or `None` when another
    /// run is still marked running.
    pub async fn begin_label_run(&self) -> DbResult<Option<i64>> {
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            "INSERT INTO label_runs (started_at, status) VALUES (?1, 'running') RETURNING id",
        )
        .bind(now_timestamp())
        .fetch_one(self.pool())
        .await;

        match result {
            Ok((id,)) => Ok(Some(id)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark a run as completed and record its counters.
    pub async fn complete_label_run(&self, run_id: i64, summary: &LabelRunSummary) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE label_runs SET
                status = 'completed',
                completed_at = ?2,
                model = ?3,
                snapshot_size = ?4,
                processed = ?5,
                labeled = ?6,
                invalid = ?7,
                outcome = ?8
            WHERE id = ?1
            "#,
        )
        .bind(run_id)
        .bind(now_timestamp())
        .bind(&summary.model)
        .bind(summary.snapshot_size)
        .bind(summary.processed)
        .bind(summary.labeled)
        .bind(summary.invalid)
        .bind(&summary.outcome)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Fail a run with an error message, freeing the run slot.
    pub async fn fail_label_run(&self, run_id: i64, error: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE label_runs SET
                status = 'failed',
                completed_at = ?2,
                outcome = 'failed',
                error_message = ?3
            WHERE id = ?1
            "#,
        )
        .bind(run_id)
        .bind(now_timestamp())
        .bind(error)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Get a run by id.
    pub async fn get_label_run(&self, run_id: i64) -> DbResult<Option<LabelRun>> {
        let row: Option<LabelRunRow> = sqlx::query_as("SELECT * FROM label_runs WHERE id = ?1")
            .bind(run_id)
            .fetch_optional(self.pool())
            .await?;
        row.map(LabelRunRow::into_label_run).transpose()
    }

    /// Most recent runs, newest first.
    pub async fn recent_label_runs(&self, limit: i64) -> DbResult<Vec<LabelRun>> {
        let rows: Vec<LabelRunRow> =
            sqlx::query_as("SELECT * FROM label_runs ORDER BY id DESC LIMIT ?1")
                .bind(limit)
                .fetch_all(self.pool())
                .await?;
        rows.into_iter().map(LabelRunRow::into_label_run).collect()
    }

    /// Mark every `running` run as failed. A freshly started process owns
    /// no live run, so anything still `running` was interrupted.
    pub async fn release_running_label_runs(&self) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE label_runs
            SET status = 'failed',
                outcome = 'failed',
                error_message = 'Process restart interrupted run',
                completed_at = ?1
            WHERE status = 'running'
            "#,
        )
        .bind(now_timestamp())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark runs left `running` longer than `max_age` as failed (crash
    /// recovery). Returns how many rows were released.
    pub async fn recover_stale_label_runs(&self, max_age: Duration) -> DbResult<u64> {
        let cutoff = (Utc::now() - max_age).to_rfc3339_opts(SecondsFormat::Micros, true);
        let result = sqlx::query(
            r#"
            UPDATE label_runs
            SET status = 'failed',
                outcome = 'failed',
                error_message = 'Run interrupted before completion',
                completed_at = ?2
            WHERE status = 'running' AND started_at <= ?1
            "#,
        )
        .bind(&cutoff)
        .bind(now_timestamp())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }
}
