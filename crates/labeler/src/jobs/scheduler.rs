// crates/labeler/src/jobs/scheduler.rs
//! Recurring ingestion and labeling on tokio intervals.

use std::sync::Arc;
use std::time::Duration;

use sentiment_pulse_core::{IngestConfig, ScheduleConfig};
use sentiment_pulse_db::Database;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::label::LabelJob;
use super::types::{JobKind, LabelJobOutcome};
use crate::error::JobError;
use crate::ingest::{Ingestor, RedditClient};

/// Owns both recurring jobs until cancelled.
pub struct Scheduler {
    db: Database,
    label: LabelJob,
    reddit: Arc<RedditClient>,
    ingest: IngestConfig,
    schedule: ScheduleConfig,
}

impl Scheduler {
    pub fn new(
        db: Database,
        label: LabelJob,
        reddit: RedditClient,
        ingest: IngestConfig,
        schedule: ScheduleConfig,
    ) -> Self {
        Self {
            db,
            label,
            reddit: Arc::new(reddit),
            ingest,
            schedule,
        }
    }

    /// Run until `cancel` fires, then wait for in-flight jobs to stop.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), JobError> {
        self.label.recover_interrupted().await?;

        tracing::info!(
            ingest_every_secs = self.schedule.ingest_every_secs,
            label_every_secs = self.schedule.label_every_secs,
            label_offset_secs = self.schedule.label_offset_secs,
            subreddits = ?self.ingest.subreddits,
            "scheduler started"
        );

        let ingest_task = tokio::spawn(ingest_loop(
            self.db.clone(),
            Arc::clone(&self.reddit),
            self.ingest.clone(),
            Duration::from_secs(self.schedule.ingest_every_secs),
            cancel.clone(),
        ));
        let label_task = tokio::spawn(label_loop(
            self.label.clone(),
            Duration::from_secs(self.schedule.label_offset_secs),
            Duration::from_secs(self.schedule.label_every_secs),
            cancel.clone(),
        ));

        let (ingest, label) = tokio::join!(ingest_task, label_task);
        for (kind, joined) in [(JobKind::Ingest, ingest), (JobKind::Label, label)] {
            if let Err(e) = joined {
                tracing::error!(job = kind.as_str(), error = %e, "job task ended abnormally");
            }
        }
        tracing::info!("scheduler stopped");
        Ok(())
    }
}

async fn ingest_loop(
    db: Database,
    reddit: Arc<RedditClient>,
    config: IngestConfig,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let ingestor = Ingestor::new(&reddit, &db, config.insert_delay());
        let results = ingestor.ingest_all(&config.subreddits, &cancel).await;
        let inserted: usize = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|r| r.inserted)
            .sum();
        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(job = JobKind::Ingest.as_str(), inserted, failed, "job tick done");
    }
}

async fn label_loop(job: LabelJob, offset: Duration, every: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + offset, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match job.run_once(&cancel).await {
            Ok(LabelJobOutcome::Ran { run_id, report }) => {
                tracing::info!(
                    job = JobKind::Label.as_str(),
                    run_id,
                    model_available = report.model_available,
                    processed = report.processed,
                    outcome = %report.outcome.tag(),
                    "job tick done"
                );
            }
            Ok(LabelJobOutcome::Skipped(reason)) => {
                tracing::info!(job = JobKind::Label.as_str(), ?reason, "job tick skipped");
            }
            Err(e) => {
                tracing::error!(job = JobKind::Label.as_str(), error = %e, "job tick failed");
            }
        }
    }
}
