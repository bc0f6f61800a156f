// crates/labeler/src/jobs/label.rs
//! Labeling job: ledger bookkeeping and locking around one pipeline run.

use std::sync::Arc;

use sentiment_pulse_core::{CompletionProvider, ModelDescriptor, PipelineConfig};
use sentiment_pulse_db::{Database, LabelRunSummary};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::types::{LabelJobOutcome, SkipReason};
use crate::error::JobError;
use crate::pipeline::{PipelineRunner, RunReport};

/// Runs left `running` this long are treated as crashed.
pub const STALE_RUN_AGE_HOURS: i64 = 6;

/// Everything needed to start a labeling run. Clones share the run lock.
#[derive(Clone)]
pub struct LabelJob {
    db: Database,
    provider: Arc<dyn CompletionProvider>,
    candidates: Arc<[ModelDescriptor]>,
    config: PipelineConfig,
    lock: Arc<Mutex<()>>,
}

impl LabelJob {
    pub fn new(
        db: Database,
        provider: Arc<dyn CompletionProvider>,
        candidates: Vec<ModelDescriptor>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            db,
            provider,
            candidates: candidates.into(),
            config,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Release ledger rows left `running` by an earlier process. Call once
    /// at startup, before the first `run_once`.
    pub async fn recover_interrupted(&self) -> Result<u64, JobError> {
        let released = self.db.release_running_label_runs().await?;
        if released > 0 {
            tracing::warn!(released, "released label runs interrupted by a restart");
        }
        Ok(released)
    }

    /// Run one labeling cycle unless another run holds the slot.
    ///
    /// The run is recorded in the ledger: completed with its counters, or
    /// failed with the error when storage broke mid-run. Rows older than
    /// [`STALE_RUN_AGE_HOURS`] are released first.
    pub async fn run_once(&self, cancel: &CancellationToken) -> Result<LabelJobOutcome, JobError> {
        let Ok(_guard) = self.lock.try_lock() else {
            tracing::info!("previous labeling run still in progress, skipping");
            return Ok(LabelJobOutcome::Skipped(SkipReason::InProcess));
        };

        let stale = self
            .db
            .recover_stale_label_runs(chrono::Duration::hours(STALE_RUN_AGE_HOURS))
            .await?;
        if stale > 0 {
            tracing::warn!(released = stale, "released stale label runs");
        }

        let Some(run_id) = self.db.begin_label_run().await? else {
            tracing::warn!("label run ledger shows another run in progress, skipping");
            return Ok(LabelJobOutcome::Skipped(SkipReason::LedgerBusy));
        };

        let runner = PipelineRunner::new(
            &self.db,
            Arc::clone(&self.provider),
            &self.candidates,
            &self.config,
        );

        match runner.run(cancel).await {
            Ok(report) => {
                if let Err(e) = self
                    .db
                    .complete_label_run(run_id, &run_summary(&report))
                    .await
                {
                    // Free the slot even if the counters could not be stored
                    if let Err(ledger) = self.db.fail_label_run(run_id, &e.to_string()).await {
                        tracing::error!(run_id, error = %ledger, "failed to release label run");
                    }
                    return Err(e.into());
                }
                Ok(LabelJobOutcome::Ran { run_id, report })
            }
            Err(e) => {
                if let Err(ledger) = self.db.fail_label_run(run_id, &e.to_string()).await {
                    tracing::error!(run_id, error = %ledger, "failed to record failed label run");
                }
                Err(e.into())
            }
        }
    }
}

/// Ledger counters for a finished run.
pub fn run_summary(report: &RunReport) -> LabelRunSummary {
    LabelRunSummary {
        model: report.model.clone(),
        snapshot_size: report.snapshot_size as i64,
        processed: report.processed as i64,
        labeled: report.labeled as i64,
        invalid: report.invalid as i64,
        outcome: report.outcome.tag(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RunOutcome;
    use sentiment_pulse_core::InvocationError;

    #[test]
    fn test_run_summary_copies_counters() {
        let report = RunReport {
            model: Some("m".into()),
            model_available: true,
            snapshot_size: 4,
            processed: 3,
            labeled: 2,
            invalid: 1,
            skipped: 0,
            outcome: RunOutcome::Aborted(InvocationError::Unavailable("503".into())),
        };
        let summary = run_summary(&report);
        assert_eq!(summary.model.as_deref(), Some("m"));
        assert_eq!(summary.snapshot_size, 4);
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.labeled, 2);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.outcome, "aborted:unavailable");
    }
}
