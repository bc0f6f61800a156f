// crates/labeler/src/pipeline.rs
//! One labeling cycle: pick a model, snapshot pending posts, label each in
//! order.

use std::sync::Arc;

use sentiment_pulse_core::{
    validate, CompletionProvider, InvocationError, ModelDescriptor, ModelSelector, PipelineConfig,
    PostStore, Sentiment,
};
use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;

/// How a labeling run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every post in the snapshot was visited.
    Completed,
    /// Shutdown was requested; remaining posts stay pending.
    Cancelled,
    /// No candidate model passed its health check. Nothing was touched.
    SelectionExhausted,
    /// The active model failed mid-run; remaining posts stay pending.
    Aborted(InvocationError),
}

impl RunOutcome {
    /// Short tag stored in the run ledger.
    pub fn tag(&self) -> String {
        match self {
            Self::Completed => "completed".into(),
            Self::Cancelled => "cancelled".into(),
            Self::SelectionExhausted => "selection_exhausted".into(),
            Self::Aborted(e) => format!("aborted:{}", e.kind()),
        }
    }
}

/// Counters for one labeling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub model: Option<String>,
    /// Whether any candidate was usable this cycle.
    pub model_available: bool,
    pub snapshot_size: usize,
    /// Posts that received a label or INVALID (`labeled + invalid`).
    pub processed: usize,
    pub labeled: usize,
    pub invalid: usize,
    /// Snapshot ids whose row was gone by the time it was fetched.
    pub skipped: usize,
    pub outcome: RunOutcome,
}

impl RunReport {
    fn exhausted() -> Self {
        Self {
            model: None,
            model_available: false,
            snapshot_size: 0,
            processed: 0,
            labeled: 0,
            invalid: 0,
            skipped: 0,
            outcome: RunOutcome::SelectionExhausted,
        }
    }
}

/// Drives a single labeling run against a store and a completion provider.
pub struct PipelineRunner<'a> {
    store: &'a dyn PostStore,
    provider: Arc<dyn CompletionProvider>,
    candidates: &'a [ModelDescriptor],
    config: &'a PipelineConfig,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(
        store: &'a dyn PostStore,
        provider: Arc<dyn CompletionProvider>,
        candidates: &'a [ModelDescriptor],
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            store,
            provider,
            candidates,
            config,
        }
    }

    /// Run one cycle. Storage failures end the run with an error; labels
    /// already written stay written.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunReport, PipelineError> {
        let result = self.run_inner(cancel).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "labeling run failed");
        }
        result
    }

    async fn run_inner(&self, cancel: &CancellationToken) -> Result<RunReport, PipelineError> {
        let selector = ModelSelector::new(Arc::clone(&self.provider), self.config.health_check);
        let Some(model) = selector
            .select_active(self.candidates, self.store)
            .await?
        else {
            tracing::error!(
                candidates = self.candidates.len(),
                "no candidate model available, skipping this cycle"
            );
            return Ok(RunReport::exhausted());
        };

        let snapshot = self.store.list_pending_ids().await?;
        tracing::info!(
            model = %model.identifier(),
            pending = snapshot.len(),
            "labeling run started"
        );

        let mut report = RunReport {
            model: Some(model.identifier().to_string()),
            model_available: true,
            snapshot_size: snapshot.len(),
            processed: 0,
            labeled: 0,
            invalid: 0,
            skipped: 0,
            outcome: RunOutcome::Completed,
        };
        let delay = self.config.item_delay();

        for (index, post_id) in snapshot.iter().enumerate() {
            if cancel.is_cancelled() {
                report.outcome = RunOutcome::Cancelled;
                break;
            }

            let Some(fields) = self.store.fetch_fields(post_id).await? else {
                tracing::warn!(post_id = %post_id, "pending post vanished before labeling");
                report.skipped += 1;
                continue;
            };

            let prompt = model.prompt(&fields);
            let sentiment = match self.provider.complete(&model, &prompt).await {
                Ok(raw) => validate(&raw),
                Err(e) if !e.aborts_run() => {
                    tracing::warn!(
                        post_id = %post_id,
                        model = %model.identifier(),
                        error = %e,
                        "malformed completion, recording INVALID"
                    );
                    Sentiment::Invalid
                }
                Err(e) => {
                    tracing::warn!(
                        post_id = %post_id,
                        model = %model.identifier(),
                        kind = e.kind(),
                        error = %e,
                        remaining = snapshot.len() - index,
                        "model failed mid-run, aborting"
                    );
                    report.outcome = RunOutcome::Aborted(e);
                    break;
                }
            };

            if sentiment.is_invalid() {
                self.store.set_invalid(post_id, model.identifier()).await?;
                report.invalid += 1;
            } else {
                self.store
                    .set_sentiment(post_id, sentiment, model.identifier())
                    .await?;
                report.labeled += 1;
            }
            report.processed += 1;
            tracing::info!(
                post_id = %post_id,
                model = %model.identifier(),
                sentiment = %sentiment,
                "post labeled"
            );

            let last = index + 1 == snapshot.len();
            if !last && !delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        report.outcome = RunOutcome::Cancelled;
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        tracing::info!(
            model = %model.identifier(),
            processed = report.processed,
            labeled = report.labeled,
            invalid = report.invalid,
            skipped = report.skipped,
            outcome = %report.outcome.tag(),
            "labeling run finished"
        );
        Ok(report)
    }
}
