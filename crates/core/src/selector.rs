// crates/core/src/selector.rs
//! Health-check-driven choice of the model to label with this cycle.

use std::future::Future;
use std::sync::Arc;

use crate::llm::{CompletionProvider, InvocationError};
use crate::model::ModelDescriptor;
use crate::store::{PostStore, StoreResult};

/// Return the first candidate whose health check is not disqualifying.
///
/// Candidates are probed strictly in order and probing stops at the first
/// usable one. A check that fails with `RateLimited` or `Malformed` still
/// proves the model answered, so it counts as available.
pub async fn select<'a, F, Fut>(
    candidates: &'a [ModelDescriptor],
    mut health_check: F,
) -> Option<&'a ModelDescriptor>
where
    F: FnMut(&'a ModelDescriptor) -> Fut,
    Fut: Future<Output = Result<(), InvocationError>>,
{
    for candidate in candidates {
        match health_check(candidate).await {
            Ok(()) => {
                tracing::info!(model = %candidate.identifier(), "health check passed");
                return Some(candidate);
            }
            Err(e) if !e.disqualifies_model() => {
                tracing::info!(
                    model = %candidate.identifier(),
                    kind = e.kind(),
                    "health check answered with a non-disqualifying error"
                );
                return Some(candidate);
            }
            Err(e) => {
                tracing::warn!(
                    model = %candidate.identifier(),
                    kind = e.kind(),
                    error = %e,
                    "model not working properly"
                );
            }
        }
    }
    None
}

/// Picks the active model once per pipeline run.
pub struct ModelSelector {
    provider: Arc<dyn CompletionProvider>,
    health_check: bool,
}

impl ModelSelector {
    pub fn new(provider: Arc<dyn CompletionProvider>, health_check: bool) -> Self {
        Self {
            provider,
            health_check,
        }
    }

    /// Choose a model from `candidates`.
    ///
    /// With health checks disabled the first candidate wins unprobed. With
    /// them enabled, the probe prompt is built from the most recently labeled
    /// post; an empty history means no probe can run and selection fails
    /// closed with `Ok(None)`.
    pub async fn select_active(
        &self,
        candidates: &[ModelDescriptor],
        store: &dyn PostStore,
    ) -> StoreResult<Option<ModelDescriptor>> {
        if !self.health_check {
            return Ok(candidates.first().cloned());
        }

        let Some(probe_id) = store.fetch_any_labeled_id().await? else {
            tracing::warn!("no labeled post to build a health-check probe from");
            return Ok(None);
        };
        let Some(fields) = store.fetch_fields(&probe_id).await? else {
            tracing::warn!(post_id = %probe_id, "health-check probe post vanished");
            return Ok(None);
        };

        let provider = &self.provider;
        let fields = &fields;
        let chosen = select(candidates, |model| {
            let prompt = model.prompt(fields);
            async move { provider.complete(model, &prompt).await.map(|_| ()) }
        })
        .await;

        Ok(chosen.cloned())
    }
}
