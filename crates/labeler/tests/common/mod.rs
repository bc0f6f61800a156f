//! Shared fakes for labeler integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sentiment_pulse_core::{
    CompletionProvider, InvocationError, ModelDescriptor, NewPost, PipelineConfig, PromptTemplate,
};
use sentiment_pulse_db::Database;
use tokio_util::sync::CancellationToken;

pub fn model(id: &str) -> ModelDescriptor {
    ModelDescriptor::new(id, 0.0, 3, PromptTemplate::Detailed).unwrap()
}

pub fn post(id: &str) -> NewPost {
    NewPost {
        post_id: id.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        source: "bitcoin".to_string(),
        title: format!("title {id}"),
        body: format!("body {id}"),
    }
}

/// No delay, no probes.
pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        item_delay_ms: 0,
        health_check: false,
    }
}

pub async fn seed(db: &Database, ids: &[&str]) {
    for id in ids {
        db.add_post(&post(id)).await.unwrap();
    }
}

/// Provider that replays a per-model script, then falls back to a default.
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, InvocationError>>>>,
    default: Result<String, InvocationError>,
    calls: Mutex<Vec<(String, String)>>,
    /// Inserted into this database on the first call.
    insert_on_first_call: Mutex<Option<(Database, NewPost)>>,
    /// Cancelled on the first call.
    cancel_on_first_call: Mutex<Option<CancellationToken>>,
}

impl ScriptedProvider {
    pub fn answering(default: &str) -> Self {
        Self::with_default(Ok(default.to_string()))
    }

    pub fn with_default(default: Result<String, InvocationError>) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            default,
            calls: Mutex::new(Vec::new()),
            insert_on_first_call: Mutex::new(None),
            cancel_on_first_call: Mutex::new(None),
        }
    }

    pub fn script(
        self,
        model: &str,
        answers: Vec<Result<String, InvocationError>>,
    ) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(model.to_string(), answers.into());
        self
    }

    pub fn insert_during_run(self, db: Database, post: NewPost) -> Self {
        *self.insert_on_first_call.lock().unwrap() = Some((db, post));
        self
    }

    pub fn cancel_during_run(self, token: CancellationToken) -> Self {
        *self.cancel_on_first_call.lock().unwrap() = Some(token);
        self
    }

    /// Models called, in order.
    pub fn called_models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        model: &ModelDescriptor,
        prompt: &str,
    ) -> Result<String, InvocationError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.identifier().to_string(), prompt.to_string()));

        let pending_insert = self.insert_on_first_call.lock().unwrap().take();
        if let Some((db, post)) = pending_insert {
            db.add_post(&post).await.unwrap();
        }
        if let Some(token) = self.cancel_on_first_call.lock().unwrap().take() {
            token.cancel();
        }

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(model.identifier())
            .and_then(|q| q.pop_front());
        scripted.unwrap_or_else(|| self.default.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
