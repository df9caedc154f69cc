use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::intent::HandlerName;

/// One unit of work for a domain handler. Handed off by value; never
/// mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerTask {
    pub handler: HandlerName,
    pub utterance: String,
    pub params: Value,
}

impl HandlerTask {
    pub fn new(handler: HandlerName, utterance: impl Into<String>) -> Self {
        Self { handler, utterance: utterance.into(), params: Value::Null }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandlerStatus {
    Success,
    Error,
    Timeout,
}

/// Outcome of one handler invocation. `fallback` marks results the
/// synthesizer must replace with its deterministic fallback line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerResult {
    pub handler: HandlerName,
    pub status: HandlerStatus,
    pub payload: Option<String>,
    pub fallback: bool,
}

impl HandlerResult {
    pub fn success(handler: HandlerName, payload: impl Into<String>) -> Self {
        Self { handler, status: HandlerStatus::Success, payload: Some(payload.into()), fallback: false }
    }

    pub fn error(handler: HandlerName) -> Self {
        Self { handler, status: HandlerStatus::Error, payload: None, fallback: true }
    }

    pub fn timeout(handler: HandlerName) -> Self {
        Self { handler, status: HandlerStatus::Timeout, payload: None, fallback: true }
    }

    pub fn succeeded(&self) -> bool {
        self.status == HandlerStatus::Success
    }
}

/// Uniform contract for every domain handler. Handlers own their own retry
/// policy; the dispatcher never retries. The token fires when the dispatch
/// ceiling passes; implementations should stop work promptly.
#[async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> HandlerName;

    async fn call(&self, task: HandlerTask, cancel: CancellationToken) -> anyhow::Result<String>;
}
