use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::WayfarerError;
use crate::intent::{HandlerName, Intent};

use super::types::{Handler, HandlerResult, HandlerTask};

/// How long cancelled stragglers get to unwind before being aborted.
const CANCEL_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// Budget for a single handler before it is marked TIMEOUT.
    pub per_handler: Duration,
    /// Hard deadline for the whole fan-out. Work finishing after this is
    /// discarded, never merged into a synthesis that already started.
    pub ceiling: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { per_handler: Duration::from_secs(3), ceiling: Duration::from_secs(5) }
    }
}

/// Concurrent fan-out to domain handlers. One slow or broken handler can
/// cost its own slot in the reply, never the turn.
pub struct HandlerDispatcher {
    handlers: HashMap<HandlerName, Arc<dyn Handler>>,
    config: DispatchConfig,
}

impl HandlerDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { handlers: HashMap::new(), config }
    }

    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.insert(handler.name(), handler);
    }

    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// Invoke every handler the intent requires, in parallel. Results come
    /// back in the intent's handler order regardless of completion order.
    pub async fn dispatch(&self, intent: &Intent, utterance: &str) -> Vec<HandlerResult> {
        let cancel = CancellationToken::new();
        let mut join_set = JoinSet::new();
        let mut collected: HashMap<HandlerName, HandlerResult> = HashMap::new();

        for name in &intent.required {
            let name = *name;
            let Some(handler) = self.handlers.get(&name) else {
                debug!(handler = name.as_str(), "handler not registered, recording fallback");
                collected.insert(name, HandlerResult::error(name));
                continue;
            };
            let handler = Arc::clone(handler);
            let task = HandlerTask::new(name, utterance);
            let token = cancel.child_token();
            let per_handler = self.config.per_handler;

            join_set.spawn(async move {
                let outcome =
                    tokio::time::timeout(per_handler, handler.call(task, token.clone())).await;
                match outcome {
                    Ok(Ok(payload)) => HandlerResult::success(name, payload),
                    Ok(Err(err)) => {
                        let failure = WayfarerError::Handler { handler: name.as_str(), status: "error" };
                        debug!(cause = %err, "{failure}");
                        HandlerResult::error(name)
                    }
                    Err(_) => {
                        // Actively stop the handler instead of letting it
                        // linger past its budget.
                        token.cancel();
                        let failure = WayfarerError::Handler { handler: name.as_str(), status: "timeout" };
                        debug!("{failure}");
                        HandlerResult::timeout(name)
                    }
                }
            });
        }

        let deadline = tokio::time::sleep(self.config.ceiling);
        tokio::pin!(deadline);

        let mut ceiling_hit = false;
        loop {
            tokio::select! {
                joined = join_set.join_next() => {
                    match joined {
                        Some(Ok(result)) => {
                            collected.insert(result.handler, result);
                        }
                        Some(Err(err)) => {
                            debug!(error = %err, "handler task aborted");
                        }
                        None => break,
                    }
                }
                _ = &mut deadline => {
                    ceiling_hit = true;
                    break;
                }
            }
        }

        if ceiling_hit {
            // Hard deadline. Signal every straggler to stop, then hand the
            // join set to a reaper that swallows anything arriving late;
            // those results never reach synthesis.
            cancel.cancel();
            tokio::spawn(async move {
                let drain = async {
                    while join_set.join_next().await.is_some() {}
                };
                if tokio::time::timeout(CANCEL_GRACE, drain).await.is_err() {
                    join_set.abort_all();
                }
            });
        }

        intent
            .required
            .iter()
            .map(|name| {
                collected
                    .remove(name)
                    .unwrap_or_else(|| HandlerResult::timeout(*name))
            })
            .collect()
    }
}
