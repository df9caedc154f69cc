use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Turn history is pruned past this horizon.
pub const HISTORY_WINDOW: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Agent,
}

/// Something the assistant committed to beyond the spoken reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FollowUpAction {
    OfferPhoneNumber { venue: String },
    RetryLater { what: String },
    AwaitClarification,
}

#[derive(Debug, Clone)]
pub struct TurnMessage {
    pub speaker: Speaker,
    pub text: String,
    pub at: Instant,
    pub actions: Vec<FollowUpAction>,
}

/// Per-session conversation memory. Owned by the session; only the master
/// orchestrator mutates it, and only after a turn completes.
#[derive(Debug)]
pub struct ConversationState {
    pub session_id: Uuid,
    messages: VecDeque<TurnMessage>,
    pub active_topic: Option<String>,
    pub pending_actions: Vec<FollowUpAction>,
    pub uncertain_streak: u32,
    window: Duration,
}

impl ConversationState {
    pub fn new(session_id: Uuid) -> Self {
        Self::with_window(session_id, HISTORY_WINDOW)
    }

    pub fn with_window(session_id: Uuid, window: Duration) -> Self {
        Self {
            session_id,
            messages: VecDeque::new(),
            active_topic: None,
            pending_actions: Vec::new(),
            uncertain_streak: 0,
            window,
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push_back(TurnMessage {
            speaker: Speaker::User,
            text: text.into(),
            at: Instant::now(),
            actions: Vec::new(),
        });
    }

    pub fn push_agent(&mut self, text: impl Into<String>, actions: Vec<FollowUpAction>) {
        self.pending_actions.extend(actions.iter().cloned());
        self.messages.push_back(TurnMessage {
            speaker: Speaker::Agent,
            text: text.into(),
            at: Instant::now(),
            actions,
        });
    }

    /// Sliding-window prune; call at the top of every turn.
    pub fn prune(&mut self) {
        let Some(cutoff) = Instant::now().checked_sub(self.window) else {
            return;
        };
        while let Some(front) = self.messages.front() {
            if front.at < cutoff {
                self.messages.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &TurnMessage> {
        self.messages.iter()
    }

    /// Most recent `n` messages, newest last.
    pub fn recent(&self, n: usize) -> Vec<&TurnMessage> {
        let len = self.messages.len();
        self.messages.iter().skip(len.saturating_sub(n)).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn take_pending(&mut self) -> Vec<FollowUpAction> {
        std::mem::take(&mut self.pending_actions)
    }
}
