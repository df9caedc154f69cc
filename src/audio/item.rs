use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What produced the audio. Navigation wins ties against the other kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioKind {
    Narration,
    Navigation,
    Ambient,
}

/// How aggressively a new item may preempt whatever is playing.
/// Variant order is the preemption order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

/// Either an already-synthesized handle or text still waiting on TTS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioPayload {
    Handle(String),
    PendingText(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Queued,
    Playing,
    Paused,
    Ducked,
    Done,
    Cancelled,
}

/// A unit of playback. Owned by the registry once submitted; producers may
/// only request cancellation by id.
#[derive(Debug, Clone)]
pub struct AudioItem {
    pub id: Uuid,
    pub kind: AudioKind,
    pub urgency: Urgency,
    pub payload: AudioPayload,
    pub created_at: Instant,
    pub state: PlaybackState,
}

impl AudioItem {
    pub fn new(kind: AudioKind, urgency: Urgency, payload: AudioPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            urgency,
            payload,
            created_at: Instant::now(),
            state: PlaybackState::Queued,
        }
    }

    pub fn narration(text: impl Into<String>, urgency: Urgency) -> Self {
        Self::new(AudioKind::Narration, urgency, AudioPayload::PendingText(text.into()))
    }

    pub fn navigation(text: impl Into<String>, urgency: Urgency) -> Self {
        Self::new(AudioKind::Navigation, urgency, AudioPayload::PendingText(text.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectiveAction {
    /// Begin playback of the target item.
    Start,
    /// Hard-stop the target item immediately.
    InterruptAll,
    /// Pause the target item, keeping its position for later resume.
    PauseCurrent,
    /// Lower the target item's gain and mix the new item over it.
    DuckCurrent,
    /// The target item is queued; play it at the next natural gap.
    WaitForGap,
    /// Restore the target item to full playback at its bookmarked position.
    Resume,
}

/// One instruction for the sink. Consumed once; never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestrationDirective {
    pub action: DirectiveAction,
    pub target: Uuid,
    pub fade_ms: u64,
}

impl OrchestrationDirective {
    pub fn new(action: DirectiveAction, target: Uuid, fade_ms: u64) -> Self {
        Self { action, target, fade_ms }
    }
}
