use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use super::item::{
    AudioItem, AudioKind, AudioPayload, DirectiveAction, OrchestrationDirective, PlaybackState,
    Urgency,
};
use super::registry::{SourceRegistry, SuspendMode};
use crate::error::WayfarerError;

pub const DUCK_FADE_MS: u64 = 250;
pub const RESUME_FADE_MS: u64 = 150;
pub const GAP_FADE_MS: u64 = 100;

/// Per-channel arbitration state machine. Every (urgency x state) pair maps
/// to exactly one outcome; there is no fallthrough case.
///
/// The machine is pure: it cannot fail, and it never talks to the sink
/// directly. Callers collect the returned directives and hand them over.
#[derive(Debug, Default)]
pub struct ChannelMachine {
    registry: SourceRegistry,
}

impl ChannelMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn record_position(&mut self, id: Uuid, position_ms: u64) {
        self.registry.record_position(id, position_ms);
    }

    /// Arbitrate one new item against the current channel state.
    pub fn submit(&mut self, item: AudioItem) -> Vec<OrchestrationDirective> {
        let id = item.id;
        let urgency = item.urgency;
        self.registry.insert(item);

        let mut out = Vec::new();
        let Some(current) = self.registry.playing() else {
            self.start(id, &mut out);
            return out;
        };

        match urgency {
            Urgency::Critical => {
                out.push(OrchestrationDirective::new(DirectiveAction::InterruptAll, current, 0));
                self.registry.demote_ducked();
                // Narration keeps a bookmark so the story can continue later;
                // stale guidance and ambient beds are dropped outright.
                let keep = self
                    .registry
                    .item(current)
                    .map(|i| i.kind == AudioKind::Narration)
                    .unwrap_or(false);
                if keep {
                    self.registry.suspend_playing(SuspendMode::Paused);
                } else {
                    self.registry.finish_playing(PlaybackState::Cancelled);
                }
                self.start(id, &mut out);
            }
            Urgency::High => {
                out.push(OrchestrationDirective::new(DirectiveAction::PauseCurrent, current, 0));
                self.registry.demote_ducked();
                self.registry.suspend_playing(SuspendMode::Paused);
                self.start(id, &mut out);
            }
            Urgency::Medium => {
                out.push(OrchestrationDirective::new(
                    DirectiveAction::DuckCurrent,
                    current,
                    DUCK_FADE_MS,
                ));
                self.registry.demote_ducked();
                self.registry.suspend_playing(SuspendMode::Ducked);
                self.start(id, &mut out);
            }
            Urgency::Low => {
                out.push(OrchestrationDirective::new(DirectiveAction::WaitForGap, id, 0));
                self.registry.enqueue(id);
            }
        }
        out
    }

    /// Simultaneous submissions: lower urgency first so the most urgent item
    /// ends up audible, and navigation outranks narration/ambient at equal
    /// urgency. Low items are queued navigation-first instead, since queue
    /// order decides who plays at the next gap.
    pub fn submit_batch(&mut self, mut items: Vec<AudioItem>) -> Vec<OrchestrationDirective> {
        items.sort_by(|a, b| {
            let rank = |i: &AudioItem| {
                let nav = i.kind == AudioKind::Navigation;
                match (i.urgency, nav) {
                    (Urgency::Low, true) => 0u8,
                    (Urgency::Low, false) => 1,
                    (_, false) => 0,
                    (_, true) => 1,
                }
            };
            a.urgency.cmp(&b.urgency).then_with(|| rank(a).cmp(&rank(b)))
        });
        items.into_iter().flat_map(|i| self.submit(i)).collect()
    }

    /// The sink reports that an item finished playing to the end.
    pub fn complete(&mut self, id: Uuid) -> Vec<OrchestrationDirective> {
        let mut out = Vec::new();
        if self.registry.playing() == Some(id) {
            self.registry.finish_playing(PlaybackState::Done);
            self.resolve_next(&mut out);
        } else if self.registry.remove_suspended(id).is_some() {
            // A ducked item can run out underneath the primary.
            self.registry.finish(id, PlaybackState::Done);
        } else if self.registry.remove_queued(id) {
            self.registry.finish(id, PlaybackState::Done);
        }
        out
    }

    /// Cancel-by-id. Queued items vanish silently; audible items are
    /// interrupted and the channel resolves to whatever comes next.
    pub fn cancel(&mut self, id: Uuid) -> Vec<OrchestrationDirective> {
        let mut out = Vec::new();
        if self.registry.remove_queued(id) {
            self.registry.finish(id, PlaybackState::Cancelled);
        } else if self.registry.playing() == Some(id) {
            out.push(OrchestrationDirective::new(DirectiveAction::InterruptAll, id, 0));
            self.registry.demote_ducked();
            self.registry.finish_playing(PlaybackState::Cancelled);
            self.resolve_next(&mut out);
        } else if self.registry.remove_suspended(id).is_some() {
            out.push(OrchestrationDirective::new(DirectiveAction::InterruptAll, id, 0));
            self.registry.finish(id, PlaybackState::Cancelled);
        }
        out
    }

    /// Externally signaled natural pause boundary. A queued item slots into
    /// the gap; whatever was playing pauses at the boundary and resumes after.
    pub fn signal_gap(&mut self) -> Vec<OrchestrationDirective> {
        let mut out = Vec::new();
        let Some(next) = self.registry.dequeue() else {
            return out;
        };
        if let Some(current) = self.registry.playing() {
            out.push(OrchestrationDirective::new(
                DirectiveAction::PauseCurrent,
                current,
                GAP_FADE_MS,
            ));
            self.registry.demote_ducked();
            self.registry.suspend_playing(SuspendMode::Paused);
        }
        self.start(next, &mut out);
        out
    }

    /// The sink dropped a directive. Flush the channel back to idle and move
    /// on; retrying would starve later submissions.
    pub fn flush(&mut self) -> Vec<OrchestrationDirective> {
        let mut out = Vec::new();
        self.registry.finish_playing(PlaybackState::Cancelled);
        while let Some(s) = self.registry.pop_suspended() {
            self.registry.finish(s.id, PlaybackState::Cancelled);
        }
        if let Some(next) = self.registry.dequeue() {
            self.start(next, &mut out);
        }
        out
    }

    fn start(&mut self, id: Uuid, out: &mut Vec<OrchestrationDirective>) {
        self.registry.promote(id);
        out.push(OrchestrationDirective::new(DirectiveAction::Start, id, 0));
    }

    fn resolve_next(&mut self, out: &mut Vec<OrchestrationDirective>) {
        if let Some(s) = self.registry.pop_suspended() {
            self.registry.promote(s.id);
            out.push(OrchestrationDirective::new(
                DirectiveAction::Resume,
                s.id,
                RESUME_FADE_MS,
            ));
        } else if let Some(next) = self.registry.dequeue() {
            self.start(next, out);
        }
    }
}

/// What the sink receives on the subscription channel: the directive plus
/// the payload it needs to actually play the target.
#[derive(Debug, Clone)]
pub struct DirectiveEvent {
    pub channel: String,
    pub directive: OrchestrationDirective,
    pub payload: Option<AudioPayload>,
}

/// Multi-channel front for the arbitration machine. All calls touching one
/// channel serialize on that channel's lock; independent channels do not
/// contend with each other.
pub struct AudioFocus {
    channels: Mutex<HashMap<String, Arc<Mutex<ChannelMachine>>>>,
    events: broadcast::Sender<DirectiveEvent>,
}

impl AudioFocus {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(128);
        Self { channels: Mutex::new(HashMap::new()), events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DirectiveEvent> {
        self.events.subscribe()
    }

    async fn channel(&self, name: &str) -> Arc<Mutex<ChannelMachine>> {
        let mut map = self.channels.lock().await;
        map.entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ChannelMachine::new())))
            .clone()
    }

    async fn run<F>(&self, channel: &str, op: F) -> Vec<OrchestrationDirective>
    where
        F: FnOnce(&mut ChannelMachine) -> Vec<OrchestrationDirective>,
    {
        let chan = self.channel(channel).await;
        let mut machine = chan.lock().await;
        let directives = op(&mut machine);
        for d in &directives {
            let _ = self.events.send(DirectiveEvent {
                channel: channel.to_string(),
                directive: *d,
                payload: machine.registry().payload_of(d.target),
            });
        }
        directives
    }

    pub async fn submit(&self, channel: &str, item: AudioItem) -> Vec<OrchestrationDirective> {
        debug!(channel, id = %item.id, urgency = ?item.urgency, kind = ?item.kind, "audio submit");
        self.run(channel, |m| m.submit(item)).await
    }

    pub async fn submit_batch(
        &self,
        channel: &str,
        items: Vec<AudioItem>,
    ) -> Vec<OrchestrationDirective> {
        self.run(channel, |m| m.submit_batch(items)).await
    }

    pub async fn complete(&self, channel: &str, id: Uuid) -> Vec<OrchestrationDirective> {
        self.run(channel, |m| m.complete(id)).await
    }

    pub async fn cancel(&self, channel: &str, id: Uuid) -> Vec<OrchestrationDirective> {
        self.run(channel, |m| m.cancel(id)).await
    }

    pub async fn signal_gap(&self, channel: &str) -> Vec<OrchestrationDirective> {
        self.run(channel, |m| m.signal_gap()).await
    }

    /// Sink failure path: log the drop, reset the channel, never retry.
    pub async fn directive_failed(
        &self,
        channel: &str,
        failed: OrchestrationDirective,
    ) -> Vec<OrchestrationDirective> {
        let err = WayfarerError::AudioSink { channel: channel.to_string(), action: failed.action };
        warn!(target_item = %failed.target, "{err}, resetting channel");
        self.run(channel, |m| m.flush()).await
    }

    pub async fn record_position(&self, channel: &str, id: Uuid, position_ms: u64) {
        let chan = self.channel(channel).await;
        chan.lock().await.record_position(id, position_ms);
    }

    pub async fn state_of(&self, channel: &str, id: Uuid) -> Option<PlaybackState> {
        let chan = self.channel(channel).await;
        let machine = chan.lock().await;
        machine.registry().state_of(id)
    }

    pub async fn position_of(&self, channel: &str, id: Uuid) -> u64 {
        let chan = self.channel(channel).await;
        let machine = chan.lock().await;
        machine.registry().position(id)
    }
}

impl Default for AudioFocus {
    fn default() -> Self {
        Self::new()
    }
}
