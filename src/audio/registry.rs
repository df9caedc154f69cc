use std::collections::{HashMap, VecDeque};

use uuid::Uuid;

use super::item::{AudioItem, AudioPayload, PlaybackState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendMode {
    Paused,
    Ducked,
}

/// A suspended item plus its resume bookmark.
#[derive(Debug, Clone, Copy)]
pub struct Suspended {
    pub id: Uuid,
    pub mode: SuspendMode,
    pub position_ms: u64,
}

/// Bookkeeping for every item submitted on one channel: the single playing
/// slot, the suspension stack (most recent last), and the wait-for-gap queue.
/// Pure storage; all transition decisions live in the channel machine.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    items: HashMap<Uuid, AudioItem>,
    positions: HashMap<Uuid, u64>,
    playing: Option<Uuid>,
    suspended: Vec<Suspended>,
    queue: VecDeque<Uuid>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: AudioItem) {
        self.items.insert(item.id, item);
    }

    pub fn item(&self, id: Uuid) -> Option<&AudioItem> {
        self.items.get(&id)
    }

    pub fn state_of(&self, id: Uuid) -> Option<PlaybackState> {
        self.items.get(&id).map(|i| i.state)
    }

    pub fn payload_of(&self, id: Uuid) -> Option<AudioPayload> {
        self.items.get(&id).map(|i| i.payload.clone())
    }

    pub fn playing(&self) -> Option<Uuid> {
        self.playing
    }

    pub fn suspended(&self) -> &[Suspended] {
        &self.suspended
    }

    pub fn queued(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.queue.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioItem> {
        self.items.values()
    }

    fn set_state(&mut self, id: Uuid, state: PlaybackState) {
        if let Some(item) = self.items.get_mut(&id) {
            item.state = state;
        }
    }

    /// Sink feedback: last known playhead for an item.
    pub fn record_position(&mut self, id: Uuid, position_ms: u64) {
        self.positions.insert(id, position_ms);
    }

    pub fn position(&self, id: Uuid) -> u64 {
        self.positions.get(&id).copied().unwrap_or(0)
    }

    pub fn promote(&mut self, id: Uuid) {
        self.playing = Some(id);
        self.set_state(id, PlaybackState::Playing);
    }

    pub fn enqueue(&mut self, id: Uuid) {
        self.set_state(id, PlaybackState::Queued);
        self.queue.push_back(id);
    }

    pub fn dequeue(&mut self) -> Option<Uuid> {
        self.queue.pop_front()
    }

    pub fn remove_queued(&mut self, id: Uuid) -> bool {
        let before = self.queue.len();
        self.queue.retain(|q| *q != id);
        before != self.queue.len()
    }

    /// Move the playing item onto the suspension stack with a bookmark.
    pub fn suspend_playing(&mut self, mode: SuspendMode) -> Option<Suspended> {
        let id = self.playing.take()?;
        let state = match mode {
            SuspendMode::Paused => PlaybackState::Paused,
            SuspendMode::Ducked => PlaybackState::Ducked,
        };
        self.set_state(id, state);
        let entry = Suspended { id, mode, position_ms: self.position(id) };
        self.suspended.push(entry);
        Some(entry)
    }

    /// A ducked item may exist only while its ducker plays. Once the ducker
    /// leaves the playing slot, any ducked entry falls back to paused.
    pub fn demote_ducked(&mut self) {
        let mut demoted = Vec::new();
        for entry in self.suspended.iter_mut() {
            if entry.mode == SuspendMode::Ducked {
                entry.mode = SuspendMode::Paused;
                demoted.push(entry.id);
            }
        }
        for id in demoted {
            self.set_state(id, PlaybackState::Paused);
        }
    }

    /// Most recently suspended item, if any.
    pub fn pop_suspended(&mut self) -> Option<Suspended> {
        self.suspended.pop()
    }

    pub fn remove_suspended(&mut self, id: Uuid) -> Option<Suspended> {
        let idx = self.suspended.iter().position(|s| s.id == id)?;
        Some(self.suspended.remove(idx))
    }

    /// Terminal transition for the playing item.
    pub fn finish_playing(&mut self, state: PlaybackState) -> Option<Uuid> {
        let id = self.playing.take()?;
        self.set_state(id, state);
        Some(id)
    }

    pub fn finish(&mut self, id: Uuid, state: PlaybackState) {
        self.set_state(id, state);
    }

    pub fn playing_count(&self) -> usize {
        self.items
            .values()
            .filter(|i| i.state == PlaybackState::Playing)
            .count()
    }

    pub fn ducked_count(&self) -> usize {
        self.items
            .values()
            .filter(|i| i.state == PlaybackState::Ducked)
            .count()
    }
}
