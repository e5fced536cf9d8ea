//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this, but never mutate it.  The App event-loop is the only
//! thing that writes to AppState.

use lyrica_core::protocol::PlayerSnapshot;
use lyrica_core::state::PlaybackState;

pub struct AppState {
    /// Latest snapshot published by PlayerCore.
    pub snapshot: PlayerSnapshot,
    pub show_queue: bool,
    pub show_keys: bool,
}

impl AppState {
    pub fn new(snapshot: PlayerSnapshot) -> Self {
        Self {
            snapshot,
            show_queue: true,
            show_keys: true,
        }
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.snapshot.state
    }

    pub fn current_id(&self) -> Option<usize> {
        self.snapshot.state.current_track_id
    }

    /// Catalog length; the queue projection has one row per track.
    pub fn track_count(&self) -> usize {
        self.snapshot.queue.len()
    }

    pub fn is_liked(&self, id: usize) -> bool {
        self.snapshot.liked.contains(&id)
    }

    /// Volume after a relative step, clamped to `[0, 1]`.
    pub fn stepped_volume(&self, delta: f32) -> f32 {
        (self.snapshot.state.volume + delta).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
pub(crate) fn test_state(titles: &[&str]) -> AppState {
    use lyrica_core::queue::QueueEntry;

    let queue = titles
        .iter()
        .enumerate()
        .map(|(id, t)| QueueEntry {
            id,
            title: t.to_string(),
            artist: "Artist".to_string(),
            is_current: false,
        })
        .collect();
    AppState::new(PlayerSnapshot {
        state: PlaybackState::default(),
        current_track: None,
        current_liked: false,
        liked: Vec::new(),
        queue,
    })
}
