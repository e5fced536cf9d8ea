//! Player: the engine plus the like store behind one dispatch table.

use tracing::debug;

use crate::audio::AudioOutput;
use crate::engine::PlaybackEngine;
use crate::likes::LikeStore;
use crate::protocol::{Command, PlayerSnapshot};
use crate::queue::QueueView;

pub struct Player<A: AudioOutput> {
    pub engine: PlaybackEngine<A>,
    pub likes: LikeStore,
}

/// What a dispatched command touched, so the caller knows what to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touched {
    Playback,
    Likes,
}

impl<A: AudioOutput> Player<A> {
    pub fn new(engine: PlaybackEngine<A>, likes: LikeStore) -> Self {
        Self { engine, likes }
    }

    pub async fn dispatch(&mut self, cmd: Command) -> Touched {
        debug!("player: dispatch {:?}", cmd);
        match cmd {
            Command::Select { id } => self.engine.select_track(id).await,
            Command::TogglePause => self.engine.toggle_play_pause().await,
            Command::Next => self.engine.next().await,
            Command::Previous => self.engine.previous().await,
            Command::CycleShuffle => self.engine.cycle_shuffle(),
            Command::CycleRepeat => self.engine.cycle_repeat(),
            Command::ToggleLike => {
                if let Some(id) = self.engine.state().current_track_id {
                    self.likes.toggle(id);
                }
                return Touched::Likes;
            }
            Command::ToggleLikeAt { id } => {
                self.likes.toggle(id);
                return Touched::Likes;
            }
            Command::Seek { seconds } => self.engine.seek(seconds).await,
            Command::SeekRelative { seconds } => self.engine.seek_relative(seconds).await,
            Command::Volume { value } => self.engine.set_volume(value).await,
            Command::Audio { event } => self.engine.apply_audio_event(event).await,
        }
        Touched::Playback
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let state = self.engine.snapshot();
        let catalog = self.engine.catalog();
        let current_track = self.engine.current_track().cloned();
        let current_liked = state
            .current_track_id
            .map(|id| self.likes.is_liked(id))
            .unwrap_or(false);
        PlayerSnapshot {
            queue: QueueView::project(catalog, &state),
            liked: self.likes.liked_ids(),
            current_liked,
            current_track,
            state,
        }
    }
}
