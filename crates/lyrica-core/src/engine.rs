//! PlaybackEngine: single owner of `PlaybackState`.
//!
//! Every public operation runs to completion before the caller handles the
//! next event.  The only awaited primitive call that matters for state is
//! `play()`: `is_playing` flips to `true` only after it resolves, so a
//! rejected start leaves the engine paused with the attempted track still
//! current.
//!
//! The engine talks to the outside through exactly two things: the
//! `AudioOutput` it drives and the notification callback it was built with.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, info, warn};

use crate::audio::{AudioEvent, AudioOutput};
use crate::catalog::{Catalog, Track};
use crate::error::PlayerError;
use crate::play_log::PlaybackLogger;
use crate::state::{PlaybackState, RepeatMode};

/// Elapsed seconds after which "previous" restarts the current track.
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

/// What observers are told after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    StateChanged(PlaybackState),
    /// Non-fatal problem worth showing to the user.
    Warning(String),
}

pub type Notify = Box<dyn Fn(EngineEvent) + Send + Sync>;

pub struct PlaybackEngine<A: AudioOutput> {
    catalog: Arc<Catalog>,
    audio: A,
    logger: PlaybackLogger,
    state: PlaybackState,
    /// True once the current track's media loaded without a later error.
    media_loaded: bool,
    notify: Notify,
    rng: Box<dyn RngCore + Send + Sync>,
}

impl<A: AudioOutput> PlaybackEngine<A> {
    pub fn new(catalog: Arc<Catalog>, audio: A, logger: PlaybackLogger, notify: Notify) -> Self {
        Self {
            catalog,
            audio,
            logger,
            state: PlaybackState::default(),
            media_loaded: false,
            notify,
            rng: Box::new(StdRng::from_entropy()),
        }
    }

    /// Replace the shuffle randomness source.
    pub fn with_rng(mut self, rng: impl RngCore + Send + Sync + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.state.clone()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_track_id.and_then(|id| self.catalog.get(id))
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    // ── transport ────────────────────────────────────────────────────────────

    /// Load and start `id`.  Invalid ids are rejected with a warning.
    pub async fn select_track(&mut self, id: usize) {
        let Some(track) = self.catalog.get(id).cloned() else {
            self.warn(format!("No track #{} in catalog", id));
            return;
        };
        info!("engine: select #{} {} by {}", id, track.title, track.artist);

        self.state.current_track_id = Some(id);
        self.state.is_playing = false;
        self.state.position = 0.0;
        self.state.duration = None;
        self.media_loaded = false;

        if let Err(e) = self.audio.load(&track.media_uri).await {
            self.fail(PlayerError::media(&track.media_uri, e));
            return;
        }
        self.media_loaded = true;

        match self.audio.play().await {
            Ok(()) => {
                self.state.is_playing = true;
                self.logger.record(id, &track.title);
                self.changed();
            }
            Err(e) => self.fail(PlayerError::media(&track.media_uri, e)),
        }
    }

    pub async fn toggle_play_pause(&mut self) {
        let Some(id) = self.state.current_track_id else {
            return self.select_track(0).await;
        };
        if !self.media_loaded {
            // Previous load failed; retry instead of unpausing nothing.
            return self.select_track(id).await;
        }

        if self.state.is_playing {
            if let Err(e) = self.audio.pause().await {
                warn!("engine: pause failed: {}", e);
            }
            self.state.is_playing = false;
            self.changed();
        } else {
            match self.audio.play().await {
                Ok(()) => {
                    self.state.is_playing = true;
                    self.changed();
                }
                Err(e) => {
                    let uri = self.current_uri();
                    self.fail(PlayerError::media(uri, e));
                }
            }
        }
    }

    pub async fn next(&mut self) {
        let current = self.current_index();
        if self.state.shuffle {
            let id = self.random_other();
            return self.select_track(id).await;
        }
        if current + 1 < self.catalog.len() {
            self.select_track(current + 1).await;
        } else if self.state.repeat_mode == RepeatMode::Off {
            debug!("engine: next at end of catalog with repeat off, stopping");
            self.stop().await;
        } else {
            self.select_track(0).await;
        }
    }

    pub async fn previous(&mut self) {
        if self.state.current_track_id.is_some() && self.state.position > RESTART_THRESHOLD_SECS {
            return self.restart_current().await;
        }
        if self.state.shuffle {
            let id = self.random_other();
            return self.select_track(id).await;
        }
        let len = self.catalog.len();
        let id = (self.current_index() + len - 1) % len;
        self.select_track(id).await;
    }

    pub fn cycle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
        info!(
            "engine: shuffle {}",
            if self.state.shuffle { "enabled" } else { "disabled" }
        );
        self.changed();
    }

    pub fn cycle_repeat(&mut self) {
        self.state.repeat_mode = self.state.repeat_mode.next();
        info!("engine: repeat mode {}", self.state.repeat_mode.label());
        self.changed();
    }

    pub async fn seek(&mut self, seconds: f64) {
        if self.state.current_track_id.is_none() || !self.media_loaded {
            debug!("engine: seek ignored, nothing loaded");
            return;
        }
        let target = self.state.clamp_position(seconds);
        match self.audio.seek(target).await {
            Ok(()) => self.state.position = target,
            Err(e) => warn!("engine: seek to {:.1}s failed: {}", target, e),
        }
        self.changed();
    }

    pub async fn seek_relative(&mut self, delta: f64) {
        let target = self.state.position + delta;
        self.seek(target).await;
    }

    /// Clamp to `[0, 1]`.  Non-finite input is ignored.
    pub async fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        if let Err(e) = self.audio.set_volume(volume).await {
            warn!("engine: set volume failed: {}", e);
        }
        self.state.volume = volume;
        self.changed();
    }

    // ── audio callbacks ──────────────────────────────────────────────────────

    pub async fn apply_audio_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::MetadataLoaded { duration } => self.on_metadata_loaded(duration),
            AudioEvent::TimeUpdated { position } => self.on_time_updated(position),
            AudioEvent::Ended => self.on_track_ended().await,
            AudioEvent::Error { message } => self.on_media_error(message),
        }
    }

    pub fn on_metadata_loaded(&mut self, duration: f64) {
        if !duration.is_finite() || duration < 0.0 {
            return;
        }
        self.state.duration = Some(duration);
        self.state.position = self.state.clamp_position(self.state.position);
        self.changed();
    }

    pub fn on_time_updated(&mut self, position: f64) {
        self.state.position = self.state.clamp_position(position);
        self.changed();
    }

    pub async fn on_track_ended(&mut self) {
        let Some(current) = self.state.current_track_id else {
            return;
        };
        if self.state.repeat_mode == RepeatMode::One {
            // The primitive is paused at end of media (keep-open), so always resume.
            self.restart_current().await;
            match self.audio.play().await {
                Ok(()) => {
                    self.state.is_playing = true;
                    self.changed();
                }
                Err(e) => {
                    let uri = self.current_uri();
                    self.fail(PlayerError::media(uri, e));
                }
            }
        } else if self.state.shuffle {
            let id = self.random_other();
            self.select_track(id).await;
        } else if current + 1 < self.catalog.len() {
            self.select_track(current + 1).await;
        } else if self.state.repeat_mode == RepeatMode::All {
            self.select_track(0).await;
        } else {
            info!("engine: end of catalog");
            self.state.is_playing = false;
            self.changed();
        }
    }

    pub fn on_media_error(&mut self, message: String) {
        if self.state.current_track_id.is_none() {
            debug!("engine: media error with nothing loaded: {}", message);
            return;
        }
        let uri = self.current_uri();
        self.media_loaded = false;
        self.fail(PlayerError::media(uri, message));
    }

    // ── helpers ──────────────────────────────────────────────────────────────

    fn current_index(&self) -> usize {
        self.state.current_track_id.unwrap_or(0)
    }

    fn current_uri(&self) -> String {
        self.current_track()
            .map(|t| t.media_uri.clone())
            .unwrap_or_default()
    }

    /// Uniform pick over the catalog minus the current track.  A single-track
    /// catalog advances by one (i.e. restarts the only track).
    fn random_other(&mut self) -> usize {
        let len = self.catalog.len();
        match self.state.current_track_id {
            None => self.rng.gen_range(0..len),
            Some(current) if len <= 1 => (current + 1) % len,
            Some(current) => {
                let pick = self.rng.gen_range(0..len - 1);
                if pick >= current {
                    pick + 1
                } else {
                    pick
                }
            }
        }
    }

    async fn restart_current(&mut self) {
        if let Err(e) = self.audio.seek(0.0).await {
            warn!("engine: restart seek failed: {}", e);
        }
        self.state.position = 0.0;
        self.changed();
    }

    async fn stop(&mut self) {
        if self.state.is_playing {
            if let Err(e) = self.audio.pause().await {
                warn!("engine: pause failed: {}", e);
            }
        }
        self.state.is_playing = false;
        self.changed();
    }

    /// Settle into paused and surface the error.
    fn fail(&mut self, error: PlayerError) {
        self.state.is_playing = false;
        self.warn(error.to_string());
        self.changed();
    }

    fn warn(&self, message: String) {
        warn!("engine: {}", message);
        (self.notify)(EngineEvent::Warning(message));
    }

    fn changed(&self) {
        (self.notify)(EngineEvent::StateChanged(self.state.clone()));
    }
}
