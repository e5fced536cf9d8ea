//! The narrow seam between the engine and the platform audio primitive.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Callbacks the primitive raises.  The owner of the engine forwards each one
/// to `PlaybackEngine::apply_audio_event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AudioEvent {
    MetadataLoaded { duration: f64 },
    TimeUpdated { position: f64 },
    Ended,
    /// Late load/decode failure reported after `load` returned.
    Error { message: String },
}

/// Platform media primitive.  Volume is a `[0, 1]` fraction.
#[async_trait]
pub trait AudioOutput: Send {
    async fn load(&mut self, uri: &str) -> anyhow::Result<()>;
    /// Resolves once playback has actually started (or was rejected).
    async fn play(&mut self) -> anyhow::Result<()>;
    async fn pause(&mut self) -> anyhow::Result<()>;
    async fn seek(&mut self, seconds: f64) -> anyhow::Result<()>;
    async fn set_volume(&mut self, volume: f32) -> anyhow::Result<()>;
}
