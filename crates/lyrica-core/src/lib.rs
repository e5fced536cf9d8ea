//! Core of the lyrica player: catalog, playback engine, liked tracks and
//! collector reporting.  No UI code lives here.

pub mod audio;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod likes;
pub mod platform;
pub mod play_log;
pub mod player;
pub mod protocol;
pub mod queue;
pub mod report;
pub mod state;

pub use audio::{AudioEvent, AudioOutput};
pub use catalog::{Catalog, Track};
pub use engine::{EngineEvent, PlaybackEngine};
pub use error::PlayerError;
pub use likes::LikeStore;
pub use player::Player;
pub use state::{PlaybackState, RepeatMode};
