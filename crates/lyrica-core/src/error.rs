//! Error taxonomy for the player core.
//!
//! None of these cross the event boundary: the engine and the like store
//! turn them into warnings and settle into a well-defined state.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// The audio primitive could not load or start a URI.
    #[error("cannot play {uri}: {reason}")]
    MediaLoad { uri: String, reason: String },

    /// Durable storage unreadable, corrupt or unwritable.
    #[error("storage {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },

    /// A play or like report did not reach the collector.
    #[error("report to {endpoint} failed: {reason}")]
    NetworkReport { endpoint: String, reason: String },

    /// Track list missing, empty or malformed.
    #[error("catalog: {0}")]
    Catalog(String),
}

impl PlayerError {
    pub fn media(uri: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MediaLoad {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    pub fn persistence(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;
