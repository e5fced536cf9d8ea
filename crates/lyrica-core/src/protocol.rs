use serde::{Deserialize, Serialize};

use crate::audio::AudioEvent;
use crate::catalog::Track;
use crate::queue::QueueEntry;
use crate::state::PlaybackState;

/// Every input the player core accepts.  UI key bindings, the HTTP control
/// API and the audio adapter all speak this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum Command {
    Select { id: usize },
    TogglePause,
    Next,
    Previous,
    CycleShuffle,
    CycleRepeat,
    /// Like/unlike the current track.
    ToggleLike,
    ToggleLikeAt { id: usize },
    Seek { seconds: f64 },
    SeekRelative { seconds: f64 },
    Volume { value: f32 },
    Audio { event: AudioEvent },
}

/// Read-only view of the whole player for front-ends.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub current_track: Option<Track>,
    pub current_liked: bool,
    pub liked: Vec<usize>,
    pub queue: Vec<QueueEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_use_cmd_tag() {
        let json = serde_json::to_value(Command::Select { id: 3 }).unwrap();
        assert_eq!(json, serde_json::json!({ "cmd": "Select", "id": 3 }));

        let decoded: Command = serde_json::from_str(r#"{"cmd":"TogglePause"}"#).unwrap();
        assert_eq!(decoded, Command::TogglePause);
    }

    #[test]
    fn audio_events_nest_inside_commands() {
        let cmd = Command::Audio {
            event: AudioEvent::TimeUpdated { position: 1.5 },
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
