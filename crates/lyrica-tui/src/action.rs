//! Action enum: all user-initiated intents.

use lyrica_core::protocol::Command;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    TrackList,
    QueuePanel,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Playback ─────────────────────────────────────────────────────────────
    Select(usize),
    TogglePause,
    Next,
    Prev,
    CycleShuffle,
    CycleRepeat,
    SeekRelative(f64),
    Volume(f32),

    // ── Likes ────────────────────────────────────────────────────────────────
    ToggleLike,
    ToggleLikeAt(usize),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    SelectUp(usize),
    SelectDown(usize),
    SelectFirst,
    SelectLast,
    JumpToCurrent,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleQueue,
    ToggleKeys,

    Quit,
}

impl Action {
    /// The core command this action forwards, if any.
    pub fn command(&self) -> Option<Command> {
        Some(match *self {
            Action::Select(id) => Command::Select { id },
            Action::TogglePause => Command::TogglePause,
            Action::Next => Command::Next,
            Action::Prev => Command::Previous,
            Action::CycleShuffle => Command::CycleShuffle,
            Action::CycleRepeat => Command::CycleRepeat,
            Action::SeekRelative(seconds) => Command::SeekRelative { seconds },
            Action::Volume(value) => Command::Volume { value },
            Action::ToggleLike => Command::ToggleLike,
            Action::ToggleLikeAt(id) => Command::ToggleLikeAt { id },
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_actions_map_to_commands() {
        assert_eq!(Action::Prev.command(), Some(Command::Previous));
        assert_eq!(
            Action::SeekRelative(-5.0).command(),
            Some(Command::SeekRelative { seconds: -5.0 })
        );
        assert_eq!(
            Action::ToggleLikeAt(3).command(),
            Some(Command::ToggleLikeAt { id: 3 })
        );
    }

    #[test]
    fn ui_actions_stay_local() {
        assert_eq!(Action::ToggleQueue.command(), None);
        assert_eq!(Action::SelectDown(1).command(), None);
        assert_eq!(Action::Quit.command(), None);
    }
}
