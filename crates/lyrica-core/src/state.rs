use serde::{Deserialize, Serialize};

/// Playback modes when the current track ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    Off,
    /// Wrap to the first track.
    All,
    /// Loop the current track.
    One,
}

impl RepeatMode {
    /// Off → All → One → Off.
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }
}

/// Transport state of the session.  Owned by `PlaybackEngine`; everyone
/// else sees clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_track_id: Option<usize>,
    pub is_playing: bool,
    pub shuffle: bool,
    pub repeat_mode: RepeatMode,
    /// Elapsed seconds in the current track.
    pub position: f64,
    /// `None` until the primitive reports metadata.
    pub duration: Option<f64>,
    pub volume: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track_id: None,
            is_playing: false,
            shuffle: false,
            repeat_mode: RepeatMode::Off,
            position: 0.0,
            duration: None,
            volume: 0.5,
        }
    }
}

impl PlaybackState {
    /// Fraction of the track elapsed, 0.0 while duration is pending.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 => (self.position / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Clamp a position into `[0, duration]`, or `[0, ∞)` while pending.
    pub fn clamp_position(&self, seconds: f64) -> f64 {
        let s = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        match self.duration {
            Some(d) => s.min(d),
            None => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_cycles_through_three_modes() {
        let mut mode = RepeatMode::Off;
        let seen: Vec<_> = (0..4)
            .map(|_| {
                mode = mode.next();
                mode
            })
            .collect();
        assert_eq!(
            seen,
            vec![RepeatMode::All, RepeatMode::One, RepeatMode::Off, RepeatMode::All]
        );
    }

    #[test]
    fn clamp_respects_known_duration() {
        let mut state = PlaybackState::default();
        assert_eq!(state.clamp_position(-4.0), 0.0);
        assert_eq!(state.clamp_position(500.0), 500.0);
        state.duration = Some(120.0);
        assert_eq!(state.clamp_position(500.0), 120.0);
        assert_eq!(state.clamp_position(f64::NAN), 0.0);
    }

    #[test]
    fn progress_is_zero_while_pending() {
        let mut state = PlaybackState {
            position: 30.0,
            ..Default::default()
        };
        assert_eq!(state.progress(), 0.0);
        state.duration = Some(60.0);
        assert_eq!(state.progress(), 0.5);
    }
}
