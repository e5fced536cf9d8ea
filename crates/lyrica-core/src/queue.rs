//! QueueView: stateless projection of the engine position onto the catalog.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::state::PlaybackState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub id: usize,
    pub title: String,
    pub artist: String,
    pub is_current: bool,
}

pub struct QueueView;

impl QueueView {
    /// One entry per catalog track, in catalog order, highlighting the
    /// current one.
    pub fn project(catalog: &Catalog, state: &PlaybackState) -> Vec<QueueEntry> {
        catalog
            .iter()
            .map(|t| QueueEntry {
                id: t.id,
                title: t.title.clone(),
                artist: t.artist.clone(),
                is_current: state.current_track_id == Some(t.id),
            })
            .collect()
    }

    /// Tracks that will follow the current one without user input.
    /// Empty under shuffle (not deterministic) or repeat-one.
    pub fn upcoming(catalog: &Catalog, state: &PlaybackState) -> Vec<usize> {
        Self::upcoming_in(catalog.len(), state)
    }

    /// `upcoming` for a catalog of `len` tracks, for callers holding only a
    /// snapshot.  Under repeat-all the wrap stops just before the current
    /// track.
    pub fn upcoming_in(len: usize, state: &PlaybackState) -> Vec<usize> {
        use crate::state::RepeatMode;

        if state.shuffle || state.repeat_mode == RepeatMode::One {
            return Vec::new();
        }
        let start = state.current_track_id.map(|c| c + 1).unwrap_or(0);
        let mut ids: Vec<usize> = (start..len).collect();
        if let (RepeatMode::All, Some(current)) = (state.repeat_mode, state.current_track_id) {
            ids.extend(0..current.min(len));
        }
        ids
    }
}
