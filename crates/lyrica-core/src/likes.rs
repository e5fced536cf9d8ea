//! LikeStore: durable set of liked tracks.
//!
//! The file holds a JSON array of track descriptors and is matched back to
//! the catalog by media URI.  It is read once on open and rewritten in full
//! on every toggle.  The local file is authoritative; the collector only
//! receives a best-effort mirror.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Track};
use crate::error::{PlayerError, Result};
use crate::report::{LikeEvent, Report, ReportSink};

/// Stored form of a liked track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedTrack {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    /// Media URI, the matching key.
    pub file: String,
    #[serde(default)]
    pub cover: String,
}

impl From<&Track> for LikedTrack {
    fn from(t: &Track) -> Self {
        Self {
            title: t.title.clone(),
            artist: t.artist.clone(),
            file: t.media_uri.clone(),
            cover: t.artwork_uri.clone(),
        }
    }
}

pub struct LikeStore {
    path: PathBuf,
    catalog: Arc<Catalog>,
    liked: BTreeSet<usize>,
    /// Stored entries with no catalog match, written back untouched.
    orphans: Vec<LikedTrack>,
    sink: Arc<dyn ReportSink>,
}

impl LikeStore {
    /// Load the set from `path`.  A missing or corrupt file yields an empty set.
    pub fn open(path: impl Into<PathBuf>, catalog: Arc<Catalog>, sink: Arc<dyn ReportSink>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("{}; starting with no liked tracks", e);
                Vec::new()
            }
        };

        let mut liked = BTreeSet::new();
        let mut orphans: Vec<LikedTrack> = Vec::new();
        for entry in entries {
            match catalog.find_by_media_uri(&entry.file) {
                Some(track) => {
                    liked.insert(track.id);
                }
                None if !orphans.iter().any(|o| o.file == entry.file) => orphans.push(entry),
                None => {}
            }
        }
        info!(
            "likes: {} liked ({} not in catalog) from {}",
            liked.len(),
            orphans.len(),
            path.display()
        );

        Self {
            path,
            catalog,
            liked,
            orphans,
            sink,
        }
    }

    pub fn is_liked(&self, id: usize) -> bool {
        self.liked.contains(&id)
    }

    pub fn liked_ids(&self) -> Vec<usize> {
        self.liked.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.liked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
    }

    /// Flip membership of `id`, persist, then mirror to the collector.
    /// Returns the new membership, or `None` for an unknown id.
    pub fn toggle(&mut self, id: usize) -> Option<bool> {
        let Some(track) = self.catalog.get(id) else {
            warn!("likes: ignoring toggle for unknown track {}", id);
            return None;
        };
        let title = track.title.clone();

        let liked = if self.liked.remove(&id) {
            info!("likes: removed {}", title);
            false
        } else {
            self.liked.insert(id);
            info!("likes: added {}", title);
            true
        };

        // In-memory state stays even if the write fails.
        if let Err(e) = self.persist() {
            warn!("{}", e);
        }

        self.sink.send(Report::Like(LikeEvent {
            song_title: title,
            liked,
        }));
        Some(liked)
    }

    /// Canonical file contents: catalog order, then orphans as loaded.
    fn entries(&self) -> Vec<LikedTrack> {
        self.liked
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .map(LikedTrack::from)
            .chain(self.orphans.iter().cloned())
            .collect()
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries())
            .map_err(|e| PlayerError::persistence(&self.path, e))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PlayerError::persistence(parent, e))?;
        }
        std::fs::write(&self.path, json).map_err(|e| PlayerError::persistence(&self.path, e))?;
        debug!("likes: wrote {} entries", self.liked.len() + self.orphans.len());
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Vec<LikedTrack>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PlayerError::persistence(path, e)),
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|e| PlayerError::persistence(path, e))
}
