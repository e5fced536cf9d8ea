//! Catalog: the immutable, ordered track list of a session.
//!
//! Sources, highest priority first: the configured `catalog.toml`, a
//! `catalog.toml` beside the executable, one in the working directory, and
//! finally the built-in demo list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::CatalogConfig;
use crate::error::{PlayerError, Result};

/// A playable track.  `id` is its position in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: usize,
    pub title: String,
    pub artist: String,
    pub media_uri: String,
    pub artwork_uri: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog from descriptors; ids are reassigned by position.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::Catalog("no tracks".to_string()));
        }
        let tracks = tracks
            .into_iter()
            .enumerate()
            .map(|(id, t)| Track { id, ..t })
            .collect();
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn find_by_media_uri(&self, uri: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.media_uri == uri)
    }

    /// The demo list shipped with the player.
    pub fn builtin(media_base: &str) -> Self {
        let base = media_base.trim_end_matches('/');
        let tracks = BUILTIN
            .iter()
            .enumerate()
            .map(|(id, (title, artist, file, cover))| Track {
                id,
                title: title.to_string(),
                artist: artist.to_string(),
                media_uri: format!("{}/{}", base, file),
                artwork_uri: format!("images/{}", cover),
            })
            .collect();
        Self { tracks }
    }
}

const BUILTIN: &[(&str, &str, &str, &str)] = &[
    ("Disfigure", "NCS Release", "disfigure.mp3", "disfigure.jpg"),
    ("Fade", "Alan Walker", "fade.mp3", "fade.jpg"),
    ("Fearless", "Lost Sky", "fearless.mp3", "fearless.jpg"),
    ("Sky High", "Elektronomia", "sky high.mp3", "skyhigh.jpg"),
    ("Spektrem", "NCS Release", "spektrem.mp3", "spektrem.jpg"),
];

// ── TOML loader ───────────────────────────────────────────────────────────────

/// Matches the `[[track]]` table of a catalog file.  Kept apart from `Track`
/// so ids never come from user input.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    track: Vec<TomlTrack>,
}

#[derive(Debug, Deserialize)]
struct TomlTrack {
    title: String,
    #[serde(default)]
    artist: String,
    media_uri: String,
    #[serde(default)]
    artwork_uri: String,
}

pub fn parse_catalog_toml_str(content: &str) -> Result<Catalog> {
    let file: TomlCatalogFile =
        toml::from_str(content).map_err(|e| PlayerError::Catalog(e.to_string()))?;
    let tracks = file
        .track
        .into_iter()
        .map(|t| Track {
            id: 0,
            title: t.title,
            artist: t.artist,
            media_uri: t.media_uri,
            artwork_uri: t.artwork_uri,
        })
        .collect();
    Catalog::new(tracks)
}

pub fn load_catalog_toml(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PlayerError::Catalog(format!("{}: {}", path.display(), e)))?;
    parse_catalog_toml_str(&content)
}

/// Resolve the session catalog.  Never fails: unreadable sources are logged
/// and skipped, ending at the built-in list.
pub fn load_catalog(config: &CatalogConfig) -> Catalog {
    let mut candidates: Vec<PathBuf> = vec![config.catalog_toml.clone()];
    if let Some(dir) = crate::platform::exe_dir() {
        candidates.push(dir.join("catalog.toml"));
    }
    candidates.push(PathBuf::from("catalog.toml"));

    for path in candidates.iter().filter(|p| p.exists()) {
        match load_catalog_toml(path) {
            Ok(c) => {
                info!("Loaded {} tracks from {}", c.len(), path.display());
                return c;
            }
            Err(e) => warn!("Skipping catalog {}: {}", path.display(), e),
        }
    }

    let catalog = Catalog::builtin(&config.media_base);
    info!("Using built-in catalog ({} tracks)", catalog.len());
    catalog
}
