#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use lyrica_core::audio::AudioOutput;
use lyrica_core::catalog::{Catalog, Track};
use lyrica_core::engine::{EngineEvent, PlaybackEngine};
use lyrica_core::play_log::PlaybackLogger;
use lyrica_core::report::{Report, ReportSink};

/// One call made on the scripted audio primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    Volume(f32),
}

/// Scripted `AudioOutput`: records every call, fails on demand.
#[derive(Default)]
pub struct MockAudio {
    pub calls: Vec<AudioCall>,
    pub fail_play: bool,
    pub fail_load: HashSet<String>,
}

impl MockAudio {
    pub fn last(&self) -> Option<&AudioCall> {
        self.calls.last()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Load(uri) => Some(uri.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl AudioOutput for MockAudio {
    async fn load(&mut self, uri: &str) -> Result<()> {
        self.calls.push(AudioCall::Load(uri.to_string()));
        if self.fail_load.contains(uri) {
            return Err(anyhow!("unsupported media"));
        }
        Ok(())
    }

    async fn play(&mut self) -> Result<()> {
        self.calls.push(AudioCall::Play);
        if self.fail_play {
            return Err(anyhow!("play() interrupted"));
        }
        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        self.calls.push(AudioCall::Pause);
        Ok(())
    }

    async fn seek(&mut self, seconds: f64) -> Result<()> {
        self.calls.push(AudioCall::Seek(seconds));
        Ok(())
    }

    async fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.calls.push(AudioCall::Volume(volume));
        Ok(())
    }
}

/// Sink that keeps every report in memory.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub reports: Arc<Mutex<Vec<Report>>>,
}

impl RecordingSink {
    pub fn taken(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl ReportSink for RecordingSink {
    fn send(&self, report: Report) {
        self.reports.lock().unwrap().push(report);
    }
}

pub fn catalog(titles: &[&str]) -> Arc<Catalog> {
    let tracks = titles
        .iter()
        .map(|t| Track {
            id: 0,
            title: t.to_string(),
            artist: format!("{} Artist", t),
            media_uri: format!("/songs/{}.mp3", t.to_lowercase()),
            artwork_uri: format!("images/{}.jpg", t.to_lowercase()),
        })
        .collect();
    Arc::new(Catalog::new(tracks).unwrap())
}

pub struct Harness {
    pub engine: PlaybackEngine<MockAudio>,
    pub sink: RecordingSink,
    pub events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl Harness {
    pub fn new(titles: &[&str]) -> Self {
        Self::with_catalog(catalog(titles))
    }

    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        let sink = RecordingSink::default();
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = events.clone();
        let engine = PlaybackEngine::new(
            catalog,
            MockAudio::default(),
            PlaybackLogger::new(Arc::new(sink.clone())),
            Box::new(move |e| recorded.lock().unwrap().push(e)),
        )
        .with_rng(StdRng::seed_from_u64(7));
        Self {
            engine,
            sink,
            events,
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.engine.state().current_track_id
    }

    pub fn playing(&self) -> bool {
        self.engine.state().is_playing
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Warning(w) => Some(w.clone()),
                _ => None,
            })
            .collect()
    }
}
