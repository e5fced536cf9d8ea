//! PlayerCore: single-owner event loop for all mutable player state.
//!
//! Runs embedded in the TUI process.  The TUI, the HTTP API and the mpv
//! reader all send `CoreEvent`s here; PlayerCore owns the `Player` (engine
//! plus like store) exclusively and handles one event to completion before
//! reading the next.
//!
//! After each event PlayerCore refreshes the `SnapshotStore` and broadcasts
//! `BroadcastMessage::StateUpdated`.  Engine warnings are broadcast as
//! `BroadcastMessage::Warning` straight from the notification callback.
use std::sync::Arc;

use lyrica_core::audio::AudioEvent;
use lyrica_core::catalog::load_catalog;
use lyrica_core::config::Config;
use lyrica_core::engine::{EngineEvent, PlaybackEngine};
use lyrica_core::likes::LikeStore;
use lyrica_core::play_log::PlaybackLogger;
use lyrica_core::player::{Player, Touched};
use lyrica_core::protocol::{Command, PlayerSnapshot};
use lyrica_core::report::sink_from_config;
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::mpv::{MpvAudio, MpvEvent};
use crate::BroadcastMessage;

/// All inputs into the PlayerCore loop.
#[derive(Debug)]
pub enum CoreEvent {
    /// From the TUI or the HTTP API.
    ClientCommand(Command),
    /// Raw mpv unsolicited event (forwarded from the reader task).
    MpvEvent(MpvEvent),
    /// Heartbeat: check mpv liveness.
    HeartbeatTick,
    Shutdown,
}

/// Latest published snapshot, readable from any task.
pub struct SnapshotStore {
    inner: RwLock<PlayerSnapshot>,
}

impl SnapshotStore {
    pub fn new(initial: PlayerSnapshot) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    pub async fn get(&self) -> PlayerSnapshot {
        self.inner.read().await.clone()
    }

    async fn set(&self, snapshot: PlayerSnapshot) {
        *self.inner.write().await = snapshot;
    }
}

pub struct PlayerCore {
    player: Player<MpvAudio>,
    snapshots: Arc<SnapshotStore>,
    broadcast_tx: broadcast::Sender<BroadcastMessage>,
    /// Our own inbox, for the heartbeat task.
    event_tx: mpsc::Sender<CoreEvent>,
}

impl PlayerCore {
    pub async fn new(
        config: &Config,
        broadcast_tx: broadcast::Sender<BroadcastMessage>,
        event_tx: mpsc::Sender<CoreEvent>,
    ) -> anyhow::Result<Self> {
        let catalog = Arc::new(load_catalog(&config.catalog));
        let sink = sink_from_config(&config.collector);

        // One forwarder for the lifetime of the core; MpvAudio hands a clone
        // of `mpv_tx` to every connection it opens.
        let (mpv_tx, mut mpv_rx) = mpsc::channel::<MpvEvent>(64);
        let core_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(evt) = mpv_rx.recv().await {
                if core_tx.send(CoreEvent::MpvEvent(evt)).await.is_err() {
                    break;
                }
            }
        });
        let audio = MpvAudio::new(config.mpv.default_volume, mpv_tx);

        let warn_tx = broadcast_tx.clone();
        let notify = Box::new(move |event: EngineEvent| {
            if let EngineEvent::Warning(message) = event {
                let _ = warn_tx.send(BroadcastMessage::Warning(message));
            }
        });

        let mut engine = PlaybackEngine::new(
            catalog.clone(),
            audio,
            PlaybackLogger::new(sink.clone()),
            notify,
        );
        engine.set_volume(config.mpv.default_volume).await;

        let likes = LikeStore::open(config.paths.likes_file.clone(), catalog, sink);
        let player = Player::new(engine, likes);
        let snapshots = Arc::new(SnapshotStore::new(player.snapshot()));

        Ok(Self {
            player,
            snapshots,
            broadcast_tx,
            event_tx,
        })
    }

    pub fn snapshots(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.snapshots)
    }

    /// Run until `Shutdown` arrives or every sender is gone (TUI exited).
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<CoreEvent>) -> anyhow::Result<()> {
        info!("PlayerCore: starting event loop");

        let heartbeat_tx = self.event_tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                if heartbeat_tx.send(CoreEvent::HeartbeatTick).await.is_err() {
                    break;
                }
            }
        });

        while let Some(evt) = event_rx.recv().await {
            match evt {
                CoreEvent::Shutdown => {
                    info!("PlayerCore: shutdown requested");
                    break;
                }
                CoreEvent::ClientCommand(cmd) => {
                    info!("PlayerCore: command {:?}", cmd);
                    self.dispatch(cmd).await;
                }
                CoreEvent::MpvEvent(evt) => {
                    if let Some(event) = evt.to_audio_event() {
                        self.dispatch(Command::Audio { event }).await;
                    }
                }
                CoreEvent::HeartbeatTick => self.heartbeat().await,
            }
        }

        info!("PlayerCore: stopping mpv");
        self.player.engine.audio_mut().shutdown().await;
        Ok(())
    }

    async fn dispatch(&mut self, cmd: Command) {
        let touched = self.player.dispatch(cmd).await;
        if touched == Touched::Likes {
            debug!("PlayerCore: liked set now {:?}", self.player.likes.liked_ids());
        }
        self.publish().await;
    }

    async fn heartbeat(&mut self) {
        let playing = self.player.engine.state().is_playing;
        if playing && !self.player.engine.audio_mut().check_alive() {
            warn!("PlayerCore: heartbeat: mpv died while playing");
            self.dispatch(Command::Audio {
                event: AudioEvent::Error {
                    message: "mpv exited".to_string(),
                },
            })
            .await;
        }
    }

    async fn publish(&self) {
        self.snapshots.set(self.player.snapshot()).await;
        let _ = self.broadcast_tx.send(BroadcastMessage::StateUpdated);
    }
}
