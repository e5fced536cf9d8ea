mod action;
mod app;
mod app_state;
mod component;
mod components;
mod core;
mod http;
mod mpv;
mod theme;
mod widgets;

use tokio::sync::{broadcast, mpsc};

/// What PlayerCore broadcasts to the TUI.
#[derive(Debug, Clone)]
pub enum BroadcastMessage {
    /// A new snapshot is in the SnapshotStore.
    StateUpdated,
    /// Non-fatal problem to show as a toast.
    Warning(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = lyrica_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("lyrica.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG overrides; hyper/reqwest connection chatter stays at warn.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("lyrica log: {}", log_path.display());
    tracing::info!("lyrica starting…");

    let config = match lyrica_core::config::Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("config: {}; using defaults", e);
            lyrica_core::config::Config::default()
        }
    };

    // ── PlayerCore → TUI ─────────────────────────────────────────────────────
    let (broadcast_tx, broadcast_rx) = broadcast::channel::<BroadcastMessage>(1024);

    // ── TUI/HTTP/mpv → PlayerCore ────────────────────────────────────────────
    let (event_tx, event_rx) = mpsc::channel::<core::CoreEvent>(1024);

    let player_core =
        core::PlayerCore::new(&config, broadcast_tx.clone(), event_tx.clone()).await?;
    let snapshots = player_core.snapshots();

    if config.http.enabled {
        http::start_server(
            config.http.bind_address.clone(),
            config.http.port,
            snapshots.clone(),
            event_tx.clone(),
        );
    }

    let core_task = tokio::spawn(async move {
        if let Err(e) = player_core.run(event_rx).await {
            tracing::error!("PlayerCore exited with error: {}", e);
        }
    });

    let app = app::App::new(event_tx, snapshots).await;
    app.run(broadcast_rx).await?;

    // App sent Shutdown on quit; let the core stop mpv.
    let _ = core_task.await;

    Ok(())
}
