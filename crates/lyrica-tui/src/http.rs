use crate::core::{CoreEvent, SnapshotStore};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use lyrica_core::protocol::{Command, PlayerSnapshot};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
struct HttpState {
    snapshots: Arc<SnapshotStore>,
    event_tx: mpsc::Sender<CoreEvent>,
}

pub fn router(snapshots: Arc<SnapshotStore>, event_tx: mpsc::Sender<CoreEvent>) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/play/:idx", post(play))
        .route("/api/toggle", post(toggle))
        .route("/api/next", post(next))
        .route("/api/prev", post(prev))
        .route("/api/shuffle", post(shuffle))
        .route("/api/repeat", post(repeat))
        .route("/api/like", post(like))
        .route("/api/seek/:secs", post(seek))
        .route("/api/volume/:pct", post(set_volume))
        .layer(CorsLayer::permissive())
        .with_state(HttpState {
            snapshots,
            event_tx,
        })
}

pub fn start_server(
    bind_address: String,
    port: u16,
    snapshots: Arc<SnapshotStore>,
    event_tx: mpsc::Sender<CoreEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app = router(snapshots, event_tx);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn forward(state: &HttpState, cmd: Command) -> StatusCode {
    info!("HTTP API: {:?}", cmd);
    if state
        .event_tx
        .send(CoreEvent::ClientCommand(cmd))
        .await
        .is_err()
    {
        error!("HTTP API: core event loop is gone");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::OK
}

async fn get_state(State(state): State<HttpState>) -> Json<PlayerSnapshot> {
    Json(state.snapshots.get().await)
}

async fn play(State(state): State<HttpState>, Path(idx): Path<usize>) -> StatusCode {
    if !state
        .snapshots
        .get()
        .await
        .queue
        .iter()
        .any(|e| e.id == idx)
    {
        return StatusCode::NOT_FOUND;
    }
    forward(&state, Command::Select { id: idx }).await
}

async fn toggle(State(state): State<HttpState>) -> StatusCode {
    forward(&state, Command::TogglePause).await
}

async fn next(State(state): State<HttpState>) -> StatusCode {
    forward(&state, Command::Next).await
}

async fn prev(State(state): State<HttpState>) -> StatusCode {
    forward(&state, Command::Previous).await
}

async fn shuffle(State(state): State<HttpState>) -> StatusCode {
    forward(&state, Command::CycleShuffle).await
}

async fn repeat(State(state): State<HttpState>) -> StatusCode {
    forward(&state, Command::CycleRepeat).await
}

async fn like(State(state): State<HttpState>) -> StatusCode {
    forward(&state, Command::ToggleLike).await
}

async fn seek(State(state): State<HttpState>, Path(secs): Path<f64>) -> StatusCode {
    forward(&state, Command::Seek { seconds: secs }).await
}

async fn set_volume(State(state): State<HttpState>, Path(pct): Path<i32>) -> StatusCode {
    let value = (pct as f32 / 100.0).clamp(0.0, 1.0);
    forward(&state, Command::Volume { value }).await
}
