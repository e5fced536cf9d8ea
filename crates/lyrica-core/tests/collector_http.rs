use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::Uri;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use lyrica_core::config::CollectorConfig;
use lyrica_core::play_log::PlaybackLogger;
use lyrica_core::report::{sink_from_config, HttpCollector, LikeEvent, Report, ReportSink};

type Captured = mpsc::UnboundedSender<(String, Value)>;

async fn capture(State(tx): State<Captured>, uri: Uri, Json(body): Json<Value>) -> &'static str {
    let _ = tx.send((uri.path().to_string(), body));
    "ok"
}

/// Stub collector on an ephemeral port.  Returns its base URL and the
/// stream of received `(path, body)` pairs.
async fn stub_collector() -> (String, mpsc::UnboundedReceiver<(String, Value)>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/song/play", post(capture))
        .route("/song/like", post(capture))
        .with_state(tx);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), rx)
}

async fn next_post(rx: &mut mpsc::UnboundedReceiver<(String, Value)>) -> (String, Value) {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("collector never received a report")
        .expect("stub collector closed")
}

#[tokio::test]
async fn play_is_posted_with_one_based_id() {
    let (base, mut rx) = stub_collector().await;
    let logger = PlaybackLogger::new(Arc::new(HttpCollector::new(base)));

    logger.record(0, "Disfigure");

    let (path, body) = next_post(&mut rx).await;
    assert_eq!(path, "/song/play");
    assert_eq!(body, json!({ "song_id": 1, "song_title": "Disfigure" }));
}

#[tokio::test]
async fn like_is_posted_to_like_endpoint() {
    let (base, mut rx) = stub_collector().await;
    let collector = HttpCollector::new(format!("{}/", base));

    collector.send(Report::Like(LikeEvent {
        song_title: "Fade".to_string(),
        liked: true,
    }));

    let (path, body) = next_post(&mut rx).await;
    assert_eq!(path, "/song/like");
    assert_eq!(body, json!({ "song_title": "Fade", "liked": true }));
}

#[tokio::test]
async fn enabled_config_builds_http_sink() {
    let (base, mut rx) = stub_collector().await;
    let sink = sink_from_config(&CollectorConfig {
        enabled: true,
        base_url: base,
    });

    sink.send(Report::Like(LikeEvent {
        song_title: "Fearless".to_string(),
        liked: false,
    }));
    let (path, _) = next_post(&mut rx).await;
    assert_eq!(path, "/song/like");
}

#[tokio::test]
async fn disabled_config_sends_nothing() {
    let (base, mut rx) = stub_collector().await;
    let sink = sink_from_config(&CollectorConfig {
        enabled: false,
        base_url: base,
    });

    sink.send(Report::Like(LikeEvent {
        song_title: "Fearless".to_string(),
        liked: true,
    }));
    let got = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(got.is_err(), "disabled collector posted {:?}", got);
}

#[tokio::test]
async fn unreachable_collector_is_not_fatal() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let logger = PlaybackLogger::new(Arc::new(HttpCollector::new(format!("http://{}", addr))));
    logger.record(3, "Sky High");
    logger.record(4, "Spektrem");
    tokio::time::sleep(Duration::from_millis(200)).await;
}
