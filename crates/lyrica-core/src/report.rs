//! Fire-and-forget reporting to the remote collector.
//!
//! Every report is one detached task: sent at most once, never awaited by
//! the caller, failures logged and dropped.  No retry, buffering or
//! backpressure.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CollectorConfig;
use crate::error::PlayerError;

pub const PLAY_ENDPOINT: &str = "/song/play";
pub const LIKE_ENDPOINT: &str = "/song/like";

/// Body of `POST /song/play`.  `song_id` is the 1-based catalog position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    pub song_id: usize,
    pub song_title: String,
}

/// Body of `POST /song/like`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeEvent {
    pub song_title: String,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    Play(PlayEvent),
    Like(LikeEvent),
}

impl Report {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Report::Play(_) => PLAY_ENDPOINT,
            Report::Like(_) => LIKE_ENDPOINT,
        }
    }
}

/// Destination for reports.  `send` must return immediately.
pub trait ReportSink: Send + Sync {
    fn send(&self, report: Report);
}

/// Build the sink described by the config.
pub fn sink_from_config(config: &CollectorConfig) -> std::sync::Arc<dyn ReportSink> {
    if config.enabled {
        std::sync::Arc::new(HttpCollector::new(config.base_url.clone()))
    } else {
        std::sync::Arc::new(DisabledCollector)
    }
}

/// Posts reports as JSON with reqwest on the current tokio runtime.
#[derive(Clone)]
pub struct HttpCollector {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCollector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, report: &Report) -> String {
        format!("{}{}", self.base_url, report.endpoint())
    }
}

impl ReportSink for HttpCollector {
    fn send(&self, report: Report) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                "collector: no async runtime, dropping {} report",
                report.endpoint()
            );
            return;
        };
        let client = self.client.clone();
        let url = self.url_for(&report);
        runtime.spawn(async move {
            match post_report(&client, &url, &report).await {
                Ok(body) => debug!("collector: {} ok: {}", report.endpoint(), body.trim()),
                Err(e) => warn!("{}", e),
            }
        });
    }
}

async fn post_report(
    client: &reqwest::Client,
    url: &str,
    report: &Report,
) -> Result<String, PlayerError> {
    let failed = |reason: String| PlayerError::NetworkReport {
        endpoint: url.to_string(),
        reason,
    };
    let response = client
        .post(url)
        .json(report)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(failed(format!("HTTP {}", status)));
    }
    Ok(body)
}

/// Used when the collector is switched off in config.
pub struct DisabledCollector;

impl ReportSink for DisabledCollector {
    fn send(&self, report: Report) {
        debug!("collector disabled, skipping {:?}", report);
    }
}
