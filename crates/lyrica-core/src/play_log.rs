use std::sync::Arc;

use tracing::debug;

use crate::report::{PlayEvent, Report, ReportSink};

/// Reports successful track starts to the collector.
#[derive(Clone)]
pub struct PlaybackLogger {
    sink: Arc<dyn ReportSink>,
}

impl PlaybackLogger {
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self { sink }
    }

    /// `id` is the 0-based catalog id; the collector expects 1-based.
    pub fn record(&self, id: usize, title: &str) {
        debug!("play-log: #{} {}", id + 1, title);
        self.sink.send(Report::Play(PlayEvent {
            song_id: id + 1,
            song_title: title.to_string(),
        }));
    }
}
