use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// Progress events emitted by a single pipeline run. Components report through this
/// instead of logging on their own.
pub trait RunObserver: Sync {
    fn run_started(&self) {}
    fn lookup_loading(&self, _path: &Path) {}
    fn lookup_loaded(&self, _path: &Path, _keys: usize, _tags: usize, _elapsed: Duration) {}
    fn tagger_configured(&self, _workers: usize) {}
    fn chunk_processed(&self, _chunk: usize, _lines: usize, _records: usize, _skipped: usize) {}
    fn logs_processed(&self, _records: usize, _skipped: usize, _chunks: usize) {}
    fn report_written(&self, _path: &Path, _rows: usize, _elapsed: Duration) {}
    fn run_completed(&self, _elapsed: Duration) {}
}

/// Forwards run events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn run_started(&self) {
        info!(action = "start", component = "pipeline", "Starting flow log tagging");
    }

    fn lookup_loading(&self, path: &Path) {
        info!(action = "start", component = "lookup_table", file_path = ?path, "Loading lookup table");
    }

    fn lookup_loaded(&self, path: &Path, keys: usize, tags: usize, elapsed: Duration) {
        info!(
            action = "loaded",
            component = "lookup_table",
            file_path = ?path,
            key_count = keys,
            tag_count = tags,
            duration_ms = elapsed.as_millis(),
            "Lookup table loaded"
        );
    }

    fn tagger_configured(&self, workers: usize) {
        info!(action = "configure", component = "tagger", worker_count = workers, "Using workers for tagging");
    }

    fn chunk_processed(&self, chunk: usize, lines: usize, records: usize, skipped: usize) {
        debug!(
            action = "chunk",
            component = "pipeline",
            chunk,
            line_count = lines,
            record_count = records,
            skipped_count = skipped,
            "Chunk tagged"
        );
    }

    fn logs_processed(&self, records: usize, skipped: usize, chunks: usize) {
        info!(
            action = "complete",
            component = "log_reader",
            record_count = records,
            skipped_count = skipped,
            chunk_count = chunks,
            "Flow logs processed"
        );
    }

    fn report_written(&self, path: &Path, rows: usize, elapsed: Duration) {
        info!(
            action = "complete",
            component = "report_writer",
            file_path = ?path,
            row_count = rows,
            duration_ms = elapsed.as_millis(),
            "Report written"
        );
    }

    fn run_completed(&self, elapsed: Duration) {
        info!(
            action = "complete",
            component = "pipeline",
            duration_ms = elapsed.as_millis(),
            "Flow log tagging completed"
        );
    }
}

/// Durations are left out so recorded runs compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    RunStarted,
    LookupLoading,
    LookupLoaded { keys: usize, tags: usize },
    TaggerConfigured { workers: usize },
    ChunkProcessed { chunk: usize, lines: usize, records: usize, skipped: usize },
    LogsProcessed { records: usize, skipped: usize, chunks: usize },
    ReportWritten { rows: usize },
    RunCompleted,
}

/// Keeps every event in memory; lets callers inspect a run after the fact.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl RunObserver for RecordingObserver {
    fn run_started(&self) {
        self.push(RunEvent::RunStarted);
    }

    fn lookup_loading(&self, _path: &Path) {
        self.push(RunEvent::LookupLoading);
    }

    fn lookup_loaded(&self, _path: &Path, keys: usize, tags: usize, _elapsed: Duration) {
        self.push(RunEvent::LookupLoaded { keys, tags });
    }

    fn tagger_configured(&self, workers: usize) {
        self.push(RunEvent::TaggerConfigured { workers });
    }

    fn chunk_processed(&self, chunk: usize, lines: usize, records: usize, skipped: usize) {
        self.push(RunEvent::ChunkProcessed {
            chunk,
            lines,
            records,
            skipped,
        });
    }

    fn logs_processed(&self, records: usize, skipped: usize, chunks: usize) {
        self.push(RunEvent::LogsProcessed {
            records,
            skipped,
            chunks,
        });
    }

    fn report_written(&self, _path: &Path, rows: usize, _elapsed: Duration) {
        self.push(RunEvent::ReportWritten { rows });
    }

    fn run_completed(&self, _elapsed: Duration) {
        self.push(RunEvent::RunCompleted);
    }
}
