//! Reporting channel for events the analyzer handles without failing
//!
//! The analyzer never logs through a global; callers hand it a
//! [`Diagnostics`] implementation instead.

use std::sync::Mutex;

/// Receiver of analyzer events. Called concurrently from worker threads.
pub trait Diagnostics: Send + Sync {
    /// A segment was dropped from the result set
    fn segment_dropped(&self, game: usize, start_line: usize, reason: &str);

    /// A worker thread started or stopped
    fn worker_event(&self, _worker_id: usize, _event: WorkerEvent) {}

    /// The analyzer finished with the given number of records
    fn analysis_finished(&self, _segments: usize, _records: usize) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerEvent {
    Started,
    Finished { processed: usize },
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn segment_dropped(&self, game: usize, start_line: usize, reason: &str) {
        tracing::warn!(game, start_line, reason, "dropping match segment");
    }

    fn worker_event(&self, worker_id: usize, event: WorkerEvent) {
        match event {
            WorkerEvent::Started => tracing::debug!(worker_id, "worker started"),
            WorkerEvent::Finished { processed } => {
                tracing::debug!(worker_id, processed, "worker finished")
            }
        }
    }

    fn analysis_finished(&self, segments: usize, records: usize) {
        tracing::info!(segments, records, "analysis finished");
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn segment_dropped(&self, _game: usize, _start_line: usize, _reason: &str) {}
}

/// A segment drop captured by [`CollectingDiagnostics`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedSegment {
    pub game: usize,
    pub start_line: usize,
    pub reason: String,
}

/// Keeps dropped segments and worker events in memory
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    dropped: Mutex<Vec<DroppedSegment>>,
    worker_events: Mutex<Vec<(usize, WorkerEvent)>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dropped segments, ordered by game
    pub fn dropped(&self) -> Vec<DroppedSegment> {
        let mut dropped = self
            .dropped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        dropped.sort_by_key(|d| d.game);
        dropped
    }

    pub fn worker_events(&self) -> Vec<(usize, WorkerEvent)> {
        self.worker_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn segment_dropped(&self, game: usize, start_line: usize, reason: &str) {
        self.dropped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(DroppedSegment {
                game,
                start_line,
                reason: reason.to_string(),
            });
    }

    fn worker_event(&self, worker_id: usize, event: WorkerEvent) {
        self.worker_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((worker_id, event));
    }
}
