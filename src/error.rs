//! Error types for the segmentation and analysis pipeline

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while splitting a log stream into per-match segments
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("failed to read log at line {line}: {source}")]
    Io {
        /// 1-based line number of the read that failed
        line: usize,
        #[source]
        source: io::Error,
    },
}

/// Non-recoverable failure of the concurrent analyzer
///
/// Faults confined to a single segment are not represented here; they are
/// reported through [`crate::Diagnostics`] and the segment is dropped.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("failed to spawn worker thread {worker_id}: {source}")]
    WorkerSpawn {
        worker_id: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker thread {worker_id} terminated abnormally")]
    WorkerPanicked { worker_id: usize },
}

/// Error from the full stream-to-records pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Segment(#[from] SegmentError),
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

/// Rejection of an input file before any parsing happens
#[derive(Debug, Error)]
pub enum InputError {
    #[error("{} does not look like a server log (expected a .log file)", path.display())]
    NotALogFile { path: PathBuf },

    #[error("{} does not contain plain text", path.display())]
    NotText { path: PathBuf },

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
