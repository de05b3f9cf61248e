// Core library for the quakelog match reporter
//
// Pipeline: a log stream is split into per-match segments (`segment`), the
// segments are parsed on a worker pool (`analyze`), and the records come back
// in game order as a `ResultSet`.

pub mod diagnostics;
pub mod error;
pub mod game;
pub mod input;
pub mod parallel;
pub mod parser;
pub mod report;
pub mod segmenter;

use std::io::BufRead;

pub use diagnostics::{CollectingDiagnostics, Diagnostics, NullDiagnostics, TracingDiagnostics};
pub use error::{AnalyzeError, InputError, PipelineError, SegmentError};
pub use game::{MatchRecord, PlayerStats, ResultSet};
pub use parallel::{AnalyzerConfig, MatchAnalyzer, SegmentParseFn};
pub use parser::parse_segment;
pub use segmenter::{segment, LogSegment};

/// Parse `segments` on `worker_count` threads and return the records in game order.
///
/// Each segment's game number is its 1-based position in `segments`.
pub fn analyze(
    segments: Vec<LogSegment>,
    worker_count: usize,
    diagnostics: &dyn Diagnostics,
) -> Result<ResultSet, AnalyzeError> {
    MatchAnalyzer::new(AnalyzerConfig::with_workers(worker_count)).analyze(segments, diagnostics)
}

/// Segment and analyze a whole log stream.
///
/// The worker count is validated before the stream is read.
pub fn analyze_reader<R: BufRead>(
    reader: R,
    worker_count: usize,
    diagnostics: &dyn Diagnostics,
) -> Result<ResultSet, PipelineError> {
    if worker_count == 0 {
        return Err(AnalyzeError::InvalidWorkerCount(worker_count).into());
    }
    let segments = segment(reader)?;
    tracing::debug!(segments = segments.len(), "log segmented");
    Ok(analyze(segments, worker_count, diagnostics)?)
}
