//! Type definitions for concurrent analysis
//!
//! Contains the analyzer configuration and the messages passed between the
//! orchestrator and the workers.

use crate::game::MatchRecord;
use crate::segmenter::LogSegment;

/// Signature of the per-segment parse step run by every worker
pub type SegmentParseFn = fn(&[String], usize) -> MatchRecord;

/// Configuration for concurrent analysis
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub num_workers: usize,
    /// Bound of the work queue. Defaults to twice the worker count.
    pub queue_capacity: Option<usize>,
}

impl AnalyzerConfig {
    pub fn with_workers(num_workers: usize) -> Self {
        Self {
            num_workers,
            ..Self::default()
        }
    }

    pub(crate) fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity
            .unwrap_or(self.num_workers.saturating_mul(2))
            .max(1)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            queue_capacity: None,
        }
    }
}

/// One unit of work: a segment and its game number, always sent together
#[derive(Debug)]
pub(crate) struct WorkItem {
    pub game: usize,
    pub segment: LogSegment,
}

/// What a worker reports back for each work item it took
#[derive(Debug)]
pub(crate) enum WorkOutcome {
    Parsed(MatchRecord),
    Dropped { game: usize },
}
