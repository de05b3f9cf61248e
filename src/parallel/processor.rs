//! Main concurrent analyzer
//!
//! Contains the MatchAnalyzer struct that orchestrates the worker pool.

use crossbeam_channel::{bounded, unbounded};
use std::thread;

use crate::diagnostics::Diagnostics;
use crate::error::AnalyzeError;
use crate::game::ResultSet;
use crate::parser::parse_segment;
use crate::segmenter::LogSegment;

use super::sink::{collect_results, SinkSummary};
use super::types::{AnalyzerConfig, SegmentParseFn, WorkItem};
use super::worker::worker_thread;

/// Parses match segments on a fixed pool of worker threads
#[derive(Debug, Clone)]
pub struct MatchAnalyzer {
    config: AnalyzerConfig,
    parse: SegmentParseFn,
}

impl MatchAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            parse: parse_segment::<String>,
        }
    }

    /// Replace the per-segment parse step
    pub fn with_parser(mut self, parse: SegmentParseFn) -> Self {
        self.parse = parse;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Parse every segment and return the records in game order.
    ///
    /// Game numbers are the 1-based positions in `segments`, fixed before
    /// anything is dispatched. Segments whose parse faults are reported to
    /// `diagnostics` and left out of the result.
    pub fn analyze(
        &self,
        segments: Vec<LogSegment>,
        diagnostics: &dyn Diagnostics,
    ) -> Result<ResultSet, AnalyzeError> {
        let num_workers = self.config.num_workers;
        if num_workers == 0 {
            return Err(AnalyzeError::InvalidWorkerCount(num_workers));
        }

        let total = segments.len();
        let (work_sender, work_receiver) = bounded::<WorkItem>(self.config.effective_queue_capacity());
        let (result_sender, result_receiver) = unbounded();
        let parse = self.parse;

        // Channel ends are moved in so they are dropped when this closure
        // returns, even on an early error; otherwise idle workers would keep
        // the scope from ever finishing.
        let summary = thread::scope(move |scope| -> Result<SinkSummary, AnalyzeError> {
            let mut worker_handles = Vec::with_capacity(num_workers);
            for worker_id in 0..num_workers {
                let work_receiver = work_receiver.clone();
                let result_sender = result_sender.clone();

                let handle = thread::Builder::new()
                    .name(format!("quakelog-worker-{}", worker_id))
                    .spawn_scoped(scope, move || {
                        worker_thread(worker_id, work_receiver, result_sender, parse, diagnostics)
                    })
                    .map_err(|source| AnalyzeError::WorkerSpawn { worker_id, source })?;
                worker_handles.push(handle);
            }

            // Drop our copies so the channels close once the workers are done
            drop(work_receiver);
            drop(result_sender);

            for (index, segment) in segments.into_iter().enumerate() {
                let item = WorkItem {
                    game: index + 1,
                    segment,
                };
                if work_sender.send(item).is_err() {
                    // Every worker is gone; the joins below report why
                    break;
                }
            }
            drop(work_sender);

            let summary = collect_results(result_receiver);

            let mut failed_worker = None;
            for (worker_id, handle) in worker_handles.into_iter().enumerate() {
                if handle.join().is_err() && failed_worker.is_none() {
                    failed_worker = Some(worker_id);
                }
            }
            if let Some(worker_id) = failed_worker {
                return Err(AnalyzeError::WorkerPanicked { worker_id });
            }

            Ok(summary)
        })?;

        debug_assert_eq!(summary.accounted(), total);
        diagnostics.analysis_finished(total, summary.records.len());

        Ok(ResultSet::from_unordered(summary.records))
    }
}

impl Default for MatchAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
