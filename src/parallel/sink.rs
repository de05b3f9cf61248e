//! Result collection for concurrent analysis
//!
//! Outcomes arrive in completion order; nothing here relies on that order.

use crossbeam_channel::Receiver;

use crate::game::MatchRecord;

use super::types::WorkOutcome;

/// Everything the workers reported, in arrival order
#[derive(Debug, Default)]
pub(crate) struct SinkSummary {
    pub records: Vec<MatchRecord>,
    pub dropped: Vec<usize>,
}

impl SinkSummary {
    /// Work items accounted for, parsed or dropped
    pub fn accounted(&self) -> usize {
        self.records.len() + self.dropped.len()
    }
}

/// Collect outcomes until every worker has hung up its sender
pub(crate) fn collect_results(result_receiver: Receiver<WorkOutcome>) -> SinkSummary {
    let mut summary = SinkSummary::default();

    for outcome in result_receiver.iter() {
        match outcome {
            WorkOutcome::Parsed(record) => summary.records.push(record),
            WorkOutcome::Dropped { game } => summary.dropped.push(game),
        }
    }

    summary
}
