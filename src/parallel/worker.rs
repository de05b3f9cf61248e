//! Worker thread for concurrent analysis
//!
//! Each worker drains the shared queue until it is closed and empty.

use crossbeam_channel::{Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::diagnostics::{Diagnostics, WorkerEvent};

use super::types::{SegmentParseFn, WorkItem, WorkOutcome};

/// Worker thread: parses segments until the work queue is closed.
/// Returns the number of work items it took.
pub(crate) fn worker_thread(
    worker_id: usize,
    work_receiver: Receiver<WorkItem>,
    result_sender: Sender<WorkOutcome>,
    parse: SegmentParseFn,
    diagnostics: &dyn Diagnostics,
) -> usize {
    diagnostics.worker_event(worker_id, WorkerEvent::Started);

    let mut processed = 0usize;
    for item in work_receiver.iter() {
        let outcome = parse_item(item, parse, diagnostics);
        processed += 1;
        if result_sender.send(outcome).is_err() {
            // Orchestrator stopped listening
            break;
        }
    }

    diagnostics.worker_event(worker_id, WorkerEvent::Finished { processed });
    processed
}

/// Run the parse step for one item, turning a fault into a dropped segment
fn parse_item(item: WorkItem, parse: SegmentParseFn, diagnostics: &dyn Diagnostics) -> WorkOutcome {
    let WorkItem { game, segment } = item;

    match panic::catch_unwind(AssertUnwindSafe(|| parse(segment.lines(), game))) {
        Ok(record) if record.game == game => WorkOutcome::Parsed(record),
        Ok(record) => {
            let reason = format!("parser returned a record for game {}", record.game);
            diagnostics.segment_dropped(game, segment.start_line(), &reason);
            WorkOutcome::Dropped { game }
        }
        Err(payload) => {
            let reason = format!("parser panicked: {}", panic_message(payload.as_ref()));
            diagnostics.segment_dropped(game, segment.start_line(), &reason);
            WorkOutcome::Dropped { game }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
