//! Concurrent match analysis
//!
//! Parses match segments on a fixed pool of worker threads and reassembles
//! the records in game order, whatever order the workers finish in.
//!
//! # Module Structure
//!
//! - `types`: Configuration and the messages exchanged with workers
//! - `worker`: Worker thread that parses segments off the shared queue
//! - `sink`: Result collection on the orchestrating thread
//! - `processor`: Main MatchAnalyzer orchestration

mod processor;
mod sink;
mod types;
mod worker;

// Re-export public types
pub use processor::MatchAnalyzer;
pub use types::{AnalyzerConfig, SegmentParseFn};
