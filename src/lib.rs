//! compacting_queue - FIFO queue with lazy prefix compaction behind a per-instance lock
//!
//! Dequeue empties the head slot in place; storage is shifted only once the
//! empty prefix passes a configurable share of it, keeping dequeue amortized O(1).
#![warn(missing_docs)]

mod buffer;
mod config;
mod queue;
mod sync;

pub use buffer::{CompactionStats, SlotBuffer};
pub use config::{
    ConfigError, QueueConfig, DEFAULT_EMPTY_FRACTION_THRESHOLD, DEFAULT_SMALL_QUEUE_THRESHOLD,
};
pub use queue::CompactingQueue;
