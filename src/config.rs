//! Compaction tuning.

use thiserror::Error;

/// Queues with at most this many physical slots are never compacted.
pub const DEFAULT_SMALL_QUEUE_THRESHOLD: usize = 32;

/// Share of physical slots that must be empty before compaction runs.
pub const DEFAULT_EMPTY_FRACTION_THRESHOLD: f64 = 0.6;

/// Rejected configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// The empty-fraction threshold must be finite and strictly inside `(0, 1)`.
    #[error("empty fraction threshold must be in (0, 1), got {0}")]
    EmptyFractionOutOfRange(f64),
}

/// Parameters of the lazy compaction policy.
///
/// After each successful dequeue the queue compacts its storage if it holds
/// more than `small_queue_threshold` slots and more than
/// `empty_fraction_threshold` of them are already empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueConfig {
    small_queue_threshold: usize,
    empty_fraction_threshold: f64,
}

impl QueueConfig {
    /// Validated configuration.
    pub fn new(
        small_queue_threshold: usize,
        empty_fraction_threshold: f64,
    ) -> Result<Self, ConfigError> {
        validate_fraction(empty_fraction_threshold)?;
        Ok(QueueConfig {
            small_queue_threshold,
            empty_fraction_threshold,
        })
    }

    /// Replaces the small-queue threshold. Any value is accepted; `0` makes
    /// every non-empty storage eligible for compaction.
    pub fn with_small_queue_threshold(mut self, threshold: usize) -> Self {
        self.small_queue_threshold = threshold;
        self
    }

    /// Replaces the empty-fraction threshold.
    pub fn with_empty_fraction_threshold(mut self, fraction: f64) -> Result<Self, ConfigError> {
        validate_fraction(fraction)?;
        self.empty_fraction_threshold = fraction;
        Ok(self)
    }

    /// Slot count at or below which compaction is skipped.
    pub fn small_queue_threshold(&self) -> usize {
        self.small_queue_threshold
    }

    /// Empty share of storage that must be exceeded to compact.
    pub fn empty_fraction_threshold(&self) -> f64 {
        self.empty_fraction_threshold
    }

    /// Whether a storage of `slots` physical slots with `head` empty leading
    /// slots should be compacted.
    #[inline]
    pub(crate) fn should_compact(&self, head: usize, slots: usize) -> bool {
        if slots <= self.small_queue_threshold {
            return false;
        }
        (head as f64 / slots as f64) > self.empty_fraction_threshold
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            small_queue_threshold: DEFAULT_SMALL_QUEUE_THRESHOLD,
            empty_fraction_threshold: DEFAULT_EMPTY_FRACTION_THRESHOLD,
        }
    }
}

fn validate_fraction(fraction: f64) -> Result<(), ConfigError> {
    // 0 would compact on every dequeue, 1 would never compact at all.
    if fraction.is_finite() && fraction > 0.0 && fraction < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::EmptyFractionOutOfRange(fraction))
    }
}
