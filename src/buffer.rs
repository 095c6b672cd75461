//! Single-owner slot storage with lazy prefix compaction.
//!
//! Dequeued slots are emptied in place and `head` moves past them. The
//! storage is only shifted once the empty prefix outweighs the live part,
//! so every element is moved a bounded number of times across its life
//! and dequeue stays amortized O(1).

use core::fmt;

use crate::config::QueueConfig;

/// Running totals of compaction work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Number of compaction passes, automatic or forced.
    pub compactions: u64,
    /// Empty slots physically released.
    pub slots_reclaimed: u64,
    /// Live elements shifted towards the front of storage.
    pub elements_moved: u64,
}

/// FIFO storage of optional slots. Not synchronized; see
/// [`CompactingQueue`](crate::CompactingQueue) for the shared version.
pub struct SlotBuffer<T> {
    storage: Vec<Option<T>>,
    head: usize,
    config: QueueConfig,
    stats: CompactionStats,
}

impl<T> SlotBuffer<T> {
    /// Empty buffer with the default compaction policy.
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Empty buffer with a custom compaction policy.
    pub fn with_config(config: QueueConfig) -> Self {
        SlotBuffer {
            storage: Vec::new(),
            head: 0,
            config,
            stats: CompactionStats::default(),
        }
    }

    /// Append at the tail.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.storage.push(Some(value));
    }

    /// Append every item in order, returning how many were appended.
    pub fn push_batch<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        let before = self.storage.len();
        self.storage.extend(items.into_iter().map(Some));
        self.storage.len() - before
    }

    /// Remove the head element, then compact if the policy says so.
    ///
    /// Returns `None` and leaves the buffer untouched when there is no
    /// element at `head`.
    pub fn pop_front(&mut self) -> Option<T> {
        let value = self.storage.get_mut(self.head)?.take()?;
        self.head += 1;
        self.resize_if_needed();
        Some(value)
    }

    /// Remove up to `max` head elements. The compaction check runs once,
    /// after the last removal.
    pub fn pop_front_batch(&mut self, max: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(max.min(self.len()));
        while out.len() < max {
            let Some(value) = self.storage.get_mut(self.head).and_then(Option::take) else {
                break;
            };
            self.head += 1;
            out.push(value);
        }
        if !out.is_empty() {
            self.resize_if_needed();
        }
        out
    }

    /// Oldest live element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.storage.get(self.head).and_then(Option::as_ref)
    }

    /// Newest live element. Empty slots only ever form a prefix, so the last
    /// slot is occupied whenever any element is live.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.storage.last().and_then(Option::as_ref)
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len() - self.head
    }

    /// True when no live element remains.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical slot count, empty prefix included.
    #[inline]
    pub fn slots(&self) -> usize {
        self.storage.len()
    }

    /// Index of the first live slot.
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Compaction policy in effect.
    pub fn config(&self) -> QueueConfig {
        self.config
    }

    /// Compaction totals so far.
    pub fn stats(&self) -> CompactionStats {
        self.stats
    }

    /// Drop the empty prefix regardless of thresholds. Returns the number of
    /// slots reclaimed.
    pub fn compact(&mut self) -> usize {
        let reclaimed = self.drop_empty_prefix();
        if reclaimed > 0 {
            log::debug!(
                "forced compaction reclaimed {} slots, {} live",
                reclaimed,
                self.storage.len()
            );
        }
        reclaimed
    }

    /// Drop every element and reset `head`. Not counted as compaction.
    pub fn clear(&mut self) {
        let dropped = self.len();
        self.storage.clear();
        self.head = 0;
        log::debug!("cleared {} elements", dropped);
    }

    /// Live elements, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.storage[self.head..].iter().flatten()
    }

    /// Consume the buffer, yielding live elements oldest first.
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_iter().skip(self.head).flatten().collect()
    }

    fn resize_if_needed(&mut self) {
        if !self.config.should_compact(self.head, self.storage.len()) {
            return;
        }
        let slots = self.storage.len();
        let reclaimed = self.drop_empty_prefix();
        log::trace!(
            "compacted {} of {} slots, {} live moved",
            reclaimed,
            slots,
            self.storage.len()
        );
    }

    fn drop_empty_prefix(&mut self) -> usize {
        let reclaimed = self.head;
        if reclaimed == 0 {
            return 0;
        }
        self.storage.drain(..reclaimed);
        self.head = 0;
        self.stats.compactions += 1;
        self.stats.slots_reclaimed += reclaimed as u64;
        self.stats.elements_moved += self.storage.len() as u64;
        reclaimed
    }
}

impl<T> Default for SlotBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the live elements into compact storage; stats start at zero.
impl<T: Clone> Clone for SlotBuffer<T> {
    fn clone(&self) -> Self {
        SlotBuffer {
            storage: self.iter().cloned().map(Some).collect(),
            head: 0,
            config: self.config,
            stats: CompactionStats::default(),
        }
    }
}

/// Compares live elements only. The empty prefix, config and stats are
/// ignored, so compaction never changes equality.
impl<T: PartialEq> PartialEq for SlotBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SlotBuffer<T> {}

impl<T: fmt::Debug> fmt::Debug for SlotBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for SlotBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = SlotBuffer::new();
        buf.push_batch(iter);
        buf
    }
}

impl<T> Extend<T> for SlotBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_batch(iter);
    }
}
