//! Shared FIFO queue: a [`SlotBuffer`] behind one per-instance `RwLock`.

use core::fmt;

use crate::buffer::{CompactionStats, SlotBuffer};
use crate::config::QueueConfig;
use crate::sync::{self, RwLock};

/// Thread-safe FIFO queue with lazy compaction.
///
/// Mutations (`enqueue`, `dequeue`, batches, `compact`, `clear`) hold the
/// write lock for their whole duration, compaction included. Reads
/// (`front`, `tail`, `len`, ...) share the read lock. Nothing blocks waiting
/// for elements: an empty queue answers `None` straight away.
///
/// ```
/// use compacting_queue::CompactingQueue;
///
/// let queue: CompactingQueue<i32> = [1, 2, 3].into_iter().collect();
/// assert_eq!(queue.dequeue(), Some(1));
/// queue.enqueue(4);
/// assert_eq!(queue.front(), Some(2));
/// assert_eq!(queue.tail(), Some(4));
/// ```
pub struct CompactingQueue<T> {
    inner: RwLock<SlotBuffer<T>>,
}

impl<T> CompactingQueue<T> {
    /// Empty queue with the default compaction policy (32 slots, 0.6).
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Empty queue with a custom compaction policy.
    pub fn with_config(config: QueueConfig) -> Self {
        Self::from_buffer(SlotBuffer::with_config(config))
    }

    fn from_buffer(buffer: SlotBuffer<T>) -> Self {
        CompactingQueue {
            inner: RwLock::new(buffer),
        }
    }

    /// Append at the tail without handing the element back.
    pub fn push(&self, element: T) {
        sync::write(&self.inner).push(element);
    }

    /// Append at the tail and return a copy of what was inserted.
    pub fn enqueue(&self, element: T) -> T
    where
        T: Clone,
    {
        self.push(element.clone());
        element
    }

    /// Append all items in order under a single lock acquisition.
    /// Returns the number appended.
    pub fn enqueue_batch<I: IntoIterator<Item = T>>(&self, items: I) -> usize {
        sync::write(&self.inner).push_batch(items)
    }

    /// Remove the head element. `None` when the queue is empty.
    pub fn dequeue(&self) -> Option<T> {
        sync::write(&self.inner).pop_front()
    }

    /// Remove up to `max` elements from the head, oldest first.
    pub fn dequeue_batch(&self, max: usize) -> Vec<T> {
        if max == 0 {
            return Vec::new();
        }
        sync::write(&self.inner).pop_front_batch(max)
    }

    /// Copy of the head element.
    pub fn front(&self) -> Option<T>
    where
        T: Clone,
    {
        sync::read(&self.inner).front().cloned()
    }

    /// Copy of the most recently enqueued element still present.
    pub fn tail(&self) -> Option<T>
    where
        T: Clone,
    {
        sync::read(&self.inner).back().cloned()
    }

    /// Run `f` on the head element while holding the read lock.
    ///
    /// `f` must not call back into this queue: a write from inside it
    /// deadlocks, and a nested read can stall behind a waiting writer.
    pub fn peek_front<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        sync::read(&self.inner).front().map(f)
    }

    /// Run `f` on the tail element while holding the read lock. The same
    /// restriction as [`peek_front`](Self::peek_front) applies to `f`.
    pub fn peek_tail<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        sync::read(&self.inner).back().map(f)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        sync::read(&self.inner).len()
    }

    /// True when no live element remains.
    pub fn is_empty(&self) -> bool {
        sync::read(&self.inner).is_empty()
    }

    /// Physical slot count, including dequeued slots awaiting compaction.
    pub fn slots(&self) -> usize {
        sync::read(&self.inner).slots()
    }

    /// Compact now, ignoring the thresholds. Returns slots reclaimed.
    pub fn compact(&self) -> usize {
        sync::write(&self.inner).compact()
    }

    /// Drop every element.
    pub fn clear(&self) {
        sync::write(&self.inner).clear();
    }

    /// Compaction policy this queue was built with.
    pub fn config(&self) -> QueueConfig {
        sync::read(&self.inner).config()
    }

    /// Compaction totals since the queue was created.
    pub fn stats(&self) -> CompactionStats {
        sync::read(&self.inner).stats()
    }

    /// Snapshot of the live elements, oldest first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        sync::read(&self.inner).iter().cloned().collect()
    }

    /// Consume the queue, yielding live elements oldest first.
    pub fn into_vec(self) -> Vec<T> {
        self.into_buffer().into_vec()
    }

    fn into_buffer(self) -> SlotBuffer<T> {
        self.inner
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<T> Default for CompactingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for CompactingQueue<T> {
    fn clone(&self) -> Self {
        Self::from_buffer(sync::read(&self.inner).clone())
    }
}

/// Logical equality: same live elements in the same order. Two queues that
/// differ only in how much dequeued prefix they still carry are equal.
impl<T: PartialEq> PartialEq for CompactingQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        if core::ptr::eq(self, other) {
            return true;
        }
        // Address order keeps concurrent a == b and b == a from deadlocking
        // behind a queued writer.
        let (first, second) = if (self as *const Self) < (other as *const Self) {
            (self, other)
        } else {
            (other, self)
        };
        let a = sync::read(&first.inner);
        let b = sync::read(&second.inner);
        *a == *b
    }
}

impl<T: Eq> Eq for CompactingQueue<T> {}

impl<T: fmt::Debug> fmt::Debug for CompactingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = sync::read(&self.inner);
        f.debug_struct("CompactingQueue")
            .field("elements", &*inner)
            .field("head", &inner.head())
            .field("slots", &inner.slots())
            .finish()
    }
}

impl<T> FromIterator<T> for CompactingQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_buffer(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for CompactingQueue<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T> Extend<T> for CompactingQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.enqueue_batch(iter);
    }
}
