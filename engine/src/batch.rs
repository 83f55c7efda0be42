//! Batch Queue
//!
//! Work that would stall a frame if done at once (placing every label in the
//! scene, for example) is queued and processed a fixed number of items per
//! tick. Items are handed out in FIFO order.
//!
//! # Example
//!
//! ```ignore
//! let mut queue = BatchQueue::new(DEFAULT_ITEMS_PER_TICK);
//! queue.extend(anchors);
//!
//! // Each frame:
//! for anchor in queue.next_batch() {
//!     place_label(anchor);
//! }
//! ```

use std::collections::VecDeque;

use static_assertions::const_assert;

/// Items processed per tick unless configured otherwise
pub const DEFAULT_ITEMS_PER_TICK: usize = 8;

const_assert!(DEFAULT_ITEMS_PER_TICK > 0);

/// FIFO queue drained a bounded number of items per tick.
#[derive(Debug, Clone)]
pub struct BatchQueue<T> {
    pending: VecDeque<T>,
    items_per_tick: usize,
    /// Items handed out since the queue was last empty
    processed: usize,
}

impl<T> Default for BatchQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_TICK)
    }
}

impl<T> BatchQueue<T> {
    /// Create a queue. A budget of zero is raised to one so the queue always drains.
    pub fn new(items_per_tick: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            items_per_tick: items_per_tick.max(1),
            processed: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        self.pending.push_back(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.pending.extend(items);
    }

    /// Take at most `items_per_tick` items for this tick.
    pub fn next_batch(&mut self) -> Vec<T> {
        let count = self.items_per_tick.min(self.pending.len());
        let batch: Vec<T> = self.pending.drain(..count).collect();
        self.processed += batch.len();
        if self.pending.is_empty() {
            self.processed = 0;
        }
        batch
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn items_per_tick(&self) -> usize {
        self.items_per_tick
    }

    /// Fraction of the current run already handed out (1.0 when idle).
    pub fn progress(&self) -> f32 {
        let total = self.processed + self.pending.len();
        if total == 0 {
            1.0
        } else {
            self.processed as f32 / total as f32
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.processed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_respect_budget() {
        let mut queue = BatchQueue::new(3);
        queue.extend(0..7);
        assert_eq!(queue.next_batch(), vec![0, 1, 2]);
        assert!((queue.progress() - 3.0 / 7.0).abs() < 1e-6);
        assert_eq!(queue.next_batch(), vec![3, 4, 5]);
        assert_eq!(queue.next_batch(), vec![6]);
        assert!(queue.is_empty());
        assert!(queue.next_batch().is_empty());
        assert_eq!(queue.progress(), 1.0);
    }

    #[test]
    fn test_zero_budget_still_drains() {
        let mut queue = BatchQueue::new(0);
        queue.push("a");
        assert_eq!(queue.items_per_tick(), 1);
        assert_eq!(queue.next_batch(), vec!["a"]);
    }
}
