//! Min-priority queue with lazy invalidation.
//!
//! Lowering a node's priority pushes a second entry instead of updating the
//! first one in place, so the queue may hold several entries for the same
//! node. Consumers discard an entry when [`QueueItem::is_stale`] says a
//! better distance has been recorded since it was pushed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::graph::NodeIndex;

/// A node together with its tentative distance.
#[derive(Debug, Clone, Copy)]
pub struct QueueItem {
    pub node: NodeIndex,
    pub priority: f64,
}

impl QueueItem {
    pub fn new(node: NodeIndex, priority: f64) -> Self {
        Self { node, priority }
    }

    /// Whether this entry has been superseded.
    ///
    /// `best` holds the best known distance for every node; the entry is
    /// stale when its priority is worse than that.
    pub fn is_stale(&self, best: &[f64]) -> bool {
        self.priority > best[self.node.0]
    }
}

// Reversed so that `BinaryHeap` (a max-heap) pops the smallest priority.
// Equal priorities pop the lower node index first.
impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

/// Binary min-heap of [`QueueItem`]s.
#[derive(Debug, Default)]
pub struct MinQueue {
    heap: BinaryHeap<QueueItem>,
}

impl MinQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Add an entry. O(log n).
    pub fn push(&mut self, item: QueueItem) {
        self.heap.push(item);
    }

    /// Remove and return the entry with the smallest priority. O(log n).
    pub fn pop(&mut self) -> Option<QueueItem> {
        self.heap.pop()
    }

    /// Number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
