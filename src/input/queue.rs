//! Bounded FIFO shared by the keyboard and mouse trackers.
//!
//! `push` appends at the tail and, once the queue holds more than its
//! capacity, discards from the head. The queue always keeps the most recent
//! events: a slow frame never accumulates an unbounded backlog and input
//! never blocks the render loop. Overflow is silent; it is the backpressure
//! policy, not an error.

use std::collections::VecDeque;

/// Capacity used by the trackers unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 16;

/// Fixed-capacity FIFO that drops its oldest entry on overflow.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue. A capacity of zero is raised to one so the
    /// most recent event is always observable.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Removes and returns the oldest entry, or `None` when empty.
    pub fn read(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discards every entry without reading it.
    pub fn flush(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
