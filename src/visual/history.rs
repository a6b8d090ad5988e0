//! Fixed-capacity FIFO used for trails, bass smoothing and the analysis tap.

use std::collections::VecDeque;

/// Bounded FIFO: pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, returning the evicted oldest item if full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Most recent item
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.items.iter()
    }
}

impl<T: Copy> BoundedHistory<T> {
    /// Copy contents oldest to newest into `out`, replacing its contents.
    pub fn copy_into(&self, out: &mut Vec<T>) {
        out.clear();
        out.extend(self.items.iter().copied());
    }
}

impl BoundedHistory<f32> {
    /// Arithmetic mean (0 when empty)
    pub fn mean(&self) -> f32 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.items.iter().sum::<f32>() / self.items.len() as f32
    }
}
