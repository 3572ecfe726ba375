//! Sliding Window Implementation

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Fixed-capacity window over the most recent samples.
///
/// Storage is ordered oldest to newest. A window with capacity 0 never
/// retains anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidingWindow<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    /// Create an empty window holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a sample as the newest entry, evicting the oldest if full.
    ///
    /// Returns the evicted sample, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }

        let evicted = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(item);
        evicted
    }

    /// Most recent sample
    pub fn newest(&self) -> Option<&T> {
        self.data.back()
    }

    /// Oldest retained sample
    pub fn oldest(&self) -> Option<&T> {
        self.data.front()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate newest to oldest
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &T> {
        self.data.iter().rev()
    }

    /// The `count` oldest samples, oldest first
    pub fn oldest_n(&self, count: usize) -> impl Iterator<Item = &T> {
        self.data.iter().take(count)
    }

    /// The `count` newest samples, oldest first
    pub fn newest_n(&self, count: usize) -> impl Iterator<Item = &T> {
        let skip = self.data.len().saturating_sub(count);
        self.data.iter().skip(skip)
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the window is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the window holds `capacity` samples
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    /// Maximum number of samples retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, evicting the oldest samples when shrinking
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.data.len() > capacity {
            self.data.pop_front();
        }
    }

    /// Fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.data.len() as f64 / self.capacity as f64
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.data.clear();
    }
}
