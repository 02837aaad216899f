//! Fixed-capacity FIFO buffer of per-symbol samples.
//!
//! Storage is oldest-first: `iter()` starts at the oldest retained sample and
//! `latest()` is the newest. Consumers that need a minimum history call
//! [`RollingWindow::ready`] and get a [`NotReady`] until enough samples arrived.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name} window not ready: {filled}/{required} samples")]
pub struct NotReady {
    pub name: &'static str,
    pub filled: usize,
    pub required: usize,
}

#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    name: &'static str,
    capacity: usize,
    min_fill: usize,
    items: VecDeque<T>,
}

impl<T> RollingWindow<T> {
    /// Window that becomes ready once full.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self::with_min_fill(name, capacity, capacity)
    }

    /// `min_fill` is clamped to `capacity`.
    pub fn with_min_fill(name: &'static str, capacity: usize, min_fill: usize) -> Self {
        assert!(capacity > 0, "rolling window capacity must be positive");
        Self {
            name,
            capacity,
            min_fill: min_fill.min(capacity),
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, returning the evicted oldest sample when at capacity.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.items.len() >= self.min_fill
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// The sample before the latest.
    pub fn previous(&self) -> Option<&T> {
        let len = self.items.len();
        if len < 2 {
            None
        } else {
            self.items.get(len - 2)
        }
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Newest to oldest.
    pub fn iter_recent_first(&self) -> impl Iterator<Item = &T> {
        self.items.iter().rev()
    }

    pub fn ready(&self) -> Result<&Self, NotReady> {
        if self.is_ready() {
            Ok(self)
        } else {
            Err(NotReady {
                name: self.name,
                filled: self.items.len(),
                required: self.min_fill,
            })
        }
    }
}

impl<T: Copy> RollingWindow<T> {
    /// Copy of the retained samples, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().copied().collect()
    }
}
