//! FIFO queue over [`IndexedList`].

use crate::list::{IndexedList, Iter};

/// First-in first-out queue backed by an [`IndexedList`].
///
/// Popped nodes are recycled by later pushes, so a queue that stays within
/// its high-water mark never reallocates.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedQueue<T> {
    list: IndexedList<T>,
}

impl<T> IndexedQueue<T> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            list: IndexedList::new(),
        }
    }

    /// Create an empty queue with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: IndexedList::with_capacity(capacity),
        }
    }

    /// Add a value at the back.
    pub fn push(&mut self, value: T) {
        self.list.push_back(value);
    }

    /// Remove the value at the front.
    pub fn pop(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    /// Next value to be popped.
    pub fn front(&self) -> Option<&T> {
        self.list.front()
    }

    /// Most recently pushed value.
    pub fn back(&self) -> Option<&T> {
        self.list.back()
    }

    /// Number of queued values.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Node capacity of the backing list.
    pub fn capacity(&self) -> usize {
        self.list.capacity()
    }

    /// Drop every queued value.
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Iterate from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        self.list.iter()
    }
}

impl<T> Default for IndexedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for IndexedQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            list: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for IndexedQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.list.extend(iter);
    }
}
