//! Contiguous growable array.
//!
//! [`GrowableArray`] is the building block for the other containers in
//! this crate and a general-purpose buffer for engine subsystems. It
//! differs from a bare `Vec` in its growth contract: explicit
//! [`reserve`](GrowableArray::reserve) sizes the buffer to exactly the
//! requested capacity, `push_back` doubles (minimum 4), and capacity only
//! shrinks on [`shrink_to_fit`](GrowableArray::shrink_to_fit).

use std::ops::{Deref, DerefMut};

use crate::error::CollectionError;

/// Smallest capacity allocated by an implicit growth.
const MIN_GROWTH: usize = 4;

/// A contiguous, resizable sequence.
///
/// Indexing goes through the slice `Deref` impl and is always
/// bounds-checked. Positional insert/erase panic on an out-of-range index.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GrowableArray<T> {
    items: Vec<T>,
}

impl<T> GrowableArray<T> {
    /// Create an empty array without allocating.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut items = Vec::new();
        items.reserve_exact(capacity);
        Self { items }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements the buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Ensure capacity for at least `capacity` elements in total.
    ///
    /// No-op if the buffer is already large enough. Otherwise the buffer
    /// is reallocated to hold `capacity` elements and the existing ones are
    /// moved across. Aborts if the allocator fails.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity <= self.items.capacity() {
            return;
        }
        self.items.reserve_exact(capacity - self.items.len());
    }

    /// Fallible variant of [`reserve`](Self::reserve).
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), CollectionError> {
        if capacity <= self.items.capacity() {
            return Ok(());
        }
        self.items
            .try_reserve_exact(capacity - self.items.len())
            .map_err(|_| CollectionError::AllocationFailed {
                requested: capacity,
            })
    }

    /// Release unused capacity.
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
    }

    fn grow_for(&mut self, additional: usize) {
        let needed = self.items.len() + additional;
        if needed <= self.items.capacity() {
            return;
        }
        let mut target = (self.items.capacity() * 2).max(MIN_GROWTH);
        while target < needed {
            target *= 2;
        }
        self.reserve(target);
    }

    /// Append an element, doubling the capacity when full.
    pub fn push_back(&mut self, value: T) {
        self.grow_for(1);
        self.items.push(value);
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Insert `value` at `index`, shifting the tail right.
    ///
    /// # Panics
    ///
    /// If `index > len`.
    #[track_caller]
    pub fn insert_index(&mut self, index: usize, value: T) {
        assert!(
            index <= self.items.len(),
            "insert index {index} out of range for length {}",
            self.items.len()
        );
        self.grow_for(1);
        self.items.insert(index, value);
    }

    /// Remove and return the element at `index`, shifting the tail left.
    ///
    /// # Panics
    ///
    /// If `index >= len`.
    #[track_caller]
    pub fn erase_index(&mut self, index: usize) -> T {
        assert!(
            index < self.items.len(),
            "erase index {index} out of range for length {}",
            self.items.len()
        );
        self.items.remove(index)
    }

    /// Shorten or lengthen the array, filling new slots from `fill`.
    pub fn resize_with(&mut self, len: usize, fill: impl FnMut() -> T) {
        if len > self.items.len() {
            self.reserve(len);
        }
        self.items.resize_with(len, fill);
    }

    /// First element.
    pub fn front(&self) -> Option<&T> {
        self.items.first()
    }

    /// Last element.
    pub fn back(&self) -> Option<&T> {
        self.items.last()
    }

    /// Mutable first element.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.items.first_mut()
    }

    /// Mutable last element.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Drop every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// View as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// View as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Consume the array, returning the underlying vector.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> GrowableArray<T> {
    /// Create an array of `len` copies of `value`.
    pub fn from_elem(len: usize, value: T) -> Self {
        let mut array = Self::with_capacity(len);
        array.items.resize(len, value);
        array
    }

    /// Shorten or lengthen the array, filling new slots with `value`.
    pub fn resize(&mut self, len: usize, value: T) {
        if len > self.items.len() {
            self.reserve(len);
        }
        self.items.resize(len, value);
    }

    /// Append every element of `values`.
    pub fn push_range(&mut self, values: &[T]) {
        self.grow_for(values.len());
        self.items.extend_from_slice(values);
    }

    /// Insert every element of `values` starting at `index`.
    ///
    /// # Panics
    ///
    /// If `index > len`.
    #[track_caller]
    pub fn insert_slice(&mut self, index: usize, values: &[T]) {
        assert!(
            index <= self.items.len(),
            "insert index {index} out of range for length {}",
            self.items.len()
        );
        self.grow_for(values.len());
        self.items.splice(index..index, values.iter().cloned());
    }
}

impl<T: Default> GrowableArray<T> {
    /// Shorten or lengthen the array, default-constructing new slots.
    pub fn resize_default(&mut self, len: usize) {
        self.resize_with(len, T::default);
    }
}

impl<T: PartialEq> GrowableArray<T> {
    /// Position of the first element equal to `value`.
    pub fn find_index(&self, value: &T) -> Option<usize> {
        self.items.iter().position(|v| v == value)
    }

    /// Whether any element equals `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find_index(value).is_some()
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for GrowableArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> Deref for GrowableArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for GrowableArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> From<Vec<T>> for GrowableArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for GrowableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for GrowableArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> IntoIterator for GrowableArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowableArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty_and_unallocated() {
        let a: GrowableArray<u32> = GrowableArray::new();
        assert!(a.is_empty());
        assert_eq!(a.capacity(), 0);
        assert_eq!(a.front(), None);
    }

    #[test]
    fn reserve_is_noop_when_large_enough() {
        let mut a: GrowableArray<u8> = GrowableArray::with_capacity(16);
        let cap = a.capacity();
        a.reserve(8);
        assert_eq!(a.capacity(), cap);
        a.reserve(32);
        assert!(a.capacity() >= 32);
    }

    #[test]
    fn push_back_grows_geometrically() {
        let mut a = GrowableArray::new();
        a.push_back(1);
        assert!(a.capacity() >= 4);
        for i in 0..100 {
            a.push_back(i);
        }
        assert_eq!(a.len(), 101);
        assert!(a.capacity() >= a.len());
    }

    #[test]
    fn resize_fills_and_truncates() {
        let mut a = GrowableArray::from_elem(2, 7u32);
        a.resize(5, 9);
        assert_eq!(a.as_slice(), &[7, 7, 9, 9, 9]);
        a.resize(1, 0);
        assert_eq!(a.as_slice(), &[7]);
        a.resize_default(3);
        assert_eq!(a.as_slice(), &[7, 0, 0]);
    }

    #[test]
    fn insert_and_erase_shift_tail() {
        let mut a: GrowableArray<u32> = [1, 2, 4].into_iter().collect();
        a.insert_index(2, 3);
        assert_eq!(a.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(a.erase_index(0), 1);
        assert_eq!(a.as_slice(), &[2, 3, 4]);
        a.insert_index(3, 5);
        assert_eq!(a.back(), Some(&5));
    }

    #[test]
    fn insert_slice_and_push_range() {
        let mut a: GrowableArray<u32> = vec![1, 5].into();
        a.insert_slice(1, &[2, 3, 4]);
        a.push_range(&[6, 7]);
        assert_eq!(a.as_slice(), &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn find_index_and_contains() {
        let a: GrowableArray<&str> = vec!["a", "b", "c"].into();
        assert_eq!(a.find_index(&"b"), Some(1));
        assert!(!a.contains(&"z"));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut a: GrowableArray<u32> = (0..10).collect();
        let cap = a.capacity();
        a.clear();
        assert!(a.is_empty());
        assert_eq!(a.capacity(), cap);
        a.shrink_to_fit();
        assert_eq!(a.capacity(), 0);
    }

    #[test]
    fn try_reserve_reports_overflow() {
        let mut a: GrowableArray<u64> = GrowableArray::new();
        assert!(a.try_reserve(8).is_ok());
        let err = a.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            CollectionError::AllocationFailed {
                requested: usize::MAX
            }
        );
    }

    #[test]
    #[should_panic(expected = "erase index 3 out of range")]
    fn erase_out_of_range_panics() {
        let mut a: GrowableArray<u32> = vec![1, 2, 3].into();
        a.erase_index(3);
    }

    #[test]
    #[should_panic(expected = "insert index 5 out of range")]
    fn insert_out_of_range_panics() {
        let mut a: GrowableArray<u32> = vec![1].into();
        a.insert_index(5, 0);
    }

    #[test]
    fn elements_are_dropped_on_truncate() {
        use std::rc::Rc;
        let tracker = Rc::new(());
        let mut a = GrowableArray::from_elem(4, Rc::clone(&tracker));
        assert_eq!(Rc::strong_count(&tracker), 5);
        a.resize(1, Rc::clone(&tracker));
        assert_eq!(Rc::strong_count(&tracker), 2);
        drop(a);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Push(u32),
            Pop,
            Resize(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<u32>().prop_map(Op::Push),
                Just(Op::Pop),
                (0usize..64).prop_map(Op::Resize),
            ]
        }

        proptest! {
            #[test]
            fn len_tracks_net_operations(ops in proptest::collection::vec(op(), 0..200)) {
                let mut a = GrowableArray::new();
                let mut model: Vec<u32> = Vec::new();
                for op in ops {
                    match op {
                        Op::Push(v) => {
                            a.push_back(v);
                            model.push(v);
                        }
                        Op::Pop => {
                            prop_assert_eq!(a.pop_back(), model.pop());
                        }
                        Op::Resize(n) => {
                            a.resize(n, 0);
                            model.resize(n, 0);
                        }
                    }
                    prop_assert_eq!(a.len(), model.len());
                    prop_assert!(a.capacity() >= a.len());
                }
                prop_assert_eq!(a.as_slice(), model.as_slice());
            }
        }
    }
}
