//! Arena-backed doubly linked list.
//!
//! [`IndexedList`] stores every node in one [`GrowableArray`] and links
//! nodes by index. Vacated nodes go on a free-index stack and are reused
//! before the array grows, so steady-state push/pop traffic never
//! allocates.
//!
//! Positional operations ([`insert_index`](IndexedList::insert_index),
//! [`erase_index`](IndexedList::erase_index), [`get`](IndexedList::get))
//! walk from the head and are O(n). Operations addressed by [`NodeId`]
//! are O(1).

use std::fmt;

use crate::growable::GrowableArray;

/// Smallest node capacity allocated by an implicit growth.
const MIN_NODES: usize = 4;

/// Stable handle to a node in an [`IndexedList`].
///
/// Valid until the node is removed. A removed node's index is recycled
/// by the next push, so holding a `NodeId` past removal addresses
/// whatever value is stored there next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Index of the node in the backing array.
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone)]
struct Node<T> {
    /// `Some` while the node is taken.
    value: Option<T>,
    next: usize,
    prev: usize,
    has_next: bool,
    has_prev: bool,
}

impl<T> Node<T> {
    const fn vacant() -> Self {
        Self {
            value: None,
            next: 0,
            prev: 0,
            has_next: false,
            has_prev: false,
        }
    }
}

/// A doubly linked list whose nodes live in one contiguous array.
///
/// Invariants:
/// - `len <= capacity`
/// - walking `next` from `head` `len - 1` times reaches `tail`, whose
///   `has_next` is false
/// - every vacant node index appears exactly once on the free stack, so
///   `free_len() == capacity() - len()`
#[derive(Clone)]
pub struct IndexedList<T> {
    nodes: GrowableArray<Node<T>>,
    free: GrowableArray<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> IndexedList<T> {
    /// Create an empty list without allocating.
    pub const fn new() -> Self {
        Self {
            nodes: GrowableArray::new(),
            free: GrowableArray::new(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Create an empty list with `capacity` vacant nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut list = Self::new();
        list.reserve(capacity);
        list
    }

    /// Number of values in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, taken or vacant.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of indices on the free stack.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Grow to at least `capacity` nodes.
    ///
    /// Existing nodes keep their indices. New nodes are pushed on the free
    /// stack so the lowest new index is claimed first.
    pub fn reserve(&mut self, capacity: usize) {
        let old = self.nodes.len();
        if capacity <= old {
            return;
        }
        self.nodes.reserve(capacity);
        self.free.reserve(capacity);
        self.nodes.resize_with(capacity, Node::vacant);
        for index in (old..capacity).rev() {
            self.free.push_back(index);
        }
    }

    fn claim(&mut self, value: T) -> usize {
        if self.len == self.nodes.len() {
            self.reserve((self.nodes.len() * 2).max(MIN_NODES));
        }
        let index = match self.free.pop_back() {
            Some(index) => index,
            None => self
                .nodes
                .iter()
                .position(|n| n.value.is_none())
                .expect("list below capacity has a vacant node"),
        };
        let node = &mut self.nodes[index];
        node.value = Some(value);
        node.has_next = false;
        node.has_prev = false;
        index
    }

    fn release(&mut self, index: usize) -> T {
        let node = &mut self.nodes[index];
        let value = node.value.take().expect("released node is taken");
        node.has_next = false;
        node.has_prev = false;
        self.free.push_back(index);
        value
    }

    /// Append a value, returning its node.
    pub fn push_back(&mut self, value: T) -> NodeId {
        let index = self.claim(value);
        if self.len == 0 {
            self.head = index;
        } else {
            let tail = self.tail;
            self.link(tail, index);
        }
        self.tail = index;
        self.len += 1;
        NodeId(index)
    }

    /// Prepend a value, returning its node.
    pub fn push_front(&mut self, value: T) -> NodeId {
        let index = self.claim(value);
        if self.len == 0 {
            self.tail = index;
        } else {
            let head = self.head;
            self.link(index, head);
        }
        self.head = index;
        self.len += 1;
        NodeId(index)
    }

    /// Remove and return the last value.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let index = self.tail;
        if self.len == 1 {
            self.head = 0;
            self.tail = 0;
        } else {
            let prev = self.nodes[index].prev;
            self.nodes[prev].has_next = false;
            self.tail = prev;
        }
        self.len -= 1;
        Some(self.release(index))
    }

    /// Remove and return the first value.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let index = self.head;
        if self.len == 1 {
            self.head = 0;
            self.tail = 0;
        } else {
            let next = self.nodes[index].next;
            self.nodes[next].has_prev = false;
            self.head = next;
        }
        self.len -= 1;
        Some(self.release(index))
    }

    /// Insert `value` so that it ends up at `position`.
    ///
    /// Positions `0` and `len` take the O(1) front/back paths; anything in
    /// between walks from the head.
    ///
    /// # Panics
    ///
    /// If `position > len`.
    #[track_caller]
    pub fn insert_index(&mut self, position: usize, value: T) -> NodeId {
        assert!(
            position <= self.len,
            "insert position {position} out of range for length {}",
            self.len
        );
        if position == 0 {
            return self.push_front(value);
        }
        if position == self.len {
            return self.push_back(value);
        }
        let at = self.locate(position);
        let index = self.claim(value);
        let prev = self.nodes[at].prev;
        self.link(prev, index);
        self.link(index, at);
        self.len += 1;
        NodeId(index)
    }

    /// Remove and return the value at `position`.
    ///
    /// # Panics
    ///
    /// If `position >= len`.
    #[track_caller]
    pub fn erase_index(&mut self, position: usize) -> T {
        assert!(
            position < self.len,
            "erase position {position} out of range for length {}",
            self.len
        );
        if position == 0 {
            return self.pop_front().expect("list is non-empty");
        }
        if position == self.len - 1 {
            return self.pop_back().expect("list is non-empty");
        }
        let index = self.locate(position);
        self.unlink_inner(index)
    }

    /// Remove the value stored at `id`. Returns `None` if the node is vacant.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let index = id.0;
        if self.nodes.get(index)?.value.is_none() {
            return None;
        }
        if index == self.head {
            return self.pop_front();
        }
        if index == self.tail {
            return self.pop_back();
        }
        Some(self.unlink_inner(index))
    }

    /// Drop every value. Capacity is kept and every node becomes free.
    pub fn clear(&mut self) {
        for node in self.nodes.iter_mut() {
            *node = Node::vacant();
        }
        self.free.clear();
        for index in (0..self.nodes.len()).rev() {
            self.free.push_back(index);
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Value at `position`, walking from the head.
    pub fn get(&self, position: usize) -> Option<&T> {
        if position >= self.len {
            return None;
        }
        self.nodes[self.locate(position)].value.as_ref()
    }

    /// Mutable value at `position`, walking from the head.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut T> {
        if position >= self.len {
            return None;
        }
        let index = self.locate(position);
        self.nodes[index].value.as_mut()
    }

    /// Value stored at `id`.
    pub fn node(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0)?.value.as_ref()
    }

    /// Mutable value stored at `id`.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0)?.value.as_mut()
    }

    /// First value.
    pub fn front(&self) -> Option<&T> {
        self.head().and_then(|id| self.node(id))
    }

    /// Last value.
    pub fn back(&self) -> Option<&T> {
        self.tail().and_then(|id| self.node(id))
    }

    /// Mutable first value.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let id = self.head()?;
        self.node_mut(id)
    }

    /// Mutable last value.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let id = self.tail()?;
        self.node_mut(id)
    }

    /// First node.
    pub fn head(&self) -> Option<NodeId> {
        (self.len > 0).then_some(NodeId(self.head))
    }

    /// Last node.
    pub fn tail(&self) -> Option<NodeId> {
        (self.len > 0).then_some(NodeId(self.tail))
    }

    /// Node after `id`, if `id` is taken and not the tail.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id.0)?;
        (node.value.is_some() && node.has_next).then_some(NodeId(node.next))
    }

    /// Node before `id`, if `id` is taken and not the head.
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id.0)?;
        (node.value.is_some() && node.has_prev).then_some(NodeId(node.prev))
    }

    /// Iterate values from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn link(&mut self, from: usize, to: usize) {
        self.nodes[from].next = to;
        self.nodes[from].has_next = true;
        self.nodes[to].prev = from;
        self.nodes[to].has_prev = true;
    }

    /// Unlink a node that is neither head nor tail.
    fn unlink_inner(&mut self, index: usize) -> T {
        let (prev, next) = (self.nodes[index].prev, self.nodes[index].next);
        self.link(prev, next);
        self.len -= 1;
        self.release(index)
    }

    fn locate(&self, position: usize) -> usize {
        let mut index = self.head;
        for _ in 0..position {
            index = self.nodes[index].next;
        }
        index
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        assert!(self.len <= self.capacity());
        assert_eq!(self.free.len(), self.capacity() - self.len);
        if self.len > 0 {
            assert!(!self.nodes[self.head].has_prev);
            let mut index = self.head;
            for _ in 1..self.len {
                assert!(self.nodes[index].has_next);
                let next = self.nodes[index].next;
                assert_eq!(self.nodes[next].prev, index);
                index = next;
            }
            assert_eq!(index, self.tail);
            assert!(!self.nodes[index].has_next);
        }
        let mut seen = vec![false; self.capacity()];
        for &index in self.free.iter() {
            assert!(self.nodes[index].value.is_none(), "free index {index} is taken");
            assert!(!seen[index], "free index {index} listed twice");
            seen[index] = true;
        }
    }
}

impl<T> Default for IndexedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for IndexedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for IndexedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> FromIterator<T> for IndexedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for IndexedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a IndexedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Head-to-tail iterator over an [`IndexedList`].
pub struct Iter<'a, T> {
    list: &'a IndexedList<T>,
    cursor: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.remaining -= 1;
        self.cursor = node.next;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
