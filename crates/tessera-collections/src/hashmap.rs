//! Open-addressing hash map with in-array chaining.
//!
//! Every entry lives in one [`GrowableArray`]. A key's search starts at
//! its home slot (`hash(key) % capacity`) and follows `next` indices
//! threaded through the same array. A new key whose home slot is taken is
//! written to the first vacant slot found by probing forward from the
//! home slot, and linked after the tail of the chain that runs through the
//! home slot.
//!
//! Chain shape is maintained by two rules:
//!
//! - an entry sitting in its own home slot never has a predecessor, so a
//!   search that starts there sees the whole chain after it
//! - chains never contain vacant entries; erase closes the hole by pulling
//!   each successor back one link, and the last link is cleared
//!
//! When pulling a successor back would land it in its own home slot while
//! a predecessor still links to that slot, the rest of the chain is
//! unthreaded and every entry in it is placed again from its home slot.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

use smallvec::SmallVec;

use crate::growable::GrowableArray;
use crate::hash::{IntKey, KeyHash, SplitMix64};

/// Capacity allocated on the first insert into an empty map.
const MIN_CAPACITY: usize = 8;

/// Maximum load factor, as a ratio `LOAD_NUM / LOAD_DEN`.
const LOAD_NUM: usize = 7;
const LOAD_DEN: usize = 10;

#[derive(Clone)]
struct Entry<K, T> {
    key: K,
    /// `Some` while the entry is taken.
    value: Option<T>,
    next: usize,
    has_next: bool,
}

impl<K: IntKey, T> Entry<K, T> {
    fn vacant() -> Self {
        Self {
            key: K::default(),
            value: None,
            next: 0,
            has_next: false,
        }
    }

    fn is_taken(&self) -> bool {
        self.value.is_some()
    }
}

/// A hash map restricted to integral keys.
///
/// `len * 10 <= capacity * 7` holds after every operation: an insert of a
/// new key that would break the bound first doubles the capacity and
/// rehashes every entry. Iteration visits entries in slot order.
pub struct IntKeyHashMap<K, T, H = SplitMix64> {
    entries: GrowableArray<Entry<K, T>>,
    len: usize,
    hasher: PhantomData<fn() -> H>,
}

impl<K: IntKey, T, H: KeyHash> IntKeyHashMap<K, T, H> {
    /// Create an empty map without allocating.
    pub fn new() -> Self {
        Self {
            entries: GrowableArray::new(),
            len: 0,
            hasher: PhantomData,
        }
    }

    /// Create an empty map with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::new();
        map.entries.resize_with(capacity, Entry::vacant);
        map
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn home(&self, key: K) -> usize {
        (H::hash(key.to_u64()) % self.entries.len() as u64) as usize
    }

    fn fits(len: usize, capacity: usize) -> bool {
        len * LOAD_DEN <= capacity * LOAD_NUM
    }

    /// Slot holding `key` and the slot that links to it, if any.
    fn find(&self, key: K) -> Option<(usize, Option<usize>)> {
        if self.entries.is_empty() {
            return None;
        }
        let mut slot = self.home(key);
        let mut pred = None;
        loop {
            let entry = &self.entries[slot];
            if entry.is_taken() && entry.key == key {
                return Some((slot, pred));
            }
            if !entry.has_next {
                return None;
            }
            pred = Some(slot);
            slot = entry.next;
        }
    }

    /// Write an absent key into the table. A vacant slot must exist.
    fn place(&mut self, key: K, value: T) {
        let capacity = self.entries.len();
        let home = self.home(key);
        if !self.entries[home].is_taken() {
            self.entries[home] = Entry {
                key,
                value: Some(value),
                next: 0,
                has_next: false,
            };
            return;
        }

        let mut tail = home;
        while self.entries[tail].has_next {
            tail = self.entries[tail].next;
        }
        let free = (1..capacity)
            .map(|step| (home + step) % capacity)
            .find(|&slot| !self.entries[slot].is_taken())
            .expect("table below load limit has a vacant slot");
        self.entries[free] = Entry {
            key,
            value: Some(value),
            next: 0,
            has_next: false,
        };
        let tail = &mut self.entries[tail];
        tail.next = free;
        tail.has_next = true;
    }

    fn rehash(&mut self, capacity: usize) {
        let mut fresh = GrowableArray::with_capacity(capacity);
        fresh.resize_with(capacity, Entry::vacant);
        let old = std::mem::replace(&mut self.entries, fresh);
        for entry in old {
            if let Some(value) = entry.value {
                self.place(entry.key, value);
            }
        }
    }

    fn grow_to_fit(&mut self, len: usize) {
        if Self::fits(len, self.entries.len()) {
            return;
        }
        let mut capacity = (self.entries.len() * 2).max(MIN_CAPACITY);
        while !Self::fits(len, capacity) {
            capacity *= 2;
        }
        self.rehash(capacity);
    }

    /// Make room for `additional` more entries without a further rehash.
    pub fn reserve(&mut self, additional: usize) {
        self.grow_to_fit(self.len + additional);
    }

    /// Insert or overwrite. Returns the previous value for `key`.
    pub fn insert(&mut self, key: K, value: T) -> Option<T> {
        if let Some((slot, _)) = self.find(key) {
            return self.entries[slot].value.replace(value);
        }
        self.grow_to_fit(self.len + 1);
        self.place(key, value);
        self.len += 1;
        None
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: K) -> Option<T> {
        let (slot, pred) = self.find(key)?;
        let value = self.entries[slot].value.take();
        self.len -= 1;
        self.close_hole(slot, pred);
        value
    }

    /// Pull successors back over the vacated `hole`, link by link.
    fn close_hole(&mut self, mut hole: usize, mut pred: Option<usize>) {
        loop {
            if !self.entries[hole].has_next {
                self.entries[hole] = Entry::vacant();
                if let Some(pred) = pred {
                    self.entries[pred].has_next = false;
                }
                return;
            }
            let next = self.entries[hole].next;
            let next_key = self.entries[next].key;
            if pred.is_some() && self.home(next_key) == hole {
                self.rethread(hole, pred);
                return;
            }
            let value = self.entries[next].value.take();
            let entry = &mut self.entries[hole];
            entry.key = next_key;
            entry.value = value;
            pred = Some(hole);
            hole = next;
        }
    }

    /// Unthread everything after `hole` and place it again.
    fn rethread(&mut self, hole: usize, pred: Option<usize>) {
        let mut moved: SmallVec<[(K, T); 8]> = SmallVec::new();
        let mut slot = self.entries[hole].next;
        self.entries[hole] = Entry::vacant();
        loop {
            let entry = std::mem::replace(&mut self.entries[slot], Entry::vacant());
            let value = entry.value.expect("chain entries are taken");
            moved.push((entry.key, value));
            if !entry.has_next {
                break;
            }
            slot = entry.next;
        }
        if let Some(pred) = pred {
            self.entries[pred].has_next = false;
        }
        for (key, value) in moved {
            self.place(key, value);
        }
    }

    /// Value for `key`.
    pub fn get(&self, key: K) -> Option<&T> {
        let (slot, _) = self.find(key)?;
        self.entries[slot].value.as_ref()
    }

    /// Mutable value for `key`.
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let (slot, _) = self.find(key)?;
        self.entries[slot].value.as_mut()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: K) -> bool {
        self.find(key).is_some()
    }

    /// Drop every entry. Capacity is kept.
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = Entry::vacant();
        }
        self.len = 0;
    }

    /// Iterate `(key, &value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.value.as_ref().map(|v| (e.key, v)))
    }

    /// Iterate `(key, &mut value)` pairs in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut T)> + '_ {
        self.entries
            .iter_mut()
            .filter_map(|e| e.value.as_mut().map(|v| (e.key, v)))
    }

    /// Iterate keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterate values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, v)| v)
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        let capacity = self.entries.len();
        assert!(Self::fits(self.len, capacity), "load factor exceeded");
        let mut has_pred = vec![false; capacity];
        let mut taken = 0;
        for entry in self.entries.iter() {
            if !entry.is_taken() {
                assert!(!entry.has_next, "vacant entry links onward");
                continue;
            }
            taken += 1;
            if entry.has_next {
                assert!(self.entries[entry.next].is_taken(), "chain holds a hole");
                assert!(!has_pred[entry.next], "two entries link to one slot");
                has_pred[entry.next] = true;
            }
        }
        assert_eq!(taken, self.len);
        for (slot, entry) in self.entries.iter().enumerate() {
            if entry.is_taken() {
                assert_eq!(self.find(entry.key).map(|(s, _)| s), Some(slot));
                if self.home(entry.key) == slot {
                    assert!(!has_pred[slot], "entry at home slot has a predecessor");
                }
            }
        }
    }
}

impl<K: IntKey, T: Default, H: KeyHash> IntKeyHashMap<K, T, H> {
    /// Value for `key`, inserting `T::default()` first if absent.
    ///
    /// Never a pure read: a miss grows the map.
    pub fn at(&mut self, key: K) -> &mut T {
        let slot = match self.find(key) {
            Some((slot, _)) => slot,
            None => {
                self.insert(key, T::default());
                self.find(key).expect("key was just inserted").0
            }
        };
        self.entries[slot]
            .value
            .as_mut()
            .expect("found entries are taken")
    }
}

impl<K: IntKey, T, H: KeyHash> Default for IntKeyHashMap<K, T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IntKey, T: Clone, H: KeyHash> Clone for IntKeyHashMap<K, T, H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            len: self.len,
            hasher: PhantomData,
        }
    }
}

impl<K: IntKey, T: fmt::Debug, H: KeyHash> fmt::Debug for IntKeyHashMap<K, T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: IntKey, T, H: KeyHash> Index<K> for IntKeyHashMap<K, T, H> {
    type Output = T;

    #[track_caller]
    fn index(&self, key: K) -> &T {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key {key:?} not present"),
        }
    }
}

impl<K: IntKey, T, H: KeyHash> Extend<(K, T)> for IntKeyHashMap<K, T, H> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: IntKey, T, H: KeyHash> FromIterator<(K, T)> for IntKeyHashMap<K, T, H> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
