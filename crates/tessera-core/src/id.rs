//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a memory slot binding inside a memory pool.
///
/// Bindings are stored in one arena per pool and linked into per-kind
/// chains by index. `BindingId(n)` is the n-th binding the pool created;
/// ids are never reused while the pool lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

impl BindingId {
    /// The id as an index into the owning pool's binding arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BindingId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an individually heap-allocated object.
///
/// Issued sequentially by the individual allocation mode. Never reused
/// within one context, so a destroyed object's id stays dead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
