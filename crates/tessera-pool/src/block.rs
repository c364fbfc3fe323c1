//! Fixed-size memory blocks.
//!
//! A [`MemoryBlock`] is a raw byte arena sized exactly for the bindings
//! carved from it. The pool's base block holds one binding per registered
//! kind at increasing offsets; each overflow block holds a single binding.

use std::ptr::NonNull;

use crate::raw::RawBlock;

/// A raw byte arena of fixed size.
///
/// Blocks never grow, shrink, or move their contents. They are freed when
/// the owning pool is dropped.
pub struct MemoryBlock {
    raw: RawBlock,
}

impl MemoryBlock {
    /// Allocate a block of `size` bytes.
    ///
    /// Returns `None` if `size` is too large to allocate. Allocator failure
    /// aborts the process.
    pub(crate) fn new(size: usize) -> Option<Self> {
        RawBlock::alloc(size).map(|raw| Self { raw })
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.raw.size()
    }

    /// Address of the byte at `offset`.
    pub(crate) fn address(&self, offset: usize) -> NonNull<u8> {
        self.raw.at(offset)
    }
}

impl std::fmt::Debug for MemoryBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBlock")
            .field("size", &self.size())
            .finish()
    }
}
