//! Raw block memory and typed slot access.
//!
//! This is the only module in the crate that may contain `unsafe` code.
//! [`RawBlock`] owns one aligned heap allocation; the free functions move
//! typed values in and out of addresses inside such a block. Callers
//! uphold the slot bookkeeping documented on each function and justify
//! every call with a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

/// Alignment of every block allocation. Types with a stricter alignment
/// are rejected at registration.
pub(crate) const BLOCK_ALIGN: usize = 64;

/// One aligned, uninitialised heap allocation.
pub(crate) struct RawBlock {
    ptr: NonNull<u8>,
    layout: Layout,
    size: usize,
}

impl RawBlock {
    /// Allocate `size` bytes aligned to [`BLOCK_ALIGN`].
    ///
    /// Returns `None` if `size` cannot form a valid layout. Aborts through
    /// [`alloc::handle_alloc_error`] if the allocator fails.
    pub(crate) fn alloc(size: usize) -> Option<Self> {
        // Zero-sized allocations are not allowed; a one-byte block serves
        // zero-sized slot types.
        let layout = Layout::from_size_align(size.max(1), BLOCK_ALIGN).ok()?;
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };
        Some(Self { ptr, layout, size })
    }

    /// Usable size in bytes.
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Address `offset` bytes into the block.
    ///
    /// # Panics
    ///
    /// If `offset > size`.
    pub(crate) fn at(&self, offset: usize) -> NonNull<u8> {
        assert!(
            offset <= self.size,
            "offset {offset} outside block of {} bytes",
            self.size
        );
        // SAFETY: `offset` is within the allocation (or one past its end),
        // so the result is in bounds and non-null.
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(offset)) }
    }
}

impl Drop for RawBlock {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc::alloc` with `layout` and is
        // freed exactly once.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

// SAFETY: a `RawBlock` uniquely owns its allocation. The pool only stores
// `Send` values in it, so moving the block to another thread moves those
// values with it.
unsafe impl Send for RawBlock {}

/// Move `value` into the slot at `ptr`.
///
/// # Safety
///
/// `ptr` must be aligned for `T`, valid for `size_of::<T>()` bytes of
/// writes, and must not hold a live value (it is overwritten, not dropped).
pub(crate) unsafe fn write<T>(ptr: NonNull<u8>, value: T) {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::write(ptr.cast::<T>().as_ptr(), value) }
}

/// Move the value out of the slot at `ptr`, leaving it logically empty.
///
/// # Safety
///
/// `ptr` must hold a live `T` written by [`write`]. The slot must be
/// treated as empty afterwards.
pub(crate) unsafe fn read<T>(ptr: NonNull<u8>) -> T {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::read(ptr.cast::<T>().as_ptr()) }
}

/// Borrow the value in the slot at `ptr`.
///
/// # Safety
///
/// `ptr` must hold a live `T` that is not mutably borrowed for `'a`.
pub(crate) unsafe fn get<'a, T>(ptr: NonNull<u8>) -> &'a T {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr.cast::<T>().as_ref() }
}

/// Mutably borrow the value in the slot at `ptr`.
///
/// # Safety
///
/// `ptr` must hold a live `T` that is not otherwise borrowed for `'a`.
pub(crate) unsafe fn get_mut<'a, T>(ptr: NonNull<u8>) -> &'a mut T {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr.cast::<T>().as_mut() }
}

/// Drop the `T` in the slot at `ptr` in place.
///
/// Stored as a type-erased `unsafe fn(NonNull<u8>)` so a pool can drop
/// leftover objects of any registered kind at teardown.
///
/// # Safety
///
/// `ptr` must hold a live `T`. The slot must be treated as empty
/// afterwards.
pub(crate) unsafe fn drop_erased<T>(ptr: NonNull<u8>) {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::drop_in_place(ptr.cast::<T>().as_ptr()) }
}
