//! Slot and object handles.
//!
//! A [`SlotHandle`] names one slot of a memory pool together with the
//! generation it was issued at, so a handle that outlives its object is
//! rejected in O(1) instead of aliasing whatever reuses the slot.
//! [`ObjectHandle`] is the typed, single-owner handle the lifecycle facade
//! hands to callers.

use std::fmt;
use std::marker::PhantomData;

use tessera_core::{BindingId, ObjectId, PoolObject, StructureKind};

/// Location and generation of one pooled object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct SlotHandle {
    pub(crate) kind: StructureKind,
    pub(crate) binding: BindingId,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl SlotHandle {
    pub(crate) fn new(kind: StructureKind, binding: BindingId, slot: u32, generation: u32) -> Self {
        Self {
            kind,
            binding,
            slot,
            generation,
        }
    }

    /// Kind of the object.
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// Binding the slot belongs to.
    pub fn binding(&self) -> BindingId {
        self.binding
    }

    /// Slot index within the binding.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation the slot was at when this handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SlotHandle({}, binding={}, slot={}, gen={})",
            self.kind, self.binding, self.slot, self.generation
        )
    }
}

/// Where an object handed out by the lifecycle facade lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawHandle {
    /// Individually boxed on the general heap.
    Heap(ObjectId),
    /// In a memory pool slot.
    Pool(SlotHandle),
}

/// Owning handle to a `T` created through
/// [`ObjectLifecycle`](crate::lifecycle::ObjectLifecycle).
///
/// Not `Clone`: passing the handle to `destroy` or `take` consumes it, so
/// the same object cannot be destroyed twice through safe code.
#[must_use = "dropping an object handle leaks the object until the lifecycle is dropped"]
pub struct ObjectHandle<T> {
    raw: RawHandle,
    marker: PhantomData<fn() -> T>,
}

impl<T: PoolObject> ObjectHandle<T> {
    pub(crate) fn new(raw: RawHandle) -> Self {
        Self {
            raw,
            marker: PhantomData,
        }
    }

    /// Kind of the object.
    pub fn kind(&self) -> StructureKind {
        T::KIND
    }

    /// The untyped location.
    pub fn raw(&self) -> RawHandle {
        self.raw
    }

    /// Whether the object lives in a memory pool.
    pub fn is_pooled(&self) -> bool {
        matches!(self.raw, RawHandle::Pool(_))
    }

    pub(crate) fn into_raw(self) -> RawHandle {
        self.raw
    }
}

impl<T: PoolObject> fmt::Debug for ObjectHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("kind", &T::KIND)
            .field("raw", &self.raw)
            .finish()
    }
}

impl<T> PartialEq for ObjectHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for ObjectHandle<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shader;
    impl PoolObject for Shader {
        const KIND: StructureKind = StructureKind::Shader;
    }

    #[test]
    fn slot_handle_display() {
        let h = SlotHandle::new(StructureKind::Shader, BindingId(2), 5, 1);
        assert_eq!(h.to_string(), "SlotHandle(shader, binding=2, slot=5, gen=1)");
    }

    #[test]
    fn object_handle_reports_kind_and_location() {
        let h: ObjectHandle<Shader> = ObjectHandle::new(RawHandle::Heap(ObjectId(3)));
        assert_eq!(h.kind(), StructureKind::Shader);
        assert!(!h.is_pooled());
        assert_eq!(h.into_raw(), RawHandle::Heap(ObjectId(3)));
    }
}
