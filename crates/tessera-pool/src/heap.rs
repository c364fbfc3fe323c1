//! Individual allocation mode.
//!
//! Every object is boxed on the general heap and tracked by a sequential
//! [`ObjectId`]. No registration or reservation is needed.

use std::any::{type_name, Any};

use tessera_collections::IntKeyHashMap;
use tessera_core::{ObjectId, PoolObject, StructureKind};

use crate::error::PoolError;

struct HeapObject {
    kind: StructureKind,
    type_name: &'static str,
    value: Box<dyn Any + Send>,
}

/// One heap allocation per object.
#[derive(Default)]
pub struct HeapAllocator {
    objects: IntKeyHashMap<u64, HeapObject>,
    next_id: u64,
}

impl HeapAllocator {
    /// An allocator with no objects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no object is live.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Box `value` and return its id.
    pub fn insert<T: PoolObject>(&mut self, value: T) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(
            id.0,
            HeapObject {
                kind: T::KIND,
                type_name: type_name::<T>(),
                value: Box::new(value),
            },
        );
        id
    }

    fn object<T: PoolObject>(&self, id: ObjectId) -> Result<&HeapObject, PoolError> {
        let object = self
            .objects
            .get(id.0)
            .ok_or(PoolError::UnknownObject { id })?;
        if object.kind != T::KIND || !object.value.is::<T>() {
            return Err(PoolError::TypeMismatch {
                kind: object.kind,
                registered: object.type_name,
                requested: type_name::<T>(),
            });
        }
        Ok(object)
    }

    /// Borrow a live object.
    pub fn get<T: PoolObject>(&self, id: ObjectId) -> Result<&T, PoolError> {
        let object = self.object::<T>(id)?;
        Ok(object
            .value
            .downcast_ref::<T>()
            .expect("type checked by object()"))
    }

    /// Mutably borrow a live object.
    pub fn get_mut<T: PoolObject>(&mut self, id: ObjectId) -> Result<&mut T, PoolError> {
        self.object::<T>(id)?;
        let object = self
            .objects
            .get_mut(id.0)
            .ok_or(PoolError::UnknownObject { id })?;
        Ok(object
            .value
            .downcast_mut::<T>()
            .expect("type checked by object()"))
    }

    /// Remove an object, returning it unboxed.
    pub fn take<T: PoolObject>(&mut self, id: ObjectId) -> Result<T, PoolError> {
        self.object::<T>(id)?;
        let object = self
            .objects
            .remove(id.0)
            .ok_or(PoolError::UnknownObject { id })?;
        let value = object
            .value
            .downcast::<T>()
            .unwrap_or_else(|_| unreachable!("type checked by object()"));
        Ok(*value)
    }
}

impl std::fmt::Debug for HeapAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapAllocator")
            .field("live", &self.objects.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Sock {
        port: u16,
    }
    impl PoolObject for Sock {
        const KIND: StructureKind = StructureKind::Socket;
    }

    #[derive(Debug)]
    struct Snd;
    impl PoolObject for Snd {
        const KIND: StructureKind = StructureKind::Sound;
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut heap = HeapAllocator::new();
        let a = heap.insert(Sock { port: 1 });
        let b = heap.insert(Sock { port: 2 });
        assert_eq!((a, b), (ObjectId(0), ObjectId(1)));
        heap.take::<Sock>(a).unwrap();
        assert_eq!(heap.insert(Sock { port: 3 }), ObjectId(2));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn get_take_and_mutate() {
        let mut heap = HeapAllocator::new();
        let id = heap.insert(Sock { port: 80 });
        heap.get_mut::<Sock>(id).unwrap().port = 443;
        assert_eq!(heap.get::<Sock>(id).unwrap().port, 443);
        assert_eq!(heap.take::<Sock>(id).unwrap(), Sock { port: 443 });
        assert_eq!(
            heap.get::<Sock>(id).unwrap_err(),
            PoolError::UnknownObject { id }
        );
        assert!(heap.is_empty());
    }

    #[test]
    fn wrong_type_is_rejected_without_removing() {
        let mut heap = HeapAllocator::new();
        let id = heap.insert(Sock { port: 1 });
        assert!(matches!(
            heap.take::<Snd>(id),
            Err(PoolError::TypeMismatch {
                kind: StructureKind::Socket,
                ..
            })
        ));
        assert_eq!(heap.len(), 1);
    }
}
