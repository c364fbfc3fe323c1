//! Structure type registry.
//!
//! Pool mode stores objects as raw bytes, so it needs each kind's size,
//! alignment and drop glue up front. The registry records them once per
//! kind, keyed by the kind's numeric code.

use std::alloc::Layout;
use std::any::{type_name, TypeId};
use std::ptr::NonNull;

use tessera_collections::IntKeyHashMap;
use tessera_core::{PoolObject, StructureKind};

use crate::config::LifecycleConfig;
use crate::error::PoolError;
use crate::raw::{self, BLOCK_ALIGN};

/// What the pool needs to know about the Rust type stored for a kind.
#[derive(Clone, Copy, Debug)]
pub struct StructureTypeInfo {
    kind: StructureKind,
    type_name: &'static str,
    type_id: TypeId,
    layout: Layout,
    drop_fn: unsafe fn(NonNull<u8>),
}

impl StructureTypeInfo {
    /// Describe `T`.
    pub fn of<T: PoolObject>() -> Result<Self, PoolError> {
        let layout = Layout::new::<T>();
        if layout.align() > BLOCK_ALIGN {
            return Err(PoolError::UnsupportedAlignment {
                type_name: type_name::<T>(),
                align: layout.align(),
                max: BLOCK_ALIGN,
            });
        }
        Ok(Self {
            kind: T::KIND,
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            layout,
            drop_fn: raw::drop_erased::<T>,
        })
    }

    /// The kind described.
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// Name of the stored Rust type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Instance size in bytes.
    pub fn instance_size(&self) -> usize {
        self.layout.size()
    }

    /// Required alignment in bytes.
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    /// Slot stride: the instance size rounded up to its alignment.
    pub fn stride(&self) -> usize {
        self.layout.pad_to_align().size()
    }

    pub(crate) fn drop_fn(&self) -> unsafe fn(NonNull<u8>) {
        self.drop_fn
    }

    fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

/// One row of the structure table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureRow {
    /// The kind.
    pub kind: StructureKind,
    /// Name of the registered Rust type.
    pub type_name: &'static str,
    /// Instance size in bytes.
    pub instance_size: usize,
    /// Slots reserved in the base block.
    pub reserved_count: u64,
    /// Slots per overflow block.
    pub overflow_count: u64,
}

/// The set of kinds that can be pooled, with one Rust type per kind.
#[derive(Clone, Debug, Default)]
pub struct StructureTypeRegistry {
    types: IntKeyHashMap<u16, StructureTypeInfo>,
}

impl StructureTypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` for `T::KIND`.
    ///
    /// Registering the same type twice is a no-op. Registering a different
    /// type for an already registered kind fails.
    pub fn register<T: PoolObject>(&mut self) -> Result<(), PoolError> {
        let info = StructureTypeInfo::of::<T>()?;
        if let Some(existing) = self.types.get(T::KIND.code()) {
            if existing.is::<T>() {
                return Ok(());
            }
            return Err(PoolError::DuplicateRegistration {
                kind: T::KIND,
                existing: existing.type_name,
            });
        }
        self.types.insert(T::KIND.code(), info);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<T: PoolObject>(mut self) -> Result<Self, PoolError> {
        self.register::<T>()?;
        Ok(self)
    }

    /// Info for `kind`, if registered.
    pub fn get(&self, kind: StructureKind) -> Option<&StructureTypeInfo> {
        self.types.get(kind.code())
    }

    /// Whether `kind` is registered.
    pub fn contains(&self, kind: StructureKind) -> bool {
        self.types.contains_key(kind.code())
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no kind is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered kinds in discriminant order.
    pub fn kinds(&self) -> impl Iterator<Item = StructureKind> + '_ {
        StructureKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
    }

    /// Info for `T::KIND`, checked against `T`.
    pub(crate) fn check<T: PoolObject>(&self) -> Result<&StructureTypeInfo, PoolError> {
        let info = self
            .get(T::KIND)
            .ok_or(PoolError::UnregisteredKind { kind: T::KIND })?;
        if !info.is::<T>() {
            return Err(PoolError::TypeMismatch {
                kind: T::KIND,
                registered: info.type_name,
                requested: type_name::<T>(),
            });
        }
        Ok(info)
    }

    /// Size and effective reservation counts of every registered kind.
    pub fn structure_table(&self, config: &LifecycleConfig) -> Vec<StructureRow> {
        self.kinds()
            .filter_map(|kind| self.get(kind))
            .map(|info| StructureRow {
                kind: info.kind,
                type_name: info.type_name,
                instance_size: info.instance_size(),
                reserved_count: config.base_count(info.kind),
                overflow_count: config.overflow_count(info.kind),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Win {
        _w: u32,
        _h: u32,
    }
    impl PoolObject for Win {
        const KIND: StructureKind = StructureKind::Window;
    }

    struct OtherWin;
    impl PoolObject for OtherWin {
        const KIND: StructureKind = StructureKind::Window;
    }

    #[repr(align(128))]
    struct OverAligned;
    impl PoolObject for OverAligned {
        const KIND: StructureKind = StructureKind::Buffer;
    }

    struct Sock(u8);
    impl PoolObject for Sock {
        const KIND: StructureKind = StructureKind::Socket;
    }

    #[test]
    fn register_records_layout() {
        let registry = StructureTypeRegistry::new().with::<Win>().unwrap();
        let info = registry.get(StructureKind::Window).unwrap();
        assert_eq!(info.instance_size(), 8);
        assert_eq!(info.align(), 4);
        assert_eq!(info.stride(), 8);
        assert!(info.type_name().ends_with("Win"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_type_twice_is_noop() {
        let mut registry = StructureTypeRegistry::new();
        registry.register::<Win>().unwrap();
        registry.register::<Win>().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn different_type_for_same_kind_is_rejected() {
        let mut registry = StructureTypeRegistry::new();
        registry.register::<Win>().unwrap();
        let err = registry.register::<OtherWin>().unwrap_err();
        assert!(matches!(
            err,
            PoolError::DuplicateRegistration {
                kind: StructureKind::Window,
                ..
            }
        ));
    }

    #[test]
    fn over_aligned_type_is_rejected() {
        let err = StructureTypeRegistry::new()
            .with::<OverAligned>()
            .unwrap_err();
        assert!(matches!(
            err,
            PoolError::UnsupportedAlignment { align: 128, max: 64, .. }
        ));
    }

    #[test]
    fn check_distinguishes_unregistered_and_mismatch() {
        let registry = StructureTypeRegistry::new().with::<Win>().unwrap();
        assert!(registry.check::<Win>().is_ok());
        assert!(matches!(
            registry.check::<OtherWin>(),
            Err(PoolError::TypeMismatch { .. })
        ));
        assert_eq!(
            registry.check::<Sock>().unwrap_err(),
            PoolError::UnregisteredKind {
                kind: StructureKind::Socket
            }
        );
    }

    #[test]
    fn structure_table_applies_config() {
        let registry = StructureTypeRegistry::new()
            .with::<Sock>()
            .unwrap()
            .with::<Win>()
            .unwrap();
        let config = LifecycleConfig::pool()
            .with_base(StructureKind::Window, 2)
            .with_overflow(StructureKind::Socket, 5);
        let table = registry.structure_table(&config);
        assert_eq!(
            table,
            vec![
                StructureRow {
                    kind: StructureKind::Window,
                    type_name: type_name::<Win>(),
                    instance_size: 8,
                    reserved_count: 2,
                    overflow_count: 8,
                },
                StructureRow {
                    kind: StructureKind::Socket,
                    type_name: type_name::<Sock>(),
                    instance_size: 1,
                    reserved_count: 32,
                    overflow_count: 5,
                },
            ]
        );
    }
}
