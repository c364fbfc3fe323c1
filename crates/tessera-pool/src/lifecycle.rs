//! The object lifecycle facade.
//!
//! [`ObjectLifecycle`] is what engine subsystems call instead of direct
//! heap allocation. The allocation strategy is chosen once from the
//! [`LifecycleConfig`] and fixed for the lifecycle's lifetime; call sites
//! are identical in both modes.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info};

use tessera_core::{PoolObject, StructureKind};

use crate::config::{AllocMode, LifecycleConfig};
use crate::error::PoolError;
use crate::handle::{ObjectHandle, RawHandle};
use crate::heap::HeapAllocator;
use crate::pool::MemoryPool;
use crate::registry::StructureTypeRegistry;

/// A lifecycle shared behind the engine-boundary lock.
pub type SharedLifecycle = Arc<Mutex<ObjectLifecycle>>;

enum Strategy {
    Individual(HeapAllocator),
    Pool(MemoryPool),
}

/// Typed create/destroy for every engine object, in either allocation
/// mode.
///
/// Callers own the returned handles and must destroy objects explicitly.
/// Objects still live when the lifecycle is dropped are reported as leaks
/// and then dropped.
///
/// ```
/// use tessera_core::{PoolObject, StructureKind};
/// use tessera_pool::{LifecycleConfig, ObjectLifecycle, StructureTypeRegistry};
///
/// struct Socket {
///     port: u16,
/// }
///
/// impl PoolObject for Socket {
///     const KIND: StructureKind = StructureKind::Socket;
/// }
///
/// let registry = StructureTypeRegistry::new().with::<Socket>().unwrap();
/// let config = LifecycleConfig::pool().with_base(StructureKind::Socket, 4);
/// let mut lifecycle = ObjectLifecycle::new(&config, registry).unwrap();
///
/// let socket = lifecycle.create(Socket { port: 8080 }).unwrap();
/// assert_eq!(lifecycle.get(&socket).unwrap().port, 8080);
/// assert_eq!(lifecycle.live_objects(StructureKind::Socket), 1);
///
/// lifecycle.destroy(socket).unwrap();
/// assert_eq!(lifecycle.live_objects(StructureKind::Socket), 0);
/// ```
pub struct ObjectLifecycle {
    strategy: Strategy,
    live: [usize; StructureKind::COUNT],
}

impl ObjectLifecycle {
    /// Validate `config` and set up the chosen strategy.
    ///
    /// `registry` is only consulted in pool mode. A rejected config is
    /// logged before the error is returned.
    pub fn new(
        config: &LifecycleConfig,
        registry: StructureTypeRegistry,
    ) -> Result<Self, PoolError> {
        if let Err(e) = config.validate() {
            error!(error = %e, "lifecycle config rejected");
            return Err(e.into());
        }
        let strategy = match config.mode {
            AllocMode::Individual => {
                info!(mode = "individual", "object lifecycle ready");
                Strategy::Individual(HeapAllocator::new())
            }
            AllocMode::Pool => {
                let pool = MemoryPool::new(registry, config)?;
                info!(
                    mode = "pool",
                    base_bytes = pool.base_size(),
                    "object lifecycle ready"
                );
                Strategy::Pool(pool)
            }
        };
        Ok(Self {
            strategy,
            live: [0; StructureKind::COUNT],
        })
    }

    /// Move the lifecycle behind an `Arc<Mutex<_>>`.
    pub fn into_shared(self) -> SharedLifecycle {
        Arc::new(Mutex::new(self))
    }

    /// The allocation mode in effect.
    pub fn mode(&self) -> AllocMode {
        match self.strategy {
            Strategy::Individual(_) => AllocMode::Individual,
            Strategy::Pool(_) => AllocMode::Pool,
        }
    }

    /// The memory pool, in pool mode.
    pub fn pool(&self) -> Option<&MemoryPool> {
        match &self.strategy {
            Strategy::Pool(pool) => Some(pool),
            Strategy::Individual(_) => None,
        }
    }

    /// Objects of `kind` created and not yet destroyed.
    pub fn live_objects(&self, kind: StructureKind) -> usize {
        self.live[kind.index()]
    }

    /// Objects of every kind created and not yet destroyed.
    pub fn total_live(&self) -> usize {
        self.live.iter().sum()
    }

    /// Store `value` and return an owning handle.
    pub fn create<T: PoolObject>(&mut self, value: T) -> Result<ObjectHandle<T>, PoolError> {
        let raw = match &mut self.strategy {
            Strategy::Individual(heap) => RawHandle::Heap(heap.insert(value)),
            Strategy::Pool(pool) => RawHandle::Pool(pool.create(value)?),
        };
        self.live[T::KIND.index()] += 1;
        Ok(ObjectHandle::new(raw))
    }

    /// Store `T::default()`.
    pub fn create_default<T: PoolObject + Default>(
        &mut self,
    ) -> Result<ObjectHandle<T>, PoolError> {
        self.create(T::default())
    }

    /// Move the object out and release its storage.
    pub fn take<T: PoolObject>(&mut self, handle: ObjectHandle<T>) -> Result<T, PoolError> {
        let value = match (&mut self.strategy, handle.into_raw()) {
            (Strategy::Individual(heap), RawHandle::Heap(id)) => heap.take::<T>(id)?,
            (Strategy::Pool(pool), RawHandle::Pool(slot)) => pool.take::<T>(slot)?,
            _ => return Err(PoolError::InvalidHandle { kind: T::KIND }),
        };
        self.live[T::KIND.index()] -= 1;
        Ok(value)
    }

    /// Drop the object and release its storage.
    pub fn destroy<T: PoolObject>(&mut self, handle: ObjectHandle<T>) -> Result<(), PoolError> {
        self.take(handle).map(drop)
    }

    /// Borrow an object.
    pub fn get<T: PoolObject>(&self, handle: &ObjectHandle<T>) -> Result<&T, PoolError> {
        match (&self.strategy, handle.raw()) {
            (Strategy::Individual(heap), RawHandle::Heap(id)) => heap.get::<T>(id),
            (Strategy::Pool(pool), RawHandle::Pool(slot)) => pool.get::<T>(&slot),
            _ => Err(PoolError::InvalidHandle { kind: T::KIND }),
        }
    }

    /// Mutably borrow an object.
    pub fn get_mut<T: PoolObject>(
        &mut self,
        handle: &ObjectHandle<T>,
    ) -> Result<&mut T, PoolError> {
        match (&mut self.strategy, handle.raw()) {
            (Strategy::Individual(heap), RawHandle::Heap(id)) => heap.get_mut::<T>(id),
            (Strategy::Pool(pool), RawHandle::Pool(slot)) => pool.get_mut::<T>(&slot),
            _ => Err(PoolError::InvalidHandle { kind: T::KIND }),
        }
    }
}

impl Drop for ObjectLifecycle {
    fn drop(&mut self) {
        for kind in StructureKind::ALL {
            let count = self.live[kind.index()];
            if count > 0 {
                error!(%kind, count, "objects still live at teardown");
            }
        }
    }
}

impl std::fmt::Debug for ObjectLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectLifecycle")
            .field("mode", &self.mode())
            .field("live", &self.total_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Log {
        lines: Vec<String>,
    }
    impl PoolObject for Log {
        const KIND: StructureKind = StructureKind::Logger;
    }

    #[derive(Debug, Default, PartialEq)]
    struct Tex(u32);
    impl PoolObject for Tex {
        const KIND: StructureKind = StructureKind::Texture;
    }

    fn registry() -> StructureTypeRegistry {
        StructureTypeRegistry::new().with::<Log>().unwrap()
    }

    fn exercise(lifecycle: &mut ObjectLifecycle) {
        let log = lifecycle.create_default::<Log>().unwrap();
        lifecycle
            .get_mut(&log)
            .unwrap()
            .lines
            .push("hello".to_owned());
        assert_eq!(lifecycle.get(&log).unwrap().lines, vec!["hello"]);
        assert_eq!(lifecycle.live_objects(StructureKind::Logger), 1);
        let taken = lifecycle.take(log).unwrap();
        assert_eq!(taken.lines.len(), 1);
        assert_eq!(lifecycle.total_live(), 0);
    }

    #[test]
    fn same_calls_work_in_both_modes() {
        let mut individual = ObjectLifecycle::new(&LifecycleConfig::individual(), registry()).unwrap();
        assert_eq!(individual.mode(), AllocMode::Individual);
        assert!(individual.pool().is_none());
        exercise(&mut individual);

        let mut pooled = ObjectLifecycle::new(&LifecycleConfig::pool(), registry()).unwrap();
        assert_eq!(pooled.mode(), AllocMode::Pool);
        assert!(pooled.pool().is_some());
        exercise(&mut pooled);
    }

    #[test]
    fn individual_mode_accepts_unregistered_kinds() {
        let mut lifecycle =
            ObjectLifecycle::new(&LifecycleConfig::individual(), StructureTypeRegistry::new())
                .unwrap();
        let tex = lifecycle.create(Tex(7)).unwrap();
        assert!(!tex.is_pooled());
        lifecycle.destroy(tex).unwrap();
    }

    #[test]
    fn pool_mode_rejects_unregistered_kinds_without_counting() {
        let mut lifecycle = ObjectLifecycle::new(&LifecycleConfig::pool(), registry()).unwrap();
        assert_eq!(
            lifecycle.create(Tex(1)).unwrap_err(),
            PoolError::UnregisteredKind {
                kind: StructureKind::Texture
            }
        );
        assert_eq!(lifecycle.live_objects(StructureKind::Texture), 0);
    }

    #[test]
    fn zero_reservation_fails_creation_in_pool_mode_only() {
        let config = LifecycleConfig::pool().with_base(StructureKind::Logger, 0);
        assert!(matches!(
            ObjectLifecycle::new(&config, registry()),
            Err(PoolError::Config(_))
        ));
        let config = LifecycleConfig::individual().with_base(StructureKind::Logger, 0);
        assert!(ObjectLifecycle::new(&config, registry()).is_ok());
    }

    #[test]
    fn shared_lifecycle_locks() {
        let shared = ObjectLifecycle::new(&LifecycleConfig::pool(), registry())
            .unwrap()
            .into_shared();
        let handle = {
            let mut guard = shared.lock();
            guard.create(Log::default()).unwrap()
        };
        let worker = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || shared.lock().destroy(handle).unwrap())
        };
        worker.join().unwrap();
        assert_eq!(shared.lock().total_live(), 0);
    }

    #[test]
    fn leaked_objects_are_dropped_at_teardown() {
        let mut lifecycle = ObjectLifecycle::new(&LifecycleConfig::pool(), registry()).unwrap();
        let _leak = lifecycle.create(Log::default()).unwrap();
        assert_eq!(lifecycle.total_live(), 1);
        drop(lifecycle);
    }
}
