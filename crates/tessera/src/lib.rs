//! Tessera: pool-backed object storage and index-linked containers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tessera sub-crates. For most users, adding `tessera` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! struct Window {
//!     title: String,
//! }
//!
//! impl PoolObject for Window {
//!     const KIND: StructureKind = StructureKind::Window;
//! }
//!
//! // Two windows fit in the base block; the third grows an overflow block.
//! let config = LifecycleConfig::pool()
//!     .with_base(StructureKind::Window, 2)
//!     .with_overflow(StructureKind::Window, 4);
//! let registry = StructureTypeRegistry::new().with::<Window>().unwrap();
//! let mut lifecycle = ObjectLifecycle::new(&config, registry).unwrap();
//!
//! let handles: Vec<_> = ["a", "b", "c"]
//!     .into_iter()
//!     .map(|t| lifecycle.create(Window { title: t.into() }).unwrap())
//!     .collect();
//! assert_eq!(lifecycle.get(&handles[2]).unwrap().title, "c");
//!
//! let pool = lifecycle.pool().unwrap();
//! assert_eq!(pool.stats(StructureKind::Window).unwrap().overflow_blocks, 1);
//!
//! for handle in handles {
//!     lifecycle.destroy(handle).unwrap();
//! }
//! assert_eq!(lifecycle.total_live(), 0);
//!
//! // The containers are usable on their own.
//! let mut names: IntKeyHashMap<u32, &str> = IntKeyHashMap::new();
//! names.insert(7, "seven");
//! assert_eq!(names.get(7), Some(&"seven"));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | Structure kinds, `PoolObject`, ids |
//! | [`collections`] | `tessera-collections` | Growable array, indexed list and queue, integer-key hash map |
//! | [`pool`] | `tessera-pool` | Config, registry, memory pool, lifecycle facade |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`tessera-core`).
///
/// Contains [`types::StructureKind`], the [`types::PoolObject`] trait, and
/// the identifiers carried by handles.
pub use tessera_core as types;

/// Index-linked containers (`tessera-collections`).
///
/// [`collections::GrowableArray`], [`collections::IndexedList`],
/// [`collections::IndexedQueue`], and [`collections::IntKeyHashMap`].
pub use tessera_collections as collections;

/// Object storage (`tessera-pool`).
///
/// [`pool::ObjectLifecycle`] is the entry point; [`pool::MemoryPool`] is
/// the pool-mode backend it drives.
pub use tessera_pool as pool;

/// Common imports for typical Tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tessera_core::{BindingId, ObjectId, PoolObject, StructureKind};

    // Containers
    pub use tessera_collections::{
        GrowableArray, IndexedList, IndexedQueue, IntKeyHashMap, NodeId,
    };

    // Errors
    pub use tessera_collections::CollectionError;
    pub use tessera_pool::{ConfigError, PoolError};

    // Storage
    pub use tessera_pool::{
        AllocMode, LifecycleConfig, ObjectHandle, ObjectLifecycle, Reservation,
        SharedLifecycle, StructureTypeRegistry,
    };
}
