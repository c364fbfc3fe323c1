//! Typed object storage for engine subsystems.
//!
//! Subsystems create and destroy their objects through an
//! [`ObjectLifecycle`], which picks one allocation strategy at startup:
//!
//! ```text
//! ObjectLifecycle
//! ├── Individual → HeapAllocator (one Box per object)
//! └── Pool       → MemoryPool
//!     ├── StructureTypeRegistry (size, alignment, drop glue per kind)
//!     ├── base MemoryBlock      (every kind's base reservation, packed)
//!     └── per-kind chain of MemorySlotBindings
//!         └── overflow MemoryBlocks, allocated one at a time on demand
//! ```
//!
//! This crate contains the workspace's only `unsafe` code, confined to
//! `raw.rs` and to the `MemoryPool` methods that call into it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod binding;
pub mod block;
pub mod config;
pub mod error;
pub mod handle;
pub mod heap;
pub mod lifecycle;
pub mod pool;
mod raw;
pub mod registry;

pub use config::{AllocMode, ConfigError, LifecycleConfig, Reservation};
pub use error::PoolError;
pub use handle::{ObjectHandle, RawHandle, SlotHandle};
pub use lifecycle::{ObjectLifecycle, SharedLifecycle};
pub use pool::{KindStats, MemoryPool};
pub use registry::{StructureRow, StructureTypeInfo, StructureTypeRegistry};
