//! Pool and lifecycle error types.

use thiserror::Error;

use tessera_core::{BindingId, ObjectId, StructureKind};

use crate::config::ConfigError;

/// Errors returned by the registry, the memory pool and the lifecycle
/// facade.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Pool mode was asked to store a kind no type was registered for.
    #[error("no type registered for structure kind {kind}")]
    UnregisteredKind {
        /// The unregistered kind.
        kind: StructureKind,
    },
    /// The kind is registered to a different Rust type.
    #[error("structure kind {kind} stores {registered}, not {requested}")]
    TypeMismatch {
        /// The kind in question.
        kind: StructureKind,
        /// Type name recorded at registration.
        registered: &'static str,
        /// Type name the caller used.
        requested: &'static str,
    },
    /// A second, different type was registered for a kind.
    #[error("structure kind {kind} is already registered to {existing}")]
    DuplicateRegistration {
        /// The kind in question.
        kind: StructureKind,
        /// Type name already registered.
        existing: &'static str,
    },
    /// The type needs stricter alignment than memory blocks provide.
    #[error("{type_name} needs {align}-byte alignment, blocks provide {max}")]
    UnsupportedAlignment {
        /// The offending type.
        type_name: &'static str,
        /// Alignment the type requires.
        align: usize,
        /// Alignment blocks are allocated with.
        max: usize,
    },
    /// A reservation is too large to address or allocate.
    #[error("reservation of {count} slots for {kind} is too large")]
    CapacityOverflow {
        /// The kind in question.
        kind: StructureKind,
        /// The requested slot count.
        count: u64,
    },
    /// The handle's slot was freed and possibly reused since it was issued.
    #[error("stale handle for {kind}: slot {slot} of binding {binding} is at generation {current}, handle has {handle}")]
    StaleHandle {
        /// The handle's kind.
        kind: StructureKind,
        /// Binding the slot belongs to.
        binding: BindingId,
        /// Slot index within the binding.
        slot: u32,
        /// Generation recorded in the handle.
        handle: u32,
        /// Current generation of the slot.
        current: u32,
    },
    /// The handle does not address any slot of this pool.
    #[error("handle for {kind} does not address a slot in this pool")]
    InvalidHandle {
        /// The handle's kind.
        kind: StructureKind,
    },
    /// No individually allocated object has this id.
    #[error("no live object with id {id}")]
    UnknownObject {
        /// The missing id.
        id: ObjectId,
    },
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
