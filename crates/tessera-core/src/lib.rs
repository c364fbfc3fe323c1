//! Core types and traits for the Tessera object storage layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every engine subsystem that asks Tessera for
//! storage: structure kinds, the [`PoolObject`] trait that ties a Rust
//! type to a kind, and the strongly-typed identifiers used by handles.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod kind;
pub mod object;

pub use id::{BindingId, ObjectId};
pub use kind::StructureKind;
pub use object::PoolObject;
