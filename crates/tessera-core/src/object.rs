//! The trait that ties a Rust type to a structure kind.

use crate::kind::StructureKind;

/// A type whose instances are created and destroyed through the object
/// lifecycle instead of direct heap calls.
///
/// Each engine subsystem implements this for its object type (window,
/// shader, socket, ...). The pool keys storage by [`PoolObject::KIND`]
/// and accepts exactly one registered Rust type per kind.
///
/// `Send + 'static` is required because pooled objects live in raw memory
/// blocks owned by a context that may be moved behind a lock and shared
/// across threads.
///
/// ```
/// use tessera_core::{PoolObject, StructureKind};
///
/// struct Window {
///     width: u32,
///     height: u32,
/// }
///
/// impl PoolObject for Window {
///     const KIND: StructureKind = StructureKind::Window;
/// }
///
/// assert_eq!(Window::KIND.name(), "window");
/// ```
pub trait PoolObject: Send + 'static {
    /// The structure kind this type is stored under.
    const KIND: StructureKind;
}
