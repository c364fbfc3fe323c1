//! Container error types.

use thiserror::Error;

/// Errors returned by the fallible container paths.
///
/// The infallible paths (`push_back`, `reserve`, ...) abort on allocation
/// failure instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// The allocator could not provide the requested capacity.
    #[error("allocation failed: requested capacity {requested}")]
    AllocationFailed {
        /// Element capacity that was requested.
        requested: usize,
    },
}
