//! Cache-friendly containers used by the Tessera object storage layer.
//!
//! Every container here keeps its elements in one contiguous buffer and
//! links them by integer index instead of by pointer:
//!
//! ```text
//! GrowableArray<T>            contiguous buffer, geometric growth
//! ├── IndexedList<T>          doubly linked nodes inside one GrowableArray
//! │   └── IndexedQueue<T>     FIFO facade over IndexedList
//! └── IntKeyHashMap<K, T>     open addressing, chains threaded in-array
//! ```
//!
//! Growth aborts on allocation failure, like the standard collections.
//! [`GrowableArray::try_reserve`] is the fallible escape hatch.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod growable;
pub mod hash;
pub mod hashmap;
pub mod list;
pub mod queue;

pub use error::CollectionError;
pub use growable::GrowableArray;
pub use hash::{IntKey, KeyHash, SplitMix64};
pub use hashmap::IntKeyHashMap;
pub use list::{IndexedList, NodeId};
pub use queue::IndexedQueue;
