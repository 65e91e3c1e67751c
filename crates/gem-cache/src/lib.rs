//! Versioned key-value persistence for gemstore.
//!
//! Values are stored as JSON documents behind a [`KvBackend`]. Three backends
//! ship with the crate:
//!
//! - [`MemoryBackend`]: process-local map, cloneable so several handles can
//!   share (and race on) the same data
//! - [`FileBackend`]: one JSON file per key inside a directory
//! - `SpinBackend`: Spin's Key-Value Store (wasm32 only)
//!
//! [`VersionedStore`] layers a version counter on top of a single key so that
//! concurrent writers are detected instead of silently overwriting each other.
//!
//! # Example
//!
//! ```rust
//! use gem_cache::{Cache, VersionedStore, WriteOutcome};
//!
//! let cache = Cache::memory();
//! let mut store = VersionedStore::<Vec<String>>::new(cache, "wishlist");
//!
//! let outcome = store.save(&vec!["ring-1".to_string()]).unwrap();
//! assert_eq!(outcome, WriteOutcome::Written { version: 1 });
//!
//! let items = store.load().unwrap().unwrap_or_default();
//! assert_eq!(items.len(), 1);
//! ```

mod backend;
mod error;
mod kv;
mod versioned;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
#[cfg(target_arch = "wasm32")]
pub use backend::SpinBackend;
pub use error::CacheError;
pub use kv::Cache;
pub use versioned::{Versioned, VersionedStore, WriteOutcome};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvBackend, VersionedStore, WriteOutcome};
}
