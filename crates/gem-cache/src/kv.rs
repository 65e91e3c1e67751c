//! Typed cache with automatic JSON serialization.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::backend::{FileBackend, KvBackend, MemoryBackend};
use crate::CacheError;

/// Type-safe cache over a [`KvBackend`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
pub struct Cache {
    backend: Box<dyn KvBackend>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an arbitrary backend.
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// A fresh, private in-memory cache.
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// A cache persisted as JSON files under `dir`.
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir("~/.local/share/gem")?;
    /// ```
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        Ok(Self::new(FileBackend::open(dir)?))
    }

    /// Open the default Spin Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self::new(crate::backend::SpinBackend::open_default()?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// ```rust,ignore
    /// let cart: Option<CartStore> = cache.get("gem-cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.backend.keys()
    }
}
