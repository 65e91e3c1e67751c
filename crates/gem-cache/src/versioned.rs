//! Single-key documents with a version counter.
//!
//! Every write bumps the stored version. A [`VersionedStore`] remembers the
//! last version it read or wrote; if the stored version has moved past that
//! point when it writes again, someone else wrote in between. The write still
//! goes through (last write wins) but the caller is told via
//! [`WriteOutcome::Overwrote`].

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{Cache, CacheError};

/// Envelope stored under the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// Monotonic write counter, starting at 1.
    pub version: u64,
    /// Unix timestamp of the write.
    pub updated_at: u64,
    /// The payload.
    pub data: T,
}

/// Result of a [`VersionedStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nobody else wrote since our last read/write.
    Written {
        /// Version now stored.
        version: u64,
    },
    /// Another writer had stored `found` after we last saw `expected`; their
    /// data was replaced.
    Overwrote {
        /// Version now stored.
        version: u64,
        /// Version this handle expected to find.
        expected: u64,
        /// Version actually found.
        found: u64,
    },
}

impl WriteOutcome {
    /// Version stored by this write.
    pub fn version(&self) -> u64 {
        match self {
            WriteOutcome::Written { version } | WriteOutcome::Overwrote { version, .. } => *version,
        }
    }

    /// Whether another writer's data was replaced.
    pub fn is_conflict(&self) -> bool {
        matches!(self, WriteOutcome::Overwrote { .. })
    }
}

/// Versioned access to one key of a [`Cache`].
///
/// The version check in [`save`](Self::save) reads then writes without a
/// lock. Two handles that both read version N and save at the same moment
/// both store N + 1, and neither sees a conflict. Detection covers writes
/// that land between one handle's load and its next save, not
/// simultaneous saves.
#[derive(Debug)]
pub struct VersionedStore<T> {
    cache: Cache,
    key: String,
    seen: u64,
    _phantom: PhantomData<T>,
}

impl<T> VersionedStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a store to `key`. Nothing is read until [`load`](Self::load).
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
            seen: 0,
            _phantom: PhantomData,
        }
    }

    /// The key this store writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last version this handle read or wrote (0 if none).
    pub fn seen_version(&self) -> u64 {
        self.seen
    }

    /// Version currently stored (0 if the key is empty).
    ///
    /// A document that no longer parses counts as version 0.
    pub fn stored_version(&self) -> Result<u64, CacheError> {
        match self.cache.get::<Versioned<serde_json::Value>>(&self.key) {
            Ok(envelope) => Ok(envelope.map(|v| v.version).unwrap_or(0)),
            Err(CacheError::SerializeError(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Load the stored payload and remember its version.
    ///
    /// If the envelope parses but the payload does not, the envelope's
    /// version is still remembered so the next save replaces it cleanly.
    pub fn load(&mut self) -> Result<Option<T>, CacheError> {
        match self.cache.get::<Versioned<T>>(&self.key) {
            Ok(Some(envelope)) => {
                self.seen = envelope.version;
                Ok(Some(envelope.data))
            }
            Ok(None) => {
                self.seen = 0;
                Ok(None)
            }
            Err(e @ CacheError::SerializeError(_)) => {
                self.seen = self.stored_version()?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Write `data`, bumping the version.
    pub fn save(&mut self, data: &T) -> Result<WriteOutcome, CacheError> {
        let found = self.stored_version()?;
        let version = found.max(self.seen) + 1;

        let envelope = Versioned {
            version,
            updated_at: current_timestamp(),
            data,
        };
        self.cache.set(&self.key, &envelope)?;

        let outcome = if found > self.seen {
            tracing::warn!(
                key = %self.key,
                expected = self.seen,
                found,
                "overwrote a newer version written by another handle"
            );
            WriteOutcome::Overwrote {
                version,
                expected: self.seen,
                found,
            }
        } else {
            WriteOutcome::Written { version }
        };

        self.seen = version;
        Ok(outcome)
    }

    /// Remove the key entirely.
    pub fn delete(&mut self) -> Result<(), CacheError> {
        self.cache.delete(&self.key)?;
        self.seen = 0;
        Ok(())
    }
}

fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;

    fn shared_pair() -> (VersionedStore<Vec<u32>>, VersionedStore<Vec<u32>>) {
        let backend = MemoryBackend::new();
        (
            VersionedStore::new(Cache::new(backend.clone()), "items"),
            VersionedStore::new(Cache::new(backend), "items"),
        )
    }

    #[test]
    fn test_first_write_is_version_one() {
        let mut store = VersionedStore::<Vec<u32>>::new(Cache::memory(), "items");
        assert_eq!(store.save(&vec![1]).unwrap(), WriteOutcome::Written { version: 1 });
        assert_eq!(store.seen_version(), 1);
        assert_eq!(store.save(&vec![1, 2]).unwrap(), WriteOutcome::Written { version: 2 });
    }

    #[test]
    fn test_load_remembers_version() {
        let (mut a, mut b) = shared_pair();
        a.save(&vec![1]).unwrap();
        a.save(&vec![1, 2]).unwrap();

        assert_eq!(b.load().unwrap(), Some(vec![1, 2]));
        assert_eq!(b.seen_version(), 2);
        assert_eq!(b.save(&vec![3]).unwrap(), WriteOutcome::Written { version: 3 });
    }

    #[test]
    fn test_stale_writer_is_reported() {
        let (mut a, mut b) = shared_pair();
        a.load().unwrap();
        b.load().unwrap();

        a.save(&vec![1]).unwrap();
        let outcome = b.save(&vec![2]).unwrap();

        assert_eq!(
            outcome,
            WriteOutcome::Overwrote {
                version: 2,
                expected: 0,
                found: 1
            }
        );
        assert!(outcome.is_conflict());
        // Last write wins.
        assert_eq!(a.load().unwrap(), Some(vec![2]));
    }

    #[test]
    fn test_delete_resets() {
        let mut store = VersionedStore::<Vec<u32>>::new(Cache::memory(), "items");
        store.save(&vec![1]).unwrap();
        store.delete().unwrap();
        assert_eq!(store.seen_version(), 0);
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.stored_version().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_document_counts_as_empty_version() {
        let backend = MemoryBackend::new();
        crate::KvBackend::set(&backend, "items", b"{broken").unwrap();
        let mut store = VersionedStore::<Vec<u32>>::new(Cache::new(backend), "items");

        assert!(store.load().is_err());
        assert_eq!(store.stored_version().unwrap(), 0);
        assert_eq!(store.save(&vec![]).unwrap(), WriteOutcome::Written { version: 1 });
    }

    #[test]
    fn test_unreadable_payload_keeps_envelope_version() {
        let backend = MemoryBackend::new();
        crate::KvBackend::set(
            &backend,
            "items",
            br#"{"version": 4, "updated_at": 1, "data": "garbage"}"#,
        )
        .unwrap();
        let mut store = VersionedStore::<Vec<u32>>::new(Cache::new(backend), "items");

        assert!(matches!(store.load(), Err(CacheError::SerializeError(_))));
        assert_eq!(store.seen_version(), 4);
        assert_eq!(store.save(&vec![1]).unwrap(), WriteOutcome::Written { version: 5 });
    }
}
