//! Raw byte-level storage backends.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::StorageError;

/// A synchronous key-value store holding raw bytes.
///
/// Implementations are single-threaded and take `&self`; any mutable state
/// lives behind interior mutability, the same way a browser's `localStorage`
/// is shared by every script on the page.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write `value` under `key`, replacing anything already there.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List every key currently stored.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Check whether `key` holds a value.
    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        (**self).exists(key)
    }
}

/// In-memory store.
///
/// Clones share the same underlying map, so a second handle observes
/// everything written through the first. An optional byte quota (summed over
/// all values) reproduces the behavior of a full browser store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, Vec<u8>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes once `bytes` are in use.
    pub fn with_quota(bytes: usize) -> Self {
        let store = Self::new();
        store.inner.borrow_mut().quota = Some(bytes);
        store
    }

    /// Change the quota of an existing store.
    pub fn set_quota(&self, bytes: Option<usize>) {
        self.inner.borrow_mut().quota = bytes;
    }

    /// Total bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.inner.borrow().entries.values().map(Vec::len).sum()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Drop every entry, as when the user clears site data.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.inner.borrow().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(quota) = inner.quota {
            let replaced = inner.entries.get(key).map_or(0, Vec::len);
            let in_use: usize = inner.entries.values().map(Vec::len).sum();
            let needed = in_use - replaced + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        inner.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.inner.borrow().entries.keys().cloned().collect())
    }
}
