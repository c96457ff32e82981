//! Browser `localStorage` backend (wasm32 only).

use crate::{KeyValueStore, StorageError};

/// Store backed by `window.localStorage`.
///
/// Values are stored as UTF-8 strings, which every JSON payload is.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the page's local storage.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.storage
            .get_item(key)
            .map(|v| v.map(String::into_bytes))
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let text = std::str::from_utf8(value)
            .map_err(|e| StorageError::Backend(format!("value is not UTF-8: {}", e)))?;
        // Browsers only fail setItem when the origin is out of space.
        self.storage
            .set_item(key, text)
            .map_err(|_| StorageError::QuotaExceeded {
                key: key.to_string(),
                needed: value.len(),
                quota: 0,
            })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let len = self
            .storage
            .length()
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Ok(Some(key)) = self.storage.key(i) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
