//! Storage error types.

use thiserror::Error;

/// Errors that can occur when reading or writing client-side storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store could not be reached (no window, private mode, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Writing the value would exceed the store's capacity.
    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// Failed to serialize a value before writing it.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A stored value could not be decoded into the requested type.
    #[error("Corrupt value under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure in a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend-specific failure.
    #[error("Store operation failed: {0}")]
    Backend(String),
}

impl StorageError {
    /// Whether the failure means the store is full rather than broken.
    pub fn is_quota(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }

    /// Whether the stored bytes exist but could not be decoded.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Corrupt { .. })
    }
}
