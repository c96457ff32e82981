//! Type-safe client-side key-value storage for the Furniro storefront.
//!
//! A small [`KeyValueStore`] trait with three backends:
//!
//! - [`MemoryStore`]: shared in-memory map, optionally bounded by a byte quota
//! - [`FileStore`]: one file per key, for native builds and tooling
//! - `LocalStorage`: the browser's `window.localStorage` (wasm32 only)
//!
//! [`Cache`] layers JSON (de)serialization on top of any backend.
//!
//! # Example
//!
//! ```
//! use furniro_storage::{Cache, MemoryStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cart {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("furniro:cart", &Cart { items: vec!["p1".into()] }).unwrap();
//!
//! let cart: Option<Cart> = cache.get("furniro:cart").unwrap();
//! assert_eq!(cart.unwrap().items.len(), 1);
//! ```

mod backend;
mod error;
mod file;
mod kv;
#[cfg(target_arch = "wasm32")]
mod web;

pub use backend::{KeyValueStore, MemoryStore};
pub use error::StorageError;
pub use file::FileStore;
pub use kv::Cache;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, FileStore, KeyValueStore, MemoryStore, StorageError};
}
