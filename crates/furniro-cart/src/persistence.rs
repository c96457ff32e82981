//! Persistence adapter: saves and restores the cart state.
//!
//! The stored record is a single JSON document under one key:
//!
//! ```json
//! {
//!   "currency": "USD",
//!   "cart": [{"productId": "p1", "title": "Sofa", "unitPrice": 49.99, "imageRef": "sofa.png", "quantity": 2}],
//!   "wishlist": [{"productId": "p2", "title": "Lamp", "unitPrice": 12.5, "imageRef": null}]
//! }
//! ```
//!
//! Storage failures never reach the caller as errors. A failed write flips
//! the adapter into memory-only mode for the rest of the session. A missing
//! or undecodable record, or one saved in another currency, loads as an
//! empty state. Records without a `currency` key are read in the configured
//! currency.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use furniro_storage::{Cache, KeyValueStore, StorageError};

use crate::ids::ProductId;
use crate::item::{CartItem, WishlistItem};
use crate::money::{Currency, Money};
use crate::state::CartState;

/// Non-fatal storage problem, reported through logging and
/// [`PersistenceAdapter::last_warning`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceWarning {
    /// The snapshot could not be written; the session continues in memory.
    #[error("could not save cart under {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    /// The stored record exists but is not a valid snapshot.
    #[error("ignored corrupt cart snapshot under {key}: {reason}")]
    CorruptSnapshot { key: String, reason: String },

    /// The store could not be read at all.
    #[error("could not read cart under {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    /// The stored record is priced in a different currency.
    #[error("ignored cart snapshot under {key} priced in {stored}, expected {expected}")]
    CurrencyMismatch {
        key: String,
        stored: Currency,
        expected: Currency,
    },
}

/// Whether saves currently reach durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceStatus {
    /// Writes reach the backing store.
    Durable,
    /// A write failed earlier; snapshots are only kept in memory.
    MemoryOnly,
}

/// Wire form of the stored record.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<Currency>,
    #[serde(default)]
    cart: Vec<PersistedCartItem>,
    #[serde(default)]
    wishlist: Vec<PersistedWishlistItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCartItem {
    product_id: String,
    #[serde(default)]
    title: String,
    unit_price: f64,
    #[serde(default)]
    image_ref: Option<String>,
    quantity: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedWishlistItem {
    product_id: String,
    #[serde(default)]
    title: String,
    unit_price: f64,
    #[serde(default)]
    image_ref: Option<String>,
}

impl PersistedRecord {
    fn from_state(state: &CartState) -> Self {
        Self {
            currency: Some(state.currency()),
            cart: state
                .cart()
                .iter()
                .map(|item| PersistedCartItem {
                    product_id: item.product_id.to_string(),
                    title: item.title.clone(),
                    unit_price: item.unit_price.to_decimal(),
                    image_ref: item.image_ref.clone(),
                    quantity: i64::from(item.quantity),
                })
                .collect(),
            wishlist: state
                .wishlist()
                .iter()
                .map(|item| PersistedWishlistItem {
                    product_id: item.product_id.to_string(),
                    title: item.title.clone(),
                    unit_price: item.unit_price.to_decimal(),
                    image_ref: item.image_ref.clone(),
                })
                .collect(),
        }
    }

    fn into_state(self, currency: Currency) -> CartState {
        let cart = self.cart.into_iter().filter_map(|item| {
            let quantity = u32::try_from(item.quantity).ok()?;
            Some(CartItem {
                product_id: ProductId::new(item.product_id),
                title: item.title,
                unit_price: decode_price(item.unit_price, currency)?,
                image_ref: item.image_ref,
                quantity,
            })
        });
        let wishlist = self.wishlist.into_iter().filter_map(|item| {
            Some(WishlistItem {
                product_id: ProductId::new(item.product_id),
                title: item.title,
                unit_price: decode_price(item.unit_price, currency)?,
                image_ref: item.image_ref,
            })
        });
        CartState::restore(currency, cart, wishlist)
    }
}

fn decode_price(price: f64, currency: Currency) -> Option<Money> {
    if price < 0.0 {
        return None;
    }
    Money::from_decimal(price, currency)
}

/// Saves and loads [`CartState`] snapshots through a [`KeyValueStore`].
pub struct PersistenceAdapter<S> {
    cache: Cache<S>,
    key: String,
    currency: Currency,
    status: PersistenceStatus,
    /// Latest snapshot, kept once the adapter is memory-only.
    fallback: Option<CartState>,
    last_warning: Option<PersistenceWarning>,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S, key: impl Into<String>, currency: Currency) -> Self {
        Self {
            cache: Cache::new(store),
            key: key.into(),
            currency,
            status: PersistenceStatus::Durable,
            fallback: None,
            last_warning: None,
        }
    }

    /// Write `state` as the current snapshot.
    ///
    /// On failure the adapter switches to memory-only mode, logs and records
    /// the warning, and returns it. The caller's mutation stands either way.
    pub fn save(&mut self, state: &CartState) -> Result<(), PersistenceWarning> {
        if self.status == PersistenceStatus::MemoryOnly {
            self.fallback = Some(state.clone());
            return Ok(());
        }

        match self.cache.set(&self.key, &PersistedRecord::from_state(state)) {
            Ok(()) => {
                debug!(key = %self.key, items = state.cart().len(), "cart snapshot saved");
                Ok(())
            }
            Err(e) => {
                let warning = PersistenceWarning::WriteFailed {
                    key: self.key.clone(),
                    reason: e.to_string(),
                };
                warn!(key = %self.key, error = %e, quota = e.is_quota(), "cart storage failed, continuing in memory only");
                self.status = PersistenceStatus::MemoryOnly;
                self.fallback = Some(state.clone());
                self.last_warning = Some(warning.clone());
                Err(warning)
            }
        }
    }

    /// Read the last saved snapshot, or an empty state if there is none or
    /// it cannot be used.
    pub fn load(&mut self) -> CartState {
        self.try_load()
            .ok()
            .flatten()
            .unwrap_or_else(|| CartState::new(self.currency))
    }

    /// Read the last saved snapshot.
    ///
    /// `Ok(None)` means nothing usable is stored: the key is missing, the
    /// record is corrupt or it was saved in another currency. `Err` means
    /// the store could not be read, so the caller cannot tell what it holds.
    /// Both problems are logged and recorded as the last warning.
    pub fn try_load(&mut self) -> Result<Option<CartState>, PersistenceWarning> {
        if self.status == PersistenceStatus::MemoryOnly {
            return Ok(Some(
                self.fallback
                    .clone()
                    .unwrap_or_else(|| CartState::new(self.currency)),
            ));
        }

        match self.cache.get::<PersistedRecord>(&self.key) {
            Ok(Some(record)) => match record.currency {
                Some(stored) if stored != self.currency => {
                    warn!(key = %self.key, %stored, expected = %self.currency, "ignoring cart snapshot in another currency");
                    self.last_warning = Some(PersistenceWarning::CurrencyMismatch {
                        key: self.key.clone(),
                        stored,
                        expected: self.currency,
                    });
                    Ok(None)
                }
                _ => {
                    let state = record.into_state(self.currency);
                    info!(
                        key = %self.key,
                        cart = state.cart().len(),
                        wishlist = state.wishlist().len(),
                        "cart snapshot restored"
                    );
                    Ok(Some(state))
                }
            },
            Ok(None) => Ok(None),
            Err(e @ StorageError::Corrupt { .. }) => {
                warn!(key = %self.key, error = %e, "ignoring corrupt cart snapshot");
                self.last_warning = Some(PersistenceWarning::CorruptSnapshot {
                    key: self.key.clone(),
                    reason: e.to_string(),
                });
                Ok(None)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "cart storage could not be read");
                let warning = PersistenceWarning::ReadFailed {
                    key: self.key.clone(),
                    reason: e.to_string(),
                };
                self.last_warning = Some(warning.clone());
                Err(warning)
            }
        }
    }

    pub fn status(&self) -> PersistenceStatus {
        self.status
    }

    pub fn last_warning(&self) -> Option<&PersistenceWarning> {
        self.last_warning.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        self.cache.backend()
    }
}
