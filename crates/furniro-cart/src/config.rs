//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::money::Currency;

/// Default storage key for the persisted snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "furniro:cart";

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Currency all prices are held in.
    #[serde(default)]
    pub currency: Currency,

    /// Upper bound on a single cart entry's quantity. `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_quantity_per_item: Option<u32>,
}

fn default_storage_key() -> String {
    furniro_storage::storage_key!("furniro", "cart")
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            currency: Currency::default(),
            max_quantity_per_item: None,
        }
    }
}

impl CartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the snapshot under `key`.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Price everything in `currency`.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Cap each cart entry at `max` units. A cap of 0 behaves as 1.
    pub fn with_max_quantity(mut self, max: u32) -> Self {
        self.max_quantity_per_item = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "furniro:cart");
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.max_quantity_per_item, None);
    }

    #[test]
    fn test_builder() {
        let config = CartConfig::new()
            .with_storage_key("shop:cart")
            .with_currency(Currency::PKR)
            .with_max_quantity(10);
        assert_eq!(config.storage_key, "shop:cart");
        assert_eq!(config.currency, Currency::PKR);
        assert_eq!(config.max_quantity_per_item, Some(10));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CartConfig = serde_json::from_str(r#"{"currency": "EUR"}"#).unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.currency, Currency::EUR);
        assert!(config.max_quantity_per_item.is_none());
    }
}
