//! Product records as delivered by the content store.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// A product as returned by a content-store query.
///
/// Only the fields the storefront actually reads are modelled. Field names
/// follow the CMS documents, and the aliases accept the raw document keys
/// (`_id`, `productImage`, the misspelt `dicountPercentage`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Stable product identifier.
    #[serde(alias = "_id", default)]
    pub product_id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// List price in major units.
    pub price: f64,
    /// Advertised discount, in percent.
    #[serde(alias = "dicountPercentage", default)]
    pub discount_percentage: f64,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the product is flagged as new.
    #[serde(default)]
    pub is_new: bool,
    /// Resolved image URL.
    #[serde(alias = "productImage", alias = "imageUrl", default)]
    pub image_ref: Option<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductRecord {
    /// Create a record with the fields the cart needs.
    pub fn new(product_id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            price,
            discount_percentage: 0.0,
            tags: Vec::new(),
            is_new: false,
            image_ref: None,
            description: None,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_discount(mut self, percent: f64) -> Self {
        self.discount_percentage = percent;
        self
    }

    pub fn id(&self) -> ProductId {
        ProductId::new(self.product_id.clone())
    }

    /// Whether a positive discount is advertised.
    pub fn has_discount(&self) -> bool {
        self.effective_discount() > 0.0
    }

    /// Price after the advertised discount.
    ///
    /// The percentage is clamped to `0..=100`; a non-finite percentage counts
    /// as no discount. Returns `None` when the list price is unusable.
    pub fn discounted_price(&self, currency: Currency) -> Option<Money> {
        let list = Money::from_decimal(self.price, currency)?;
        let off = list.percentage(self.effective_discount());
        Some(Money::new(list.amount_cents - off.amount_cents, currency))
    }

    fn effective_discount(&self) -> f64 {
        if self.discount_percentage.is_finite() {
            self.discount_percentage.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}
