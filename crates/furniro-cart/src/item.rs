//! Cart and wishlist entries.

use serde::{Deserialize, Serialize};

use crate::catalog::ProductRecord;
use crate::error::ValidationError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Display data captured from a product at the moment it is added.
///
/// Decoupled from [`ProductRecord`]: later price or title edits in the
/// content store do not alter entries the shopper already queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub image_ref: Option<String>,
}

impl ItemSnapshot {
    /// Build a snapshot from raw fields.
    ///
    /// Fails if `product_id` is blank or `price` is not a finite,
    /// non-negative number small enough to store exactly.
    pub fn new(
        product_id: impl Into<ProductId>,
        title: impl Into<String>,
        price: f64,
        image_ref: Option<String>,
        currency: Currency,
    ) -> Result<Self, ValidationError> {
        let product_id = product_id.into();
        if product_id.is_blank() {
            return Err(ValidationError::MissingProductId);
        }

        let unit_price = Money::from_decimal(price, currency)
            .filter(|_| price >= 0.0)
            .ok_or_else(|| ValidationError::InvalidPrice {
                product_id: product_id.to_string(),
                price,
            })?;

        Ok(Self {
            product_id,
            title: title.into(),
            unit_price,
            image_ref,
        })
    }

    /// Snapshot a content-store product at its list price.
    pub fn from_product(product: &ProductRecord, currency: Currency) -> Result<Self, ValidationError> {
        Self::new(
            product.id(),
            product.title.clone(),
            product.price,
            product.image_ref.clone(),
            currency,
        )
    }
}

/// One row of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub image_ref: Option<String>,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    pub(crate) fn new(snapshot: &ItemSnapshot, quantity: u32) -> Self {
        Self {
            product_id: snapshot.product_id.clone(),
            title: snapshot.title.clone(),
            unit_price: snapshot.unit_price,
            image_ref: snapshot.image_ref.clone(),
            quantity,
        }
    }

    /// `unit_price * quantity`, saturating.
    pub fn line_total(&self) -> Money {
        self.unit_price.saturating_multiply(i64::from(self.quantity))
    }
}

/// One row of the wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub image_ref: Option<String>,
}

impl WishlistItem {
    pub(crate) fn new(snapshot: &ItemSnapshot) -> Self {
        Self {
            product_id: snapshot.product_id.clone(),
            title: snapshot.title.clone(),
            unit_price: snapshot.unit_price,
            image_ref: snapshot.image_ref.clone(),
        }
    }

    /// The snapshot this entry was captured from.
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            product_id: self.product_id.clone(),
            title: self.title.clone(),
            unit_price: self.unit_price,
            image_ref: self.image_ref.clone(),
        }
    }
}
