//! Cart error types.

use thiserror::Error;

use crate::money::Currency;

/// Malformed product input rejected before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The product has no usable identifier.
    #[error("Product id is missing")]
    MissingProductId,

    /// The price is negative, NaN, infinite or too large to represent.
    #[error("Invalid price for {product_id}: {price}")]
    InvalidPrice { product_id: String, price: f64 },
}

/// Errors returned by store mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    /// The item input was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The item was priced in a different currency than the store.
    #[error("Currency mismatch: store uses {expected}, item is priced in {got}")]
    CurrencyMismatch { expected: Currency, got: Currency },
}
