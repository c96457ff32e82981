//! Change events delivered to subscribers.

use serde::Serialize;

use crate::ids::ProductId;
use crate::money::Money;

/// What a completed mutation changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartEvent {
    /// A product entered the cart.
    CartItemAdded { product_id: ProductId, quantity: u32 },
    /// An existing cart entry changed quantity.
    CartQuantityChanged {
        product_id: ProductId,
        from: u32,
        to: u32,
    },
    /// A cart entry was removed.
    CartItemRemoved { product_id: ProductId },
    /// The cart was emptied.
    CartCleared,
    /// A product entered the wishlist.
    WishlistAdded { product_id: ProductId },
    /// A product left the wishlist.
    WishlistRemoved { product_id: ProductId },
    /// The wishlist was emptied.
    WishlistCleared,
    /// A wishlist entry moved into the cart; `quantity` is the cart quantity
    /// afterwards.
    MovedToCart { product_id: ProductId, quantity: u32 },
    /// The whole state was replaced from storage.
    Reset,
}

impl CartEvent {
    /// Whether the cart collection (and so the cart badge/subtotal) changed.
    pub fn touches_cart(&self) -> bool {
        !matches!(
            self,
            CartEvent::WishlistAdded { .. }
                | CartEvent::WishlistRemoved { .. }
                | CartEvent::WishlistCleared
        )
    }

    /// Whether the wishlist collection changed.
    pub fn touches_wishlist(&self) -> bool {
        matches!(
            self,
            CartEvent::WishlistAdded { .. }
                | CartEvent::WishlistRemoved { .. }
                | CartEvent::WishlistCleared
                | CartEvent::MovedToCart { .. }
                | CartEvent::Reset
        )
    }

    /// The product the event is about, if it concerns a single product.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartEvent::CartItemAdded { product_id, .. }
            | CartEvent::CartQuantityChanged { product_id, .. }
            | CartEvent::CartItemRemoved { product_id }
            | CartEvent::WishlistAdded { product_id }
            | CartEvent::WishlistRemoved { product_id }
            | CartEvent::MovedToCart { product_id, .. } => Some(product_id),
            CartEvent::CartCleared | CartEvent::WishlistCleared | CartEvent::Reset => None,
        }
    }
}

/// Aggregates as of the mutation that produced an event.
///
/// Enough for badge counters and the subtotal line without reading the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Sum of cart quantities.
    pub item_count: u64,
    /// Number of wishlist entries.
    pub wishlist_count: usize,
    /// Sum of `unit_price * quantity`.
    pub subtotal: Money,
}
