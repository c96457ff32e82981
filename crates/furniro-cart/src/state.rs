//! Cart and wishlist collections with their derived aggregates.

use serde::Serialize;

use crate::event::{CartEvent, CartSummary};
use crate::ids::ProductId;
use crate::item::{CartItem, ItemSnapshot, WishlistItem};
use crate::money::{Currency, Money};

/// The two collections the shopper has built up.
///
/// Invariants held by every method:
/// - at most one entry per product in each collection
/// - every cart quantity is at least 1
/// - entries stay in insertion order
///
/// Counts and subtotal are computed on demand, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartState {
    currency: Currency,
    cart: Vec<CartItem>,
    wishlist: Vec<WishlistItem>,
}

impl CartState {
    /// An empty state.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            cart: Vec::new(),
            wishlist: Vec::new(),
        }
    }

    /// Rebuild a state from untrusted entries.
    ///
    /// Later duplicates of a product, zero quantities and entries priced in
    /// another currency, below zero or beyond [`Money::MAX_EXACT_MINOR`] are
    /// dropped.
    pub fn restore(
        currency: Currency,
        cart: impl IntoIterator<Item = CartItem>,
        wishlist: impl IntoIterator<Item = WishlistItem>,
    ) -> Self {
        let mut state = Self::new(currency);
        for item in cart {
            if item.quantity == 0
                || item.unit_price.currency != currency
                || item.unit_price.is_negative()
                || !item.unit_price.is_decimal_exact()
                || item.product_id.is_blank()
                || state.cart_index(&item.product_id).is_some()
            {
                continue;
            }
            state.cart.push(item);
        }
        for item in wishlist {
            if item.unit_price.currency != currency
                || item.unit_price.is_negative()
                || !item.unit_price.is_decimal_exact()
                || item.product_id.is_blank()
                || state.wishlist_index(&item.product_id).is_some()
            {
                continue;
            }
            state.wishlist.push(item);
        }
        state
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Cart entries in insertion order.
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    /// Wishlist entries in insertion order.
    pub fn wishlist(&self) -> &[WishlistItem] {
        &self.wishlist
    }

    /// Sum of all cart quantities (an entry with quantity 3 counts 3).
    pub fn count_all_items(&self) -> u64 {
        self.cart.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of distinct products in the cart.
    pub fn cart_unique_count(&self) -> usize {
        self.cart.len()
    }

    /// Number of wishlist entries.
    pub fn count_wishlist_items(&self) -> usize {
        self.wishlist.len()
    }

    /// Sum of `unit_price * quantity` over the cart, saturating.
    pub fn cart_subtotal(&self) -> Money {
        let cents = self
            .cart
            .iter()
            .fold(0_i64, |acc, item| acc.saturating_add(item.line_total().amount_cents));
        Money::new(cents, self.currency)
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.count_all_items(),
            wishlist_count: self.count_wishlist_items(),
            subtotal: self.cart_subtotal(),
        }
    }

    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.cart_index(product_id).is_some()
    }

    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.wishlist_index(product_id).is_some()
    }

    pub fn cart_item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.cart.iter().find(|i| &i.product_id == product_id)
    }

    pub fn cart_quantity(&self, product_id: &ProductId) -> Option<u32> {
        self.cart_item(product_id).map(|i| i.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty() && self.wishlist.is_empty()
    }

    /// Insert or increment. `requested` below 1 counts as 1.
    ///
    /// An existing entry keeps its original snapshot.
    pub(crate) fn add_to_cart(
        &mut self,
        snapshot: &ItemSnapshot,
        requested: i64,
        cap: Option<u32>,
    ) -> Option<CartEvent> {
        let limit = quantity_limit(cap);
        let amount = clamp_quantity(requested.max(1));

        match self.cart_index(&snapshot.product_id) {
            Some(index) => {
                let item = &mut self.cart[index];
                let from = item.quantity;
                let to = from.saturating_add(amount).min(limit);
                if to == from {
                    return None;
                }
                item.quantity = to;
                Some(CartEvent::CartQuantityChanged {
                    product_id: item.product_id.clone(),
                    from,
                    to,
                })
            }
            None => {
                let quantity = amount.min(limit);
                self.cart.push(CartItem::new(snapshot, quantity));
                Some(CartEvent::CartItemAdded {
                    product_id: snapshot.product_id.clone(),
                    quantity,
                })
            }
        }
    }

    pub(crate) fn remove_from_cart(&mut self, product_id: &ProductId) -> Option<CartEvent> {
        let index = self.cart_index(product_id)?;
        self.cart.remove(index);
        Some(CartEvent::CartItemRemoved {
            product_id: product_id.clone(),
        })
    }

    /// Set an exact quantity; `quantity <= 0` removes the entry.
    pub(crate) fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        cap: Option<u32>,
    ) -> Option<CartEvent> {
        if quantity <= 0 {
            return self.remove_from_cart(product_id);
        }

        let index = self.cart_index(product_id)?;
        let item = &mut self.cart[index];
        let from = item.quantity;
        let to = clamp_quantity(quantity).min(quantity_limit(cap));
        if to == from {
            return None;
        }
        item.quantity = to;
        Some(CartEvent::CartQuantityChanged {
            product_id: product_id.clone(),
            from,
            to,
        })
    }

    pub(crate) fn clear_cart(&mut self) -> Option<CartEvent> {
        if self.cart.is_empty() {
            return None;
        }
        self.cart.clear();
        Some(CartEvent::CartCleared)
    }

    /// Add if absent, remove if present. Always a change.
    pub(crate) fn toggle_wishlist(&mut self, snapshot: &ItemSnapshot) -> CartEvent {
        let product_id = snapshot.product_id.clone();
        match self.wishlist_index(&product_id) {
            Some(index) => {
                self.wishlist.remove(index);
                CartEvent::WishlistRemoved { product_id }
            }
            None => {
                self.wishlist.push(WishlistItem::new(snapshot));
                CartEvent::WishlistAdded { product_id }
            }
        }
    }

    pub(crate) fn clear_wishlist(&mut self) -> Option<CartEvent> {
        if self.wishlist.is_empty() {
            return None;
        }
        self.wishlist.clear();
        Some(CartEvent::WishlistCleared)
    }

    /// Move a wishlist entry into the cart, adding one unit.
    pub(crate) fn move_to_cart(&mut self, product_id: &ProductId, cap: Option<u32>) -> Option<CartEvent> {
        let index = self.wishlist_index(product_id)?;
        let entry = self.wishlist.remove(index);
        self.add_to_cart(&entry.snapshot(), 1, cap);
        let quantity = self.cart_quantity(product_id).unwrap_or(1);
        Some(CartEvent::MovedToCart {
            product_id: product_id.clone(),
            quantity,
        })
    }

    fn cart_index(&self, product_id: &ProductId) -> Option<usize> {
        self.cart.iter().position(|i| &i.product_id == product_id)
    }

    fn wishlist_index(&self, product_id: &ProductId) -> Option<usize> {
        self.wishlist.iter().position(|i| &i.product_id == product_id)
    }
}

fn quantity_limit(cap: Option<u32>) -> u32 {
    cap.map_or(u32::MAX, |c| c.max(1))
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}
