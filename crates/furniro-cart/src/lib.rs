//! Shared cart and wishlist state for the Furniro storefront.
//!
//! One [`CartStore`] per shopping session holds the cart and the wishlist,
//! persists them through any [`KeyValueStore`](furniro_storage::KeyValueStore)
//! backend and tells subscribers about every change:
//!
//! - **Item model**: [`ItemSnapshot`], [`CartItem`], [`WishlistItem`]
//! - **Store**: mutations, counts and subtotal ([`CartStore`], [`CartHandle`])
//! - **Persistence**: [`PersistenceAdapter`], degrading to memory on failure
//! - **Notification**: [`Notifier`] and [`Subscription`]
//!
//! # Example
//!
//! ```
//! use furniro_cart::prelude::*;
//! use furniro_storage::MemoryStore;
//!
//! let cart = CartHandle::open(MemoryStore::new(), CartConfig::default());
//!
//! let badge = cart.subscribe(|_event, summary| {
//!     println!("cart: {} items, {}", summary.item_count, summary.subtotal);
//! });
//!
//! let lamp = ItemSnapshot::new("p1", "Lamp", 49.99, None, Currency::USD).unwrap();
//! cart.add_to_cart(&lamp, 2).unwrap();
//! cart.add_to_cart(&lamp, 3).unwrap();
//!
//! assert_eq!(cart.count_all_items(), 5);
//! assert_eq!(cart.cart_subtotal().display(), "$249.95");
//! badge.unsubscribe();
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod handle;
pub mod ids;
pub mod item;
pub mod money;
pub mod notify;
pub mod persistence;
pub mod state;
pub mod store;

pub use catalog::ProductRecord;
pub use config::CartConfig;
pub use error::{CartError, ValidationError};
pub use event::{CartEvent, CartSummary};
pub use handle::{CartHandle, WeakCartHandle};
pub use ids::ProductId;
pub use item::{CartItem, ItemSnapshot, WishlistItem};
pub use money::{Currency, Money};
pub use notify::{Notifier, Subscription, SubscriptionId};
pub use persistence::{PersistenceAdapter, PersistenceStatus, PersistenceWarning};
pub use state::CartState;
pub use store::CartStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::ProductRecord;
    pub use crate::config::CartConfig;
    pub use crate::error::{CartError, ValidationError};
    pub use crate::event::{CartEvent, CartSummary};
    pub use crate::handle::{CartHandle, WeakCartHandle};
    pub use crate::ids::ProductId;
    pub use crate::item::{CartItem, ItemSnapshot, WishlistItem};
    pub use crate::money::{Currency, Money};
    pub use crate::notify::Subscription;
    pub use crate::persistence::{PersistenceStatus, PersistenceWarning};
    pub use crate::store::CartStore;
}
