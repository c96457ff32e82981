//! The cart and wishlist store.

use std::cell::{Ref, RefCell};
use std::fmt;

use tracing::debug;

use furniro_storage::KeyValueStore;

use crate::catalog::ProductRecord;
use crate::config::CartConfig;
use crate::error::{CartError, ValidationError};
use crate::event::{CartEvent, CartSummary};
use crate::ids::ProductId;
use crate::item::{CartItem, ItemSnapshot, WishlistItem};
use crate::money::{Currency, Money};
use crate::notify::{Notifier, Subscription};
use crate::persistence::{PersistenceAdapter, PersistenceStatus, PersistenceWarning};
use crate::state::CartState;

/// Owns the cart and wishlist for one shopping session.
///
/// Every mutation runs to completion in three steps: the in-memory state is
/// updated, the snapshot is saved, then subscribers are notified. Methods
/// take `&self`; listeners may read the store or mutate it again, and a
/// mutation from inside a listener is delivered as its own round after the
/// current one.
///
/// Mutations return `true` when observable state changed. A call that
/// changes nothing (an unknown id, a quantity already at its value) neither
/// saves nor notifies.
pub struct CartStore<S> {
    state: RefCell<CartState>,
    persistence: RefCell<PersistenceAdapter<S>>,
    notifier: Notifier,
    config: CartConfig,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open a store over `backend`, restoring the last saved snapshot.
    ///
    /// A missing or corrupt snapshot yields an empty store.
    pub fn open(backend: S, config: CartConfig) -> Self {
        let mut persistence =
            PersistenceAdapter::new(backend, config.storage_key.clone(), config.currency);
        let state = persistence.load();
        debug!(
            key = %config.storage_key,
            cart = state.cart_unique_count(),
            wishlist = state.count_wishlist_items(),
            "cart store opened"
        );

        Self {
            state: RefCell::new(state),
            persistence: RefCell::new(persistence),
            notifier: Notifier::new(),
            config,
        }
    }

    // ---- Mutations ----

    /// Add `quantity` units of a product, inserting it if absent.
    ///
    /// `quantity` below 1 counts as 1. An entry already in the cart keeps
    /// the snapshot it was first added with.
    pub fn add_to_cart(&self, item: &ItemSnapshot, quantity: i64) -> Result<bool, CartError> {
        self.check_snapshot(item)?;
        let cap = self.config.max_quantity_per_item;
        let event = self.state.borrow_mut().add_to_cart(item, quantity, cap);
        debug!(product_id = %item.product_id, quantity, changed = event.is_some(), "add to cart");
        Ok(self.commit(event))
    }

    /// Snapshot a content-store product at its list price and add it.
    pub fn add_product_to_cart(&self, product: &ProductRecord, quantity: i64) -> Result<bool, CartError> {
        let snapshot = ItemSnapshot::from_product(product, self.currency())?;
        self.add_to_cart(&snapshot, quantity)
    }

    /// Remove a product from the cart. Unknown ids are a no-op.
    pub fn remove_from_cart(&self, product_id: &ProductId) -> bool {
        let event = self.state.borrow_mut().remove_from_cart(product_id);
        debug!(%product_id, changed = event.is_some(), "remove from cart");
        self.commit(event)
    }

    /// Set an exact quantity. `quantity <= 0` is the same as
    /// [`remove_from_cart`](Self::remove_from_cart).
    pub fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> bool {
        let cap = self.config.max_quantity_per_item;
        let event = self.state.borrow_mut().set_quantity(product_id, quantity, cap);
        debug!(%product_id, quantity, changed = event.is_some(), "set quantity");
        self.commit(event)
    }

    /// Add the product to the wishlist if absent, remove it if present.
    ///
    /// Returns whether the product is in the wishlist afterwards.
    pub fn toggle_wishlist(&self, item: &ItemSnapshot) -> Result<bool, CartError> {
        self.check_snapshot(item)?;
        let event = self.state.borrow_mut().toggle_wishlist(item);
        let added = matches!(event, CartEvent::WishlistAdded { .. });
        debug!(product_id = %item.product_id, added, "toggle wishlist");
        self.commit(Some(event));
        Ok(added)
    }

    /// Toggle a content-store product in the wishlist.
    pub fn toggle_product_in_wishlist(&self, product: &ProductRecord) -> Result<bool, CartError> {
        let snapshot = ItemSnapshot::from_product(product, self.currency())?;
        self.toggle_wishlist(&snapshot)
    }

    /// Move a wishlist entry into the cart as one unit.
    ///
    /// Increments the cart entry if the product is already there. Returns
    /// `false` if the product is not in the wishlist.
    pub fn move_wishlist_to_cart(&self, product_id: &ProductId) -> bool {
        let cap = self.config.max_quantity_per_item;
        let event = self.state.borrow_mut().move_to_cart(product_id, cap);
        debug!(%product_id, changed = event.is_some(), "move wishlist entry to cart");
        self.commit(event)
    }

    pub fn clear_cart(&self) -> bool {
        let event = self.state.borrow_mut().clear_cart();
        debug!(changed = event.is_some(), "clear cart");
        self.commit(event)
    }

    pub fn clear_wishlist(&self) -> bool {
        let event = self.state.borrow_mut().clear_wishlist();
        debug!(changed = event.is_some(), "clear wishlist");
        self.commit(event)
    }

    /// Re-read the persisted snapshot, replacing the in-memory state.
    ///
    /// A missing, corrupt or foreign-currency record empties the store. If
    /// the backend cannot be read the current state is kept and the failure
    /// is recorded as the last warning. Notifies with [`CartEvent::Reset`]
    /// only if the state differs.
    pub fn reload(&self) -> bool {
        let loaded = match self.persistence.borrow_mut().try_load() {
            Ok(loaded) => loaded.unwrap_or_else(|| CartState::new(self.config.currency)),
            Err(warning) => {
                debug!(%warning, "reload skipped, keeping current cart");
                return false;
            }
        };
        let changed = *self.state.borrow() != loaded;
        if !changed {
            return false;
        }

        let summary = loaded.summary();
        *self.state.borrow_mut() = loaded;
        debug!("cart reloaded from storage");
        self.notifier.notify(CartEvent::Reset, summary);
        true
    }

    // ---- Queries ----

    /// Sum of quantities across the cart.
    pub fn count_all_items(&self) -> u64 {
        self.state.borrow().count_all_items()
    }

    /// Number of wishlist entries.
    pub fn count_wishlist_items(&self) -> usize {
        self.state.borrow().count_wishlist_items()
    }

    /// Number of distinct products in the cart.
    pub fn cart_unique_count(&self) -> usize {
        self.state.borrow().cart_unique_count()
    }

    pub fn cart_subtotal(&self) -> Money {
        self.state.borrow().cart_subtotal()
    }

    /// Cart entries in insertion order.
    pub fn list_cart(&self) -> Vec<CartItem> {
        self.state.borrow().cart().to_vec()
    }

    /// Wishlist entries in insertion order.
    pub fn list_wishlist(&self) -> Vec<WishlistItem> {
        self.state.borrow().wishlist().to_vec()
    }

    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.state.borrow().is_in_cart(product_id)
    }

    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.state.borrow().is_in_wishlist(product_id)
    }

    pub fn cart_quantity(&self, product_id: &ProductId) -> Option<u32> {
        self.state.borrow().cart_quantity(product_id)
    }

    pub fn summary(&self) -> CartSummary {
        self.state.borrow().summary()
    }

    /// A copy of the whole state.
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Borrow the state for a batch of reads.
    ///
    /// Do not hold the borrow across a mutation.
    pub fn state(&self) -> Ref<'_, CartState> {
        self.state.borrow()
    }

    pub fn currency(&self) -> Currency {
        self.config.currency
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    // ---- Subscriptions and persistence ----

    /// Register a listener for completed mutations.
    ///
    /// The listener is called after the mutation has been saved. To reach
    /// the store from inside a listener, capture a
    /// [`WeakCartHandle`](crate::WeakCartHandle) rather than a strong one.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&CartEvent, &CartSummary) + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.listener_count()
    }

    /// Whether saves still reach durable storage.
    pub fn persistence_status(&self) -> PersistenceStatus {
        self.persistence.borrow().status()
    }

    /// The most recent storage problem, if any.
    pub fn last_warning(&self) -> Option<PersistenceWarning> {
        self.persistence.borrow().last_warning().cloned()
    }

    fn check_snapshot(&self, item: &ItemSnapshot) -> Result<(), CartError> {
        if item.product_id.is_blank() {
            return Err(ValidationError::MissingProductId.into());
        }
        if item.unit_price.currency != self.config.currency {
            return Err(CartError::CurrencyMismatch {
                expected: self.config.currency,
                got: item.unit_price.currency,
            });
        }
        if item.unit_price.is_negative() || !item.unit_price.is_decimal_exact() {
            return Err(ValidationError::InvalidPrice {
                product_id: item.product_id.to_string(),
                price: item.unit_price.to_decimal(),
            }
            .into());
        }
        Ok(())
    }

    /// Save and notify after a state change. No borrow is held while
    /// listeners run.
    fn commit(&self, event: Option<CartEvent>) -> bool {
        let Some(event) = event else {
            return false;
        };

        let summary = {
            let state = self.state.borrow();
            if let Err(warning) = self.persistence.borrow_mut().save(&state) {
                debug!(%warning, "mutation kept in memory only");
            }
            state.summary()
        };
        self.notifier.notify(event, summary);
        true
    }
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("notifier", &self.notifier)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use furniro_storage::{MemoryStore, StorageError};

    fn store() -> CartStore<MemoryStore> {
        CartStore::open(MemoryStore::new(), CartConfig::default())
    }

    fn item(id: &str, price: f64) -> ItemSnapshot {
        ItemSnapshot::new(id, format!("Product {}", id), price, None, Currency::USD).unwrap()
    }

    #[test]
    fn test_add_then_readd_accumulates() {
        let store = store();
        let p1 = item("P1", 49.99);

        assert!(store.add_to_cart(&p1, 2).unwrap());
        assert!(store.add_to_cart(&p1, 3).unwrap());

        let cart = store.list_cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 5);
        assert_eq!(store.count_all_items(), 5);
        assert_eq!(store.cart_subtotal().display(), "$249.95");
    }

    #[test]
    fn test_mutations_are_saved() {
        let backend = MemoryStore::new();
        let store = CartStore::open(backend.clone(), CartConfig::default());
        store.add_to_cart(&item("P1", 10.0), 2).unwrap();
        store.toggle_wishlist(&item("P2", 5.0)).unwrap();

        let reopened = CartStore::open(backend, CartConfig::default());
        assert_eq!(reopened.snapshot(), store.snapshot());
    }

    #[test]
    fn test_rejects_foreign_currency() {
        let store = store();
        let euro = ItemSnapshot::new("P1", "Chair", 10.0, None, Currency::EUR).unwrap();

        let err = store.add_to_cart(&euro, 1).unwrap_err();
        assert_eq!(
            err,
            CartError::CurrencyMismatch {
                expected: Currency::USD,
                got: Currency::EUR,
            }
        );
        assert!(store.list_cart().is_empty());
    }

    #[test]
    fn test_rejects_hand_built_bad_snapshot() {
        let store = store();
        let mut bad = item("P1", 10.0);
        bad.product_id = ProductId::new("");
        assert_eq!(
            store.add_to_cart(&bad, 1).unwrap_err(),
            CartError::Validation(ValidationError::MissingProductId)
        );

        let mut negative = item("P2", 10.0);
        negative.unit_price = Money::new(-100, Currency::USD);
        assert!(matches!(
            store.toggle_wishlist(&negative),
            Err(CartError::Validation(ValidationError::InvalidPrice { .. }))
        ));

        let mut huge = item("P3", 10.0);
        huge.unit_price = Money::new(9_876_543_210_987_654, Currency::USD);
        assert!(matches!(
            store.add_to_cart(&huge, 1),
            Err(CartError::Validation(ValidationError::InvalidPrice { .. }))
        ));
        assert!(store.list_cart().is_empty());
    }

    #[test]
    fn test_large_prices_survive_reopen() {
        let backend = MemoryStore::new();
        let store = CartStore::open(backend.clone(), CartConfig::default());
        store.add_to_cart(&item("P1", 9876543210987.65), 1).unwrap();
        store.add_to_cart(&item("P2", 4503599627370.49), 2).unwrap();
        store.toggle_wishlist(&item("P3", 11258999068426.24)).unwrap();

        let reopened = CartStore::open(backend, CartConfig::default());
        assert_eq!(reopened.snapshot(), store.snapshot());
        assert_eq!(reopened.cart_subtotal(), store.cart_subtotal());
    }

    #[test]
    fn test_add_product_record() {
        let store = store();
        let product = ProductRecord::new("sofa", "Asgaard Sofa", 250.0).with_discount(10.0);

        store.add_product_to_cart(&product, 1).unwrap();
        assert!(store.is_in_cart(&ProductId::new("sofa")));
        assert_eq!(store.cart_subtotal(), Money::new(25000, Currency::USD));

        assert!(store.toggle_product_in_wishlist(&product).unwrap());
        assert!(store.is_in_wishlist(&ProductId::new("sofa")));
    }

    #[test]
    fn test_noop_does_not_notify() {
        let store = store();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = store.subscribe(move |_, _| c.set(c.get() + 1));

        assert!(!store.remove_from_cart(&ProductId::new("missing")));
        assert!(!store.set_quantity(&ProductId::new("missing"), 3));
        assert!(!store.clear_cart());
        assert!(!store.clear_wishlist());
        assert!(!store.move_wishlist_to_cart(&ProductId::new("missing")));
        assert_eq!(calls.get(), 0);

        store.add_to_cart(&item("P1", 1.0), 2).unwrap();
        assert!(!store.set_quantity(&ProductId::new("P1"), 2));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_listener_sees_saved_state() {
        let backend = MemoryStore::new();
        let store = CartStore::open(backend.clone(), CartConfig::default());
        let seen = Rc::new(Cell::new(false));

        let s = seen.clone();
        let _sub = store.subscribe(move |event, summary| {
            assert!(matches!(event, CartEvent::CartItemAdded { .. }));
            assert_eq!(summary.item_count, 3);
            // The snapshot is already written when listeners run.
            assert!(backend.exists("furniro:cart").unwrap());
            s.set(true);
        });

        store.add_to_cart(&item("P1", 2.0), 3).unwrap();
        assert!(seen.get());
    }

    #[test]
    fn test_quantity_cap_from_config() {
        let store = CartStore::open(MemoryStore::new(), CartConfig::new().with_max_quantity(3));
        let p1 = item("P1", 1.0);

        store.add_to_cart(&p1, 2).unwrap();
        store.add_to_cart(&p1, 5).unwrap();
        assert_eq!(store.cart_quantity(&p1.product_id), Some(3));

        assert!(!store.set_quantity(&p1.product_id, 99));
        assert_eq!(store.cart_quantity(&p1.product_id), Some(3));
    }

    #[test]
    fn test_move_wishlist_to_cart() {
        let store = store();
        let p1 = item("P1", 3.0);
        store.toggle_wishlist(&p1).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let e = events.clone();
        let _sub = store.subscribe(move |event, _| e.borrow_mut().push(event.clone()));

        assert!(store.move_wishlist_to_cart(&p1.product_id));
        assert!(!store.is_in_wishlist(&p1.product_id));
        assert_eq!(store.cart_quantity(&p1.product_id), Some(1));
        assert_eq!(
            *events.borrow(),
            vec![CartEvent::MovedToCart {
                product_id: p1.product_id.clone(),
                quantity: 1,
            }]
        );
    }

    #[test]
    fn test_reload_picks_up_external_write() {
        let backend = MemoryStore::new();
        let tab_a = CartStore::open(backend.clone(), CartConfig::default());
        let tab_b = CartStore::open(backend, CartConfig::default());

        let resets = Rc::new(Cell::new(0));
        let r = resets.clone();
        let _sub = tab_a.subscribe(move |event, _| {
            if *event == CartEvent::Reset {
                r.set(r.get() + 1);
            }
        });

        tab_b.add_to_cart(&item("P1", 1.0), 4).unwrap();
        assert!(tab_a.reload());
        assert_eq!(tab_a.count_all_items(), 4);
        assert!(!tab_a.reload());
        assert_eq!(resets.get(), 1);
    }

    /// Fails every read while `failing` is set.
    #[derive(Clone)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            if self.failing.get() {
                return Err(StorageError::Backend("EIO".into()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), StorageError> {
            self.inner.delete(key)
        }

        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.inner.keys()
        }
    }

    #[test]
    fn test_reload_read_failure_keeps_cart() {
        let backend = FlakyStore {
            inner: MemoryStore::new(),
            failing: Rc::new(Cell::new(false)),
        };
        let store = CartStore::open(backend.clone(), CartConfig::default());
        let resets = Rc::new(Cell::new(0));
        let r = resets.clone();
        let _sub = store.subscribe(move |event, _| {
            if *event == CartEvent::Reset {
                r.set(r.get() + 1);
            }
        });

        store.add_to_cart(&item("P1", 1.0), 3).unwrap();
        backend.failing.set(true);
        assert!(!store.reload());
        assert_eq!(store.count_all_items(), 3);
        assert_eq!(resets.get(), 0);
        assert!(matches!(
            store.last_warning(),
            Some(PersistenceWarning::ReadFailed { .. })
        ));
        assert_eq!(store.persistence_status(), PersistenceStatus::Durable);

        backend.failing.set(false);
        store.add_to_cart(&item("P2", 1.0), 1).unwrap();
        assert_eq!(store.count_all_items(), 4);

        let reopened = CartStore::open(backend, CartConfig::default());
        assert_eq!(reopened.count_all_items(), 4);
        assert_eq!(reopened.cart_quantity(&ProductId::new("P1")), Some(3));
    }

    #[test]
    fn test_open_in_other_currency_starts_empty() {
        let backend = MemoryStore::new();
        let store = CartStore::open(backend.clone(), CartConfig::default());
        store.add_to_cart(&item("P1", 1.0), 2).unwrap();

        let euro = CartStore::open(backend, CartConfig::new().with_currency(Currency::EUR));
        assert!(euro.list_cart().is_empty());
        assert!(matches!(
            euro.last_warning(),
            Some(PersistenceWarning::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_storage_failure_keeps_mutation() {
        let backend = MemoryStore::with_quota(8);
        let store = CartStore::open(backend, CartConfig::default());
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = store.subscribe(move |_, _| c.set(c.get() + 1));

        assert!(store.add_to_cart(&item("P1", 1.0), 1).unwrap());
        assert_eq!(store.count_all_items(), 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(store.persistence_status(), PersistenceStatus::MemoryOnly);
        assert!(matches!(
            store.last_warning(),
            Some(PersistenceWarning::WriteFailed { .. })
        ));

        // Memory-only reload sees the latest state, so nothing changes.
        assert!(!store.reload());
        assert_eq!(store.count_all_items(), 1);
    }
}
