//! Shared handle to a [`CartStore`].

use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use furniro_storage::KeyValueStore;

use crate::config::CartConfig;
use crate::store::CartStore;

/// Cloneable handle to one session's store.
///
/// Every view that shows the cart (header badge, product page, cart page)
/// holds a clone; they all see the same state. Dereferences to
/// [`CartStore`].
pub struct CartHandle<S> {
    inner: Rc<CartStore<S>>,
}

impl<S: KeyValueStore> CartHandle<S> {
    /// Open a store over `backend` and wrap it.
    pub fn open(backend: S, config: CartConfig) -> Self {
        Self::from_store(CartStore::open(backend, config))
    }
}

impl<S> CartHandle<S> {
    pub fn from_store(store: CartStore<S>) -> Self {
        Self {
            inner: Rc::new(store),
        }
    }

    /// A non-owning handle, for capture inside listeners.
    pub fn downgrade(&self) -> WeakCartHandle<S> {
        WeakCartHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles point at the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S> Clone for CartHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> Deref for CartHandle<S> {
    type Target = CartStore<S>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S> fmt::Debug for CartHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

/// Weak counterpart of [`CartHandle`].
pub struct WeakCartHandle<S> {
    inner: Weak<CartStore<S>>,
}

impl<S> WeakCartHandle<S> {
    /// The store, if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<CartHandle<S>> {
        self.inner.upgrade().map(|inner| CartHandle { inner })
    }
}

impl<S> Clone for WeakCartHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for WeakCartHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakCartHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use furniro_storage::MemoryStore;

    use crate::ids::ProductId;
    use crate::item::ItemSnapshot;
    use crate::money::Currency;

    fn sofa() -> ItemSnapshot {
        ItemSnapshot::new("sofa", "Sofa", 100.0, None, Currency::USD).unwrap()
    }

    #[test]
    fn test_clones_share_state() {
        let header = CartHandle::open(MemoryStore::new(), CartConfig::default());
        let page = header.clone();

        page.add_to_cart(&sofa(), 2).unwrap();
        assert_eq!(header.count_all_items(), 2);
        assert!(header.ptr_eq(&page));
    }

    #[test]
    fn test_weak_handle_does_not_keep_store_alive() {
        let handle = CartHandle::open(MemoryStore::new(), CartConfig::default());
        let weak = handle.downgrade();
        assert!(weak.upgrade().is_some());

        drop(handle);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_listener_mutation_is_delivered_after_round() {
        let handle = CartHandle::open(MemoryStore::new(), CartConfig::default());
        let weak = handle.downgrade();
        let rounds = Rc::new(Cell::new(0));

        // Removing a product from the wishlist when it lands in the cart.
        let r = rounds.clone();
        let _sub = handle.subscribe(move |event, _| {
            r.set(r.get() + 1);
            if let crate::CartEvent::CartItemAdded { product_id, .. } = event {
                if let Some(store) = weak.upgrade() {
                    if store.is_in_wishlist(product_id) {
                        store.toggle_wishlist(&sofa()).unwrap();
                    }
                }
            }
        });

        handle.toggle_wishlist(&sofa()).unwrap();
        handle.add_to_cart(&sofa(), 1).unwrap();

        assert_eq!(rounds.get(), 3);
        assert!(!handle.is_in_wishlist(&ProductId::new("sofa")));
        assert!(handle.is_in_cart(&ProductId::new("sofa")));
    }
}
