//! End-to-end behavior of the cart store over an in-memory backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use furniro_cart::prelude::*;
use furniro_storage::MemoryStore;

fn open() -> CartHandle<MemoryStore> {
    CartHandle::open(MemoryStore::new(), CartConfig::default())
}

fn product(id: &str, price: f64) -> ItemSnapshot {
    ItemSnapshot::new(id, format!("Product {}", id), price, None, Currency::USD).unwrap()
}

#[test]
fn test_readd_merges_into_one_entry() {
    let cart = open();
    let p1 = product("P1", 49.99);

    cart.add_to_cart(&p1, 2).unwrap();
    cart.add_to_cart(&p1, 3).unwrap();

    let items = cart.list_cart();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 5);
    assert_eq!(cart.cart_subtotal(), Money::new(24995, Currency::USD));
    assert_eq!(cart.cart_subtotal().to_decimal(), 249.95);
}

#[test]
fn test_toggle_twice_leaves_wishlist_empty() {
    let cart = open();
    let p2 = product("P2", 10.0);

    assert!(cart.toggle_wishlist(&p2).unwrap());
    assert!(!cart.toggle_wishlist(&p2).unwrap());

    assert!(cart.list_wishlist().is_empty());
    assert_eq!(cart.count_wishlist_items(), 0);
}

#[test]
fn test_count_tracks_quantities_across_sequence() {
    let cart = open();
    let ids = ["a", "b", "c", "d"];

    for (step, id) in ids.iter().cycle().take(20).enumerate() {
        let item = product(id, 1.25);
        match step % 5 {
            0 | 1 => {
                cart.add_to_cart(&item, step as i64 % 4).unwrap();
            }
            2 => {
                cart.set_quantity(&item.product_id, (step % 7) as i64);
            }
            3 => {
                cart.remove_from_cart(&item.product_id);
            }
            _ => {
                cart.add_to_cart(&item, -3).unwrap();
            }
        }

        let listed: u64 = cart.list_cart().iter().map(|i| u64::from(i.quantity)).sum();
        assert_eq!(cart.count_all_items(), listed);
        assert!(cart.list_cart().iter().all(|i| i.quantity >= 1));
    }
}

#[test]
fn test_set_quantity_zero_matches_remove() {
    let build = || {
        let cart = open();
        cart.add_to_cart(&product("P1", 3.0), 2).unwrap();
        cart.add_to_cart(&product("P2", 4.0), 1).unwrap();
        cart.toggle_wishlist(&product("P3", 5.0)).unwrap();
        cart
    };

    let removed = build();
    removed.remove_from_cart(&ProductId::new("P1"));

    let zeroed = build();
    zeroed.set_quantity(&ProductId::new("P1"), 0);

    assert_eq!(removed.snapshot(), zeroed.snapshot());

    let negative = build();
    negative.set_quantity(&ProductId::new("P1"), -4);
    assert_eq!(removed.snapshot(), negative.snapshot());
}

#[test]
fn test_entries_keep_insertion_order() {
    let cart = open();
    for id in ["chair", "table", "lamp"] {
        cart.add_to_cart(&product(id, 1.0), 1).unwrap();
    }
    cart.add_to_cart(&product("chair", 1.0), 1).unwrap();

    let order: Vec<String> = cart
        .list_cart()
        .into_iter()
        .map(|i| i.product_id.into_inner())
        .collect();
    assert_eq!(order, ["chair", "table", "lamp"]);
}

#[test]
fn test_readd_keeps_first_snapshot() {
    let cart = open();
    cart.add_to_cart(&product("P1", 10.0), 1).unwrap();

    let repriced = ItemSnapshot::new("P1", "Renamed", 99.0, None, Currency::USD).unwrap();
    cart.add_to_cart(&repriced, 1).unwrap();

    let item = &cart.list_cart()[0];
    assert_eq!(item.title, "Product P1");
    assert_eq!(item.unit_price, Money::new(1000, Currency::USD));
    assert_eq!(item.quantity, 2);
}

#[test]
fn test_every_subscriber_notified_once() {
    let cart = open();
    let counts: Vec<Rc<Cell<u32>>> = (0..3).map(|_| Rc::new(Cell::new(0))).collect();
    let _subs: Vec<Subscription> = counts
        .iter()
        .map(|count| {
            let count = count.clone();
            cart.subscribe(move |_, _| count.set(count.get() + 1))
        })
        .collect();

    cart.add_to_cart(&product("P1", 1.0), 1).unwrap();

    for count in &counts {
        assert_eq!(count.get(), 1);
    }
}

#[test]
fn test_subscriber_unsubscribing_in_callback() {
    let cart = open();
    let calls = Rc::new(Cell::new(0));
    let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let c = calls.clone();
    let h = handle.clone();
    let sub = cart.subscribe(move |_, _| {
        c.set(c.get() + 1);
        if let Some(sub) = h.borrow().as_ref() {
            sub.unsubscribe();
        }
    });
    *handle.borrow_mut() = Some(sub);

    cart.add_to_cart(&product("P1", 1.0), 1).unwrap();
    cart.add_to_cart(&product("P1", 1.0), 1).unwrap();
    cart.toggle_wishlist(&product("P2", 1.0)).unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(cart.subscriber_count(), 0);
}

#[test]
fn test_notification_before_control_returns() {
    let cart = open();
    let events = Rc::new(RefCell::new(Vec::new()));
    let e = events.clone();
    let _sub = cart.subscribe(move |event, summary| {
        e.borrow_mut().push((event.clone(), summary.item_count));
    });

    cart.add_to_cart(&product("P1", 1.0), 2).unwrap();
    assert_eq!(events.borrow().len(), 1);

    cart.set_quantity(&ProductId::new("P1"), 7);
    cart.clear_cart();

    assert_eq!(
        *events.borrow(),
        vec![
            (
                CartEvent::CartItemAdded {
                    product_id: ProductId::new("P1"),
                    quantity: 2,
                },
                2
            ),
            (
                CartEvent::CartQuantityChanged {
                    product_id: ProductId::new("P1"),
                    from: 2,
                    to: 7,
                },
                7
            ),
            (CartEvent::CartCleared, 0),
        ]
    );
}

#[test]
fn test_listener_reads_store_through_weak_handle() {
    let cart = open();
    let weak = cart.downgrade();
    let seen = Rc::new(Cell::new(0u64));

    let s = seen.clone();
    let _sub = cart.subscribe(move |_, _| {
        if let Some(cart) = weak.upgrade() {
            s.set(cart.count_all_items());
        }
    });

    cart.add_to_cart(&product("P1", 1.0), 4).unwrap();
    assert_eq!(seen.get(), 4);
}
