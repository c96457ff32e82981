//! Persistence across sessions over the file backend.

use std::cell::Cell;
use std::rc::Rc;

use furniro_cart::prelude::*;
use furniro_cart::PersistenceAdapter;
use furniro_storage::{FileStore, KeyValueStore, MemoryStore};

fn product(id: &str, price: f64) -> ItemSnapshot {
    ItemSnapshot::new(id, format!("Product {}", id), price, Some(format!("{}.png", id)), Currency::USD)
        .unwrap()
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let before = {
        let cart = CartHandle::open(FileStore::open(dir.path()).unwrap(), CartConfig::default());
        cart.add_to_cart(&product("sofa", 250.0), 2).unwrap();
        cart.add_to_cart(&product("lamp", 49.99), 1).unwrap();
        cart.toggle_wishlist(&product("rug", 80.5)).unwrap();
        cart.snapshot()
    };

    let cart = CartHandle::open(FileStore::open(dir.path()).unwrap(), CartConfig::default());
    assert_eq!(cart.snapshot(), before);
    assert_eq!(cart.count_all_items(), 3);
    assert_eq!(cart.cart_subtotal().display(), "$549.99");
    assert_eq!(cart.persistence_status(), PersistenceStatus::Durable);
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let files = FileStore::open(dir.path()).unwrap();
    files.set("furniro:cart", b"\x00\x01 definitely not json").unwrap();

    let cart = CartHandle::open(files, CartConfig::default());
    assert!(cart.list_cart().is_empty());
    assert!(cart.list_wishlist().is_empty());
    assert!(matches!(
        cart.last_warning(),
        Some(PersistenceWarning::CorruptSnapshot { .. })
    ));

    // The next mutation overwrites the bad record.
    cart.add_to_cart(&product("P1", 1.0), 1).unwrap();
    let reopened = CartHandle::open(FileStore::open(dir.path()).unwrap(), CartConfig::default());
    assert_eq!(reopened.count_all_items(), 1);
}

#[test]
fn test_storage_key_from_config() {
    let backend = MemoryStore::new();
    let config = CartConfig::new().with_storage_key("guest:cart");
    let cart = CartHandle::open(backend.clone(), config);
    cart.add_to_cart(&product("P1", 1.0), 1).unwrap();

    assert!(backend.exists("guest:cart").unwrap());
    assert!(!backend.exists("furniro:cart").unwrap());
}

#[test]
fn test_save_then_load_reproduces_entries() {
    let backend = MemoryStore::new();
    let cart = CartHandle::open(backend.clone(), CartConfig::default());
    cart.add_to_cart(&product("a", 0.1), 3).unwrap();
    cart.add_to_cart(&product("b", 0.2), 1).unwrap();
    cart.toggle_wishlist(&product("c", 1999.99)).unwrap();

    let mut adapter = PersistenceAdapter::new(backend, "furniro:cart", Currency::USD);
    assert_eq!(adapter.load(), cart.snapshot());
}

#[test]
fn test_quota_exceeded_degrades_without_losing_mutations() {
    let backend = MemoryStore::new();
    let cart = CartHandle::open(backend.clone(), CartConfig::default());
    cart.add_to_cart(&product("P1", 1.0), 1).unwrap();
    assert_eq!(cart.persistence_status(), PersistenceStatus::Durable);

    backend.set_quota(Some(backend.used_bytes()));
    let notified = Rc::new(Cell::new(0));
    let n = notified.clone();
    let _sub = cart.subscribe(move |_, _| n.set(n.get() + 1));

    cart.add_to_cart(&product("P2", 2.0), 5).unwrap();
    assert_eq!(cart.count_all_items(), 6);
    assert_eq!(notified.get(), 1);
    assert_eq!(cart.persistence_status(), PersistenceStatus::MemoryOnly);

    // Further mutations keep working in memory.
    cart.remove_from_cart(&ProductId::new("P1"));
    assert_eq!(cart.count_all_items(), 5);
    assert_eq!(notified.get(), 2);

    // The durable copy still holds the last successful save.
    let other_session = CartHandle::open(backend, CartConfig::default());
    assert_eq!(other_session.count_all_items(), 1);
}
