//! Round-trip tests for the SQLite cart storage.

use std::sync::Arc;

use vitrine_core::{Cart, Product, ProductId, Rating};
use vitrine_store::{CartSnapshot, CartStorage, SqliteCartStorage, Store};

fn test_product(id: u64, price: f64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("product {id}"),
        price,
        description: "round trip".to_string(),
        category: "misc".to_string(),
        image: format!("https://img.example/{id}.png"),
        rating: Rating {
            rate: 4.5,
            count: 12,
        },
    }
}

#[tokio::test]
async fn snapshot_round_trips_through_sqlite() {
    let storage = SqliteCartStorage::in_memory().await.unwrap();

    let mut cart = Cart::new();
    cart.add(test_product(1, 19.99));
    cart.add(test_product(1, 19.99));
    cart.add(test_product(2, 5.25));

    let snapshot = CartSnapshot::new(cart);
    storage.save(&snapshot).await.unwrap();

    let loaded = storage.load().await.unwrap().unwrap();
    assert_eq!(loaded.cart, snapshot.cart);
    assert_eq!(loaded.version, snapshot.version);
}

#[tokio::test]
async fn fresh_database_loads_as_none() {
    let storage = SqliteCartStorage::in_memory().await.unwrap();
    assert!(storage.load().await.unwrap().is_none());
}

#[tokio::test]
async fn save_overwrites_the_single_record() {
    let storage = SqliteCartStorage::in_memory().await.unwrap();

    let mut first = Cart::new();
    first.add(test_product(1, 1.0));
    storage.save(&CartSnapshot::new(first)).await.unwrap();

    let mut second = Cart::new();
    second.add(test_product(2, 2.0));
    second.add(test_product(3, 3.0));
    storage.save(&CartSnapshot::new(second.clone())).await.unwrap();

    let loaded = storage.load().await.unwrap().unwrap();
    assert_eq!(loaded.cart, second);
}

#[tokio::test]
async fn store_rehydrates_from_sqlite() {
    let storage = Arc::new(SqliteCartStorage::in_memory().await.unwrap());

    let first = Store::new(storage.clone());
    first.add_to_cart(test_product(1, 19.99)).await;
    first.add_to_cart(test_product(2, 5.25)).await;
    let lines_before = first.cart_lines();
    drop(first);

    let second = Store::new(storage);
    second.rehydrate().await;

    assert_eq!(second.cart_lines(), lines_before);
}
