use rust_decimal_macros::dec;
use shoecart_rs::models::{
    Cart, UpdateProductAmount, ADD_PRODUCT_FAILED, OUT_OF_STOCK, REMOVE_PRODUCT_FAILED,
    UPDATE_AMOUNT_FAILED,
};

mod common;
use common::*;

fn amounts(cart: &Cart) -> Vec<(u64, u32)> {
    cart.items().iter().map(|item| (item.id, item.amount)).collect()
}

#[tokio::test]
async fn test_add_new_product_uses_catalog_details() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;

    test.store.add_product(3).await;

    let cart = test.store.cart();
    assert_eq!(amounts(&cart), vec![(3, 1)]);
    let item = cart.get(3).unwrap();
    assert_eq!(item.title, "Tênis Adidas Duramo Lite 2.0");
    assert_eq!(item.price.round_dp(2), dec!(219.9));
    assert_eq!(item.image, "https://cdn.example.com/tenis3.jpg");
    assert!(test.drain_notifications().is_empty());

    // A new product is appended without consulting stock
    assert_eq!(env.stock_requests(), 0);
}

#[tokio::test]
async fn test_snapshot_is_a_plain_json_array() {
    let env = TestEnvironment::new().await;
    let test = env.create_store().await;

    test.store.add_product(2).await;

    let raw = env.read_snapshot().await.expect("snapshot written");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = value.as_array().expect("snapshot is an array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 2);
    assert_eq!(items[0]["amount"], 1);
    assert!(items[0]["price"].is_number());
}

#[tokio::test]
async fn test_adding_twice_increments_amount() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;

    test.store.add_product(2).await;
    test.store.add_product(2).await;
    test.store.add_product(5).await;

    assert_eq!(amounts(&test.store.cart()), vec![(2, 2), (5, 1)]);
    assert!(test.drain_notifications().is_empty());
    assert_eq!(env.stock_requests(), 1);
}

#[tokio::test]
async fn test_add_beyond_stock_reports_out_of_stock() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;

    // Product 4 has a single unit in stock
    test.store.add_product(4).await;
    test.store.add_product(4).await;

    assert_eq!(amounts(&test.store.cart()), vec![(4, 1)]);
    assert_eq!(test.drain_notifications(), vec![OUT_OF_STOCK.to_string()]);
}

#[tokio::test]
async fn test_unknown_product_reports_add_failure() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;

    test.store.add_product(99).await;

    assert!(test.store.cart().is_empty());
    assert_eq!(
        test.drain_notifications(),
        vec![ADD_PRODUCT_FAILED.to_string()]
    );
    assert!(env.read_snapshot().await.is_none());
}

#[tokio::test]
async fn test_malformed_product_reports_add_failure() {
    let env = TestEnvironment::new().await;
    env.set_product(8, serde_json::json!({ "id": 8, "price": "free" }));
    let mut test = env.create_store().await;

    test.store.add_product(8).await;

    assert!(test.store.cart().is_empty());
    assert_eq!(
        test.drain_notifications(),
        vec![ADD_PRODUCT_FAILED.to_string()]
    );
}

#[tokio::test]
async fn test_missing_stock_on_increment_reports_update_failure() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;

    test.store.add_product(1).await;
    env.remove_stock(1);
    test.store.add_product(1).await;

    assert_eq!(amounts(&test.store.cart()), vec![(1, 1)]);
    assert_eq!(
        test.drain_notifications(),
        vec![UPDATE_AMOUNT_FAILED.to_string()]
    );
}

#[tokio::test]
async fn test_cart_survives_store_restart() {
    let env = TestEnvironment::new().await;

    {
        let test = env.create_store().await;
        test.store.add_product(1).await;
        test.store.add_product(6).await;
        test.store
            .update_product_amount(UpdateProductAmount::new(6, 4))
            .await;
    }

    let restarted = env.create_store().await;
    assert_eq!(amounts(&restarted.store.cart()), vec![(1, 1), (6, 4)]);
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let env = TestEnvironment::new().await;
    env.write_snapshot("{not json").await;

    let mut test = env.create_store().await;

    assert!(test.store.cart().is_empty());
    assert!(test.drain_notifications().is_empty());

    test.store.add_product(2).await;
    assert_eq!(amounts(&test.store.cart()), vec![(2, 1)]);
}

#[tokio::test]
async fn test_remove_keeps_order_and_persists() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;

    for id in [1, 2, 3] {
        test.store.add_product(id).await;
    }
    test.store.remove_product(2).await;
    assert_eq!(amounts(&test.store.cart()), vec![(1, 1), (3, 1)]);

    test.store.remove_product(2).await;
    assert_eq!(
        test.drain_notifications(),
        vec![REMOVE_PRODUCT_FAILED.to_string()]
    );

    let restarted = env.create_store().await;
    assert_eq!(amounts(&restarted.store.cart()), vec![(1, 1), (3, 1)]);
}

#[tokio::test]
async fn test_update_amount_flow() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;
    test.store.add_product(2).await;

    test.store
        .update_product_amount(UpdateProductAmount::new(2, 3))
        .await;
    assert_eq!(amounts(&test.store.cart()), vec![(2, 3)]);

    // Below one is ignored without a lookup
    let requests_before = env.stock_requests();
    test.store
        .update_product_amount(UpdateProductAmount::new(2, 0))
        .await;
    assert_eq!(env.stock_requests(), requests_before);
    assert_eq!(amounts(&test.store.cart()), vec![(2, 3)]);

    test.store
        .update_product_amount(UpdateProductAmount::new(7, 2))
        .await;
    assert_eq!(
        test.drain_notifications(),
        vec![UPDATE_AMOUNT_FAILED.to_string()]
    );
}

#[tokio::test]
async fn test_update_rejected_when_stock_equals_current_amount() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;
    test.store.add_product(5).await;
    test.store
        .update_product_amount(UpdateProductAmount::new(5, 2))
        .await;

    env.set_stock(5, 2);
    test.store
        .update_product_amount(UpdateProductAmount::new(5, 1))
        .await;

    assert_eq!(amounts(&test.store.cart()), vec![(5, 2)]);
    assert_eq!(test.drain_notifications(), vec![OUT_OF_STOCK.to_string()]);
}

#[tokio::test]
async fn test_update_target_is_not_compared_with_stock() {
    let env = TestEnvironment::new().await;
    let mut test = env.create_store().await;
    test.store.add_product(3).await;

    // Stock is 2, current is 1: the target of 10 goes through
    test.store
        .update_product_amount(UpdateProductAmount::new(3, 10))
        .await;

    assert_eq!(amounts(&test.store.cart()), vec![(3, 10)]);
    assert!(test.drain_notifications().is_empty());
}
