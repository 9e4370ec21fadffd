//! Inventory ledger tests: the guarded decrement can never drive a quantity
//! negative, no matter what is asked of it.

#![allow(clippy::unwrap_used)]

use orderflow_core::StockId;
use orderflow_integration_tests::TestApp;
use orderflow_server::db::stock;

#[tokio::test]
async fn test_decrement_subtracts_exactly() {
    let app = TestApp::new().await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock_id = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let mut conn = app.pool.acquire().await.unwrap();
    assert!(stock::decrement(&mut conn, stock_id, 4).await.unwrap());
    drop(conn);

    assert_eq!(app.stock_quantity(stock_id).await, Some(6));
}

#[tokio::test]
async fn test_decrement_to_exactly_zero() {
    let app = TestApp::new().await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock_id = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let mut conn = app.pool.acquire().await.unwrap();
    assert!(stock::decrement(&mut conn, stock_id, 10).await.unwrap());
    drop(conn);

    assert_eq!(app.stock_quantity(stock_id).await, Some(0));
}

#[tokio::test]
async fn test_over_decrement_is_refused_and_changes_nothing() {
    let app = TestApp::new().await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock_id = app.create_listing(shop.shop_id, "Widget", "5.00", 3).await;

    let mut conn = app.pool.acquire().await.unwrap();
    assert!(!stock::decrement(&mut conn, stock_id, 4).await.unwrap());
    drop(conn);

    assert_eq!(app.stock_quantity(stock_id).await, Some(3));
}

#[tokio::test]
async fn test_decrement_of_missing_row_is_refused() {
    let app = TestApp::new().await;

    let mut conn = app.pool.acquire().await.unwrap();
    assert!(
        !stock::decrement(&mut conn, StockId::new(404), 1)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_available_quantity_of_missing_row_is_none() {
    let app = TestApp::new().await;

    let mut conn = app.pool.acquire().await.unwrap();
    assert_eq!(
        stock::available_quantity(&mut conn, StockId::new(404))
            .await
            .unwrap(),
        None
    );
}
