//! Order listing tests: buyers see their placed orders (never the basket),
//! shops see orders containing their stock.

#![allow(clippy::unwrap_used)]

use orderflow_core::{OrderState, StockId};
use orderflow_integration_tests::TestApp;
use orderflow_server::services::basket::{AddLine, BasketService};
use orderflow_server::services::checkout::CheckoutService;
use orderflow_server::services::notify::Notifier;
use orderflow_server::services::orders::{self, OrderQueryError};

fn add(stock_id: StockId, quantity: i64) -> AddLine {
    AddLine {
        stock_id,
        quantity: Some(quantity),
    }
}

#[tokio::test]
async fn test_buyer_listing_excludes_the_basket() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let contact = app.create_contact(buyer).await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 20).await;

    // Nothing placed yet: empty listing even though a basket exists.
    let basket = BasketService::new(&app.pool);
    basket.add_lines(buyer, vec![add(stock, 2)]).await.unwrap();
    assert!(orders::list_buyer_orders(&app.pool, buyer)
        .await
        .unwrap()
        .is_empty());

    let (notifier, _events) = Notifier::channel();
    let placed = CheckoutService::new(&app.pool, &notifier)
        .place_order(buyer, Some(contact))
        .await
        .unwrap();

    let listed = orders::list_buyer_orders(&app.pool, buyer).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, placed.order.id);
    assert_eq!(listed[0].state, OrderState::New);
    assert_eq!(listed[0].total, "10.00".parse().unwrap());

    // A fresh basket after placement stays out of the listing.
    basket.add_lines(buyer, vec![add(stock, 1)]).await.unwrap();
    assert_eq!(
        orders::list_buyer_orders(&app.pool, buyer).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_shop_sees_only_orders_with_its_stock() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let contact = app.create_contact(buyer).await;
    let first_shop = app.create_shop("first@example.com", "First").await;
    let second_shop = app.create_shop("second@example.com", "Second").await;
    let first_stock = app
        .create_listing(first_shop.shop_id, "Widget", "5.00", 20)
        .await;
    let second_stock = app
        .create_listing(second_shop.shop_id, "Gadget", "7.00", 20)
        .await;

    BasketService::new(&app.pool)
        .add_lines(buyer, vec![add(first_stock, 1)])
        .await
        .unwrap();
    let (notifier, _events) = Notifier::channel();
    CheckoutService::new(&app.pool, &notifier)
        .place_order(buyer, Some(contact))
        .await
        .unwrap();

    let first_orders = orders::list_shop_orders(&app.pool, first_shop.owner)
        .await
        .unwrap();
    assert_eq!(first_orders.len(), 1);
    assert_eq!(first_orders[0].lines[0].stock_id, first_stock);

    // The second shop sold nothing.
    assert!(orders::list_shop_orders(&app.pool, second_shop.owner)
        .await
        .unwrap()
        .is_empty());

    let _ = second_stock;
}

#[tokio::test]
async fn test_shop_listing_requires_a_shop() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;

    assert!(matches!(
        orders::list_shop_orders(&app.pool, buyer).await,
        Err(OrderQueryError::ShopNotFound)
    ));
}
