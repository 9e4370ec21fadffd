//! Basket manager integration tests.
//!
//! Covers the write-time availability ceiling, all-or-nothing batches, the
//! singleton basket, and removal idempotence. Stock quantities must never
//! move from basket operations alone.

#![allow(clippy::unwrap_used)]

use orderflow_core::{OrderLineId, StockId};
use orderflow_integration_tests::TestApp;
use orderflow_server::services::basket::{AddLine, BasketError, BasketService, LineUpdate};

fn add(stock_id: StockId, quantity: i64) -> AddLine {
    AddLine {
        stock_id,
        quantity: Some(quantity),
    }
}

#[tokio::test]
async fn test_add_creates_basket_line_without_touching_stock() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "19.99", 10).await;

    let service = BasketService::new(&app.pool);
    let created = service.add_lines(buyer, vec![add(stock, 3)]).await.unwrap();
    assert_eq!(created, 1);

    let basket = service.get_basket(buyer).await.unwrap();
    assert_eq!(basket.lines.len(), 1);
    assert_eq!(basket.lines[0].quantity, 3);
    assert_eq!(basket.total, "59.97".parse().unwrap());

    // Adding to the basket reserves nothing.
    assert_eq!(app.stock_quantity(stock).await, Some(10));
}

#[tokio::test]
async fn test_add_without_quantity_defaults_to_one() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let service = BasketService::new(&app.pool);
    service
        .add_lines(
            buyer,
            vec![AddLine {
                stock_id: stock,
                quantity: None,
            }],
        )
        .await
        .unwrap();

    let basket = service.get_basket(buyer).await.unwrap();
    assert_eq!(basket.lines[0].quantity, 1);
}

#[tokio::test]
async fn test_add_exceeding_available_rolls_back_whole_batch() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let plenty = app.create_listing(shop.shop_id, "Widget", "5.00", 100).await;
    let scarce = app.create_listing(shop.shop_id, "Gadget", "7.00", 2).await;

    let service = BasketService::new(&app.pool);
    let err = service
        .add_lines(buyer, vec![add(plenty, 4), add(scarce, 3)])
        .await
        .unwrap_err();

    match err {
        BasketError::ExceedsAvailable {
            stock_id,
            available,
            ..
        } => {
            assert_eq!(stock_id, scarce);
            assert_eq!(available, 2);
        }
        other => panic!("expected ExceedsAvailable, got {other:?}"),
    }

    // The valid first line must not have been persisted either.
    assert!(matches!(
        service.get_basket(buyer).await,
        Err(BasketError::BasketNotFound)
    ));
}

#[tokio::test]
async fn test_add_same_stock_twice_overwrites_quantity() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let service = BasketService::new(&app.pool);
    service.add_lines(buyer, vec![add(stock, 2)]).await.unwrap();
    service.add_lines(buyer, vec![add(stock, 5)]).await.unwrap();

    let basket = service.get_basket(buyer).await.unwrap();
    assert_eq!(basket.lines.len(), 1);
    assert_eq!(basket.lines[0].quantity, 5);
}

#[tokio::test]
async fn test_add_unknown_stock_is_rejected() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;

    let service = BasketService::new(&app.pool);
    let err = service
        .add_lines(buyer, vec![add(StockId::new(999), 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, BasketError::StockNotFound { .. }));
}

#[tokio::test]
async fn test_add_quantity_out_of_bounds_is_rejected() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 200).await;

    let service = BasketService::new(&app.pool);
    for quantity in [0, -1, 101] {
        let err = service
            .add_lines(buyer, vec![add(stock, quantity)])
            .await
            .unwrap_err();
        assert!(
            matches!(err, BasketError::InvalidQuantity { quantity: q } if q == quantity),
            "quantity {quantity} should be out of bounds"
        );
    }
}

#[tokio::test]
async fn test_update_respects_current_availability() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let service = BasketService::new(&app.pool);
    service.add_lines(buyer, vec![add(stock, 2)]).await.unwrap();
    let basket = service.get_basket(buyer).await.unwrap();
    let line_id = basket.lines[0].id;

    // Right at the ceiling is fine.
    let updated = service
        .update_lines(
            buyer,
            vec![LineUpdate {
                line_id,
                quantity: 10,
            }],
        )
        .await
        .unwrap();
    assert_eq!(updated, 1);

    // One above is not.
    let err = service
        .update_lines(
            buyer,
            vec![LineUpdate {
                line_id,
                quantity: 11,
            }],
        )
        .await
        .unwrap_err();
    // The error names both the quantity ceiling and the offending line.
    assert!(matches!(
        err,
        BasketError::ExceedsAvailable { available: 10, line_id: Some(l), .. } if l == line_id
    ));

    let basket = service.get_basket(buyer).await.unwrap();
    assert_eq!(basket.lines[0].quantity, 10);
}

#[tokio::test]
async fn test_update_failure_rolls_back_earlier_updates() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let first = app.create_listing(shop.shop_id, "Widget", "5.00", 50).await;
    let second = app.create_listing(shop.shop_id, "Gadget", "7.00", 3).await;

    let service = BasketService::new(&app.pool);
    service
        .add_lines(buyer, vec![add(first, 1), add(second, 1)])
        .await
        .unwrap();
    let basket = service.get_basket(buyer).await.unwrap();

    let err = service
        .update_lines(
            buyer,
            vec![
                LineUpdate {
                    line_id: basket.lines[0].id,
                    quantity: 20,
                },
                LineUpdate {
                    line_id: basket.lines[1].id,
                    quantity: 5,
                },
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BasketError::ExceedsAvailable { .. }));

    // The first update was rolled back with the batch.
    let basket = service.get_basket(buyer).await.unwrap();
    assert_eq!(basket.lines[0].quantity, 1);
    assert_eq!(basket.lines[1].quantity, 1);
}

#[tokio::test]
async fn test_update_rejects_foreign_line() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let other = app.create_buyer("other@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let service = BasketService::new(&app.pool);
    service.add_lines(other, vec![add(stock, 2)]).await.unwrap();
    let foreign_line = service.get_basket(other).await.unwrap().lines[0].id;

    // The buyer needs a basket of their own before updates resolve lines.
    service.add_lines(buyer, vec![add(stock, 1)]).await.unwrap();

    let err = service
        .update_lines(
            buyer,
            vec![LineUpdate {
                line_id: foreign_line,
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BasketError::LineNotFound { line_id } if line_id == foreign_line
    ));
}

#[tokio::test]
async fn test_deleted_listing_cascades_out_of_the_basket() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let service = BasketService::new(&app.pool);
    service.add_lines(buyer, vec![add(stock, 2)]).await.unwrap();
    let line_id = service.get_basket(buyer).await.unwrap().lines[0].id;

    // A catalog re-import dropping the listing takes dependent lines with it.
    app.delete_stock(stock).await;
    assert!(service.get_basket(buyer).await.unwrap().lines.is_empty());

    let err = service
        .update_lines(
            buyer,
            vec![LineUpdate {
                line_id,
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BasketError::LineNotFound { .. }));
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let service = BasketService::new(&app.pool);
    service.add_lines(buyer, vec![add(stock, 2)]).await.unwrap();
    let line_id = service.get_basket(buyer).await.unwrap().lines[0].id;

    let deleted = service.remove_lines(buyer, &[line_id]).await.unwrap();
    assert_eq!(deleted, 1);

    // Second removal of the same id: nothing matched, nothing corrupted.
    let err = service.remove_lines(buyer, &[line_id]).await.unwrap_err();
    assert!(matches!(err, BasketError::NothingToDelete));

    let basket = service.get_basket(buyer).await.unwrap();
    assert!(basket.lines.is_empty());
}

#[tokio::test]
async fn test_remove_ignores_foreign_lines() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let other = app.create_buyer("other@example.com").await;
    let shop = app.create_shop("shop@example.com", "Shop").await;
    let stock = app.create_listing(shop.shop_id, "Widget", "5.00", 10).await;

    let service = BasketService::new(&app.pool);
    service.add_lines(other, vec![add(stock, 2)]).await.unwrap();
    let foreign_line = service.get_basket(other).await.unwrap().lines[0].id;

    service.add_lines(buyer, vec![add(stock, 1)]).await.unwrap();

    let err = service
        .remove_lines(buyer, &[foreign_line])
        .await
        .unwrap_err();
    assert!(matches!(err, BasketError::NothingToDelete));

    // The other buyer's line is untouched.
    assert_eq!(service.get_basket(other).await.unwrap().lines.len(), 1);
}

#[tokio::test]
async fn test_get_basket_when_none_exists() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;

    let service = BasketService::new(&app.pool);
    assert!(matches!(
        service.get_basket(buyer).await,
        Err(BasketError::BasketNotFound)
    ));
}

#[tokio::test]
async fn test_remove_without_basket() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;

    let service = BasketService::new(&app.pool);
    let err = service
        .remove_lines(buyer, &[OrderLineId::new(1)])
        .await
        .unwrap_err();
    assert!(matches!(err, BasketError::BasketNotFound));
}
