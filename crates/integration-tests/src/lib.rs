//! Integration test fixtures for Orderflow.
//!
//! Every test gets its own in-memory `SQLite` database with the full schema
//! applied. The pool is capped at one connection so the in-memory database
//! is shared by every query of the test, and competing transactions
//! serialize the way the production write lock serializes them.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = TestApp::new().await;
//! let buyer = app.create_buyer("buyer@example.com").await;
//! let shop = app.create_shop("shop@example.com", "Shop").await;
//! let stock = app.create_listing(shop.shop_id, "Widget", "19.99", 10).await;
//! ```

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use orderflow_core::{ContactId, OrderId, ShopId, StockId, UserId, UserRole};
use orderflow_server::db::catalog::NewStock;
use orderflow_server::db::{self, catalog, contacts, users};
use orderflow_server::models::CreateContactInput;
use orderflow_server::services::notify::Notifier;
use orderflow_server::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Distinct external catalog ids across all fixtures.
static NEXT_EXTERNAL_ID: AtomicI64 = AtomicI64::new(1);

/// A seeded shop: the owning principal and the shop row.
#[derive(Debug, Clone, Copy)]
pub struct ShopFixture {
    pub owner: UserId,
    pub shop_id: ShopId,
}

/// One test's application: a fresh migrated database.
pub struct TestApp {
    pub pool: SqlitePool,
}

impl TestApp {
    /// Create an in-memory database with migrations applied.
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        db::MIGRATOR.run(&pool).await.unwrap();
        Self { pool }
    }

    /// Axum application state over this test's pool.
    ///
    /// The notifier has no worker; events emitted during router tests are
    /// dropped (see `Notifier::channel` for observing them).
    pub fn state(&self) -> AppState {
        let config = orderflow_server::config::ServerConfig {
            database_url: "sqlite::memory:".to_owned(),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
        };
        AppState::new(config, self.pool.clone(), Notifier::channel().0)
    }

    pub async fn create_buyer(&self, email: &str) -> UserId {
        users::create_user(&self.pool, email, "Test Buyer", UserRole::Buyer)
            .await
            .unwrap()
    }

    pub async fn issue_token(&self, user_id: UserId) -> String {
        users::issue_token(&self.pool, user_id).await.unwrap()
    }

    pub async fn create_shop(&self, email: &str, name: &str) -> ShopFixture {
        let owner = users::create_user(&self.pool, email, name, UserRole::Shop)
            .await
            .unwrap();
        let shop_id = catalog::create_shop(&self.pool, owner, name).await.unwrap();
        ShopFixture { owner, shop_id }
    }

    /// Create a category + product + stock listing in one go.
    pub async fn create_listing(
        &self,
        shop_id: ShopId,
        product_name: &str,
        price: &str,
        quantity: i64,
    ) -> StockId {
        let category = catalog::ensure_category(&self.pool, "Test Category")
            .await
            .unwrap();
        let product_id = catalog::create_product(&self.pool, product_name, category)
            .await
            .unwrap();
        catalog::create_stock(
            &self.pool,
            &NewStock {
                shop_id,
                product_id,
                external_id: NEXT_EXTERNAL_ID.fetch_add(1, Ordering::Relaxed),
                model: None,
                price: price.parse().unwrap(),
                price_rrp: price.parse().unwrap(),
                quantity,
            },
        )
        .await
        .unwrap()
    }

    pub async fn create_contact(&self, buyer: UserId) -> ContactId {
        contacts::create(
            &self.pool,
            buyer,
            &CreateContactInput {
                phone: "+7 900 000-00-00".to_owned(),
                city: "Moscow".to_owned(),
                street: "Tverskaya".to_owned(),
                house: Some("1".to_owned()),
                structure: None,
                building: None,
                apartment: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    /// Live availability straight from the table; `None` if the row is gone.
    pub async fn stock_quantity(&self, stock_id: StockId) -> Option<i64> {
        sqlx::query_as::<_, (i64,)>("SELECT quantity FROM shop_stock WHERE id = ?1")
            .bind(stock_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap()
            .map(|(quantity,)| quantity)
    }

    /// Delete a stock row, simulating a catalog re-import dropping it.
    pub async fn delete_stock(&self, stock_id: StockId) {
        sqlx::query("DELETE FROM shop_stock WHERE id = ?1")
            .bind(stock_id)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    /// The raw state string of an order.
    pub async fn order_state(&self, order_id: OrderId) -> String {
        sqlx::query_as::<_, (String,)>("SELECT state FROM orders WHERE id = ?1")
            .bind(order_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
            .0
    }

    /// (line id, quantity) pairs of an order, in line-id order.
    pub async fn line_quantities(&self, order_id: OrderId) -> Vec<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT id, quantity FROM order_line WHERE order_id = ?1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .unwrap()
    }
}
