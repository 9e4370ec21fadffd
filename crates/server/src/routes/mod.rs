//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (verifies database)
//!
//! # Catalog
//! GET    /api/products           - Browse priced stock listings
//!
//! # Basket (buyer)
//! GET    /api/basket             - Current basket with lines and total
//! POST   /api/basket/items       - Add lines (all-or-nothing batch)
//! PATCH  /api/basket/items       - Update line quantities (all-or-nothing)
//! DELETE /api/basket/items       - Remove lines (bulk)
//!
//! # Orders
//! POST   /api/orders             - Place the basket as an order
//! GET    /api/orders             - Buyer's placed orders
//!
//! # Contacts (buyer)
//! GET    /api/contacts           - List delivery contacts
//! POST   /api/contacts           - Create a contact
//! PATCH  /api/contacts/{id}      - Update a contact
//! DELETE /api/contacts/{id}      - Delete a contact
//!
//! # Shop
//! GET    /api/shop/orders        - Incoming orders containing the shop's stock
//! GET    /api/shop/stock         - The shop's own listings
//! ```

pub mod basket;
pub mod contacts;
pub mod orders;
pub mod products;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::index))
        .route("/api/basket", get(basket::show))
        .route(
            "/api/basket/items",
            post(basket::add).patch(basket::update).delete(basket::remove),
        )
        .route("/api/orders", get(orders::index).post(orders::place))
        .route("/api/contacts", get(contacts::index).post(contacts::create))
        .route(
            "/api/contacts/{id}",
            axum::routing::patch(contacts::update).delete(contacts::remove),
        )
        .route("/api/shop/orders", get(shop::orders))
        .route("/api/shop/stock", get(shop::stock))
}
