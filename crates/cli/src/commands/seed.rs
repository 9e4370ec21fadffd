//! Seed command: demo shops, products, stock, and users.
//!
//! Catalog ingestion proper (feed files) belongs to the external import
//! collaborator; this seed exists so a fresh database has something to
//! browse, a buyer token to order with, and a shop token to list orders
//! with.

use orderflow_core::UserRole;
use orderflow_server::config::ServerConfig;
use orderflow_server::db::{self, catalog, users};
use orderflow_server::db::catalog::NewStock;
use rust_decimal::Decimal;

/// Seed the configured database with demo data.
///
/// # Errors
///
/// Returns an error if configuration, connection, or any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::MIGRATOR.run(&pool).await?;

    let shop_owner = users::create_user(&pool, "owner@svyaznoy.example", "Svyaznoy", UserRole::Shop)
        .await?;
    let shop_token = users::issue_token(&pool, shop_owner).await?;
    let shop_id = catalog::create_shop(&pool, shop_owner, "Svyaznoy").await?;

    let buyer = users::create_user(&pool, "buyer@example.com", "Demo Buyer", UserRole::Buyer)
        .await?;
    let buyer_token = users::issue_token(&pool, buyer).await?;

    let phones = catalog::ensure_category(&pool, "Smartphones").await?;
    let accessories = catalog::ensure_category(&pool, "Accessories").await?;

    let listings = [
        ("Apple iPhone 15", phones, 4_216_226, "15/128GB", "109990.00", "116990.00", 14),
        ("Samsung Galaxy S24", phones, 4_216_313, "S24/256GB", "84990.00", "89990.00", 9),
        ("USB-C Charger 30W", accessories, 4_216_802, "A2518", "2990.00", "3490.00", 120),
    ];

    for (name, category_id, external_id, model, price, price_rrp, quantity) in listings {
        let product_id = catalog::create_product(&pool, name, category_id).await?;
        catalog::create_stock(
            &pool,
            &NewStock {
                shop_id,
                product_id,
                external_id,
                model: Some(model.to_owned()),
                price: price.parse::<Decimal>()?,
                price_rrp: price_rrp.parse::<Decimal>()?,
                quantity,
            },
        )
        .await?;
    }

    tracing::info!(%shop_token, %buyer_token, "seed complete");
    Ok(())
}
