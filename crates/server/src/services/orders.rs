//! Read-side order listings.
//!
//! No business logic lives here; these wrap the order repository with the
//! principal scoping the routes need.

use orderflow_core::UserId;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use crate::db::{RepositoryError, catalog, orders};
use crate::models::Order;

/// Errors from order listings.
#[derive(Debug, Error)]
pub enum OrderQueryError {
    /// The caller owns no shop.
    #[error("shop not found")]
    ShopNotFound,

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The buyer's placed orders, newest first.
///
/// # Errors
///
/// Returns [`OrderQueryError::Repository`] if the query fails.
#[instrument(skip(pool), fields(buyer = %buyer))]
pub async fn list_buyer_orders(
    pool: &SqlitePool,
    buyer: UserId,
) -> Result<Vec<Order>, OrderQueryError> {
    Ok(orders::list_buyer_orders(pool, buyer).await?)
}

/// Placed orders containing the shop owner's stock, newest first.
///
/// # Errors
///
/// Returns [`OrderQueryError::ShopNotFound`] if the caller owns no shop.
#[instrument(skip(pool), fields(owner = %owner))]
pub async fn list_shop_orders(
    pool: &SqlitePool,
    owner: UserId,
) -> Result<Vec<Order>, OrderQueryError> {
    let shop_id = catalog::shop_id_for_owner(pool, owner)
        .await?
        .ok_or(OrderQueryError::ShopNotFound)?;

    Ok(orders::list_shop_orders(pool, shop_id).await?)
}
