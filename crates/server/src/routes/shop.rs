//! Shop-side handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::catalog;
use crate::error::Result;
use crate::middleware::RequireShop;
use crate::models::{Order, StockItem};
use crate::services::orders as order_queries;
use crate::state::AppState;

/// Incoming placed orders containing the shop's stock.
#[instrument(skip(state, owner))]
pub async fn orders(
    State(state): State<AppState>,
    RequireShop(owner): RequireShop,
) -> Result<Json<Vec<Order>>> {
    let orders = order_queries::list_shop_orders(state.pool(), owner.user_id).await?;
    Ok(Json(orders))
}

/// The shop's own stock listings.
#[instrument(skip(state, owner))]
pub async fn stock(
    State(state): State<AppState>,
    RequireShop(owner): RequireShop,
) -> Result<Json<Vec<StockItem>>> {
    let items = catalog::list_own_stock(state.pool(), owner.user_id).await?;
    Ok(Json(items))
}
