//! Catalog browse handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use orderflow_core::{CategoryId, ShopId};
use serde::Deserialize;
use tracing::instrument;

use crate::db::catalog;
use crate::error::Result;
use crate::models::{StockFilter, StockItem};
use crate::state::AppState;

/// Browse filters. All optional; pagination is intentionally absent.
#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    /// Only listings from this shop.
    pub shop_id: Option<ShopId>,
    /// Only products in this category.
    pub category_id: Option<CategoryId>,
    /// Case-insensitive product-name substring.
    pub product: Option<String>,
}

/// Browse priced stock listings of shops accepting orders.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<StockItem>>> {
    let filter = StockFilter {
        shop_id: query.shop_id,
        category_id: query.category_id,
        product: query.product,
    };

    let items = catalog::list_stock(state.pool(), &filter).await?;
    Ok(Json(items))
}
