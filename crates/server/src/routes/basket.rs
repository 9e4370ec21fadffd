//! Basket handlers (buyer only).

use axum::{Json, extract::State, http::StatusCode};
use orderflow_core::OrderLineId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireBuyer;
use crate::models::Order;
use crate::services::basket::{AddLine, BasketService, LineUpdate};
use crate::state::AppState;

/// Body for `POST /api/basket/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemsRequest {
    pub items: Vec<AddLine>,
}

/// Body for `PATCH /api/basket/items`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemsRequest {
    pub items: Vec<LineUpdate>,
}

/// Body for `DELETE /api/basket/items`.
#[derive(Debug, Deserialize)]
pub struct RemoveItemsRequest {
    pub items: Vec<OrderLineId>,
}

#[derive(Debug, Serialize)]
pub struct AddItemsResponse {
    pub created: u64,
}

#[derive(Debug, Serialize)]
pub struct UpdateItemsResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct RemoveItemsResponse {
    pub deleted: u64,
}

/// The buyer's current basket.
#[instrument(skip(state, buyer))]
pub async fn show(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
) -> Result<Json<Order>> {
    let basket = BasketService::new(state.pool())
        .get_basket(buyer.user_id)
        .await?;
    Ok(Json(basket))
}

/// Add lines to the basket.
#[instrument(skip(state, buyer, body))]
pub async fn add(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
    Json(body): Json<AddItemsRequest>,
) -> Result<(StatusCode, Json<AddItemsResponse>)> {
    if body.items.is_empty() {
        return Err(AppError::BadRequest("items must not be empty".to_owned()));
    }

    let created = BasketService::new(state.pool())
        .add_lines(buyer.user_id, body.items)
        .await?;
    Ok((StatusCode::CREATED, Json(AddItemsResponse { created })))
}

/// Update line quantities.
#[instrument(skip(state, buyer, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
    Json(body): Json<UpdateItemsRequest>,
) -> Result<Json<UpdateItemsResponse>> {
    if body.items.is_empty() {
        return Err(AppError::BadRequest("items must not be empty".to_owned()));
    }

    let updated = BasketService::new(state.pool())
        .update_lines(buyer.user_id, body.items)
        .await?;
    Ok(Json(UpdateItemsResponse { updated }))
}

/// Remove lines.
#[instrument(skip(state, buyer, body))]
pub async fn remove(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
    Json(body): Json<RemoveItemsRequest>,
) -> Result<Json<RemoveItemsResponse>> {
    if body.items.is_empty() {
        return Err(AppError::BadRequest("items must not be empty".to_owned()));
    }

    let deleted = BasketService::new(state.pool())
        .remove_lines(buyer.user_id, &body.items)
        .await?;
    Ok(Json(RemoveItemsResponse { deleted }))
}
