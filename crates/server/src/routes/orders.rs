//! Order handlers (buyer only).

use axum::{Json, extract::State, http::StatusCode};
use orderflow_core::ContactId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireBuyer;
use crate::models::Order;
use crate::services::checkout::CheckoutService;
use crate::services::orders as order_queries;
use crate::state::AppState;

/// Body for `POST /api/orders`.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    /// Delivery contact; required for placement, validated by the service.
    #[serde(default)]
    pub contact_id: Option<ContactId>,
}

/// Response for a successfully placed order.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order: Order,
}

/// The buyer's placed orders.
#[instrument(skip(state, buyer))]
pub async fn index(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
) -> Result<Json<Vec<Order>>> {
    let orders = order_queries::list_buyer_orders(state.pool(), buyer.user_id).await?;
    Ok(Json(orders))
}

/// Commit the basket into a placed order.
#[instrument(skip(state, buyer, body))]
pub async fn place(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>)> {
    let placed = CheckoutService::new(state.pool(), state.notifier())
        .place_order(buyer.user_id, body.contact_id)
        .await?;

    let message = if placed.composition_changed {
        "order placed; its composition changed because some items were no \
         longer available in the requested quantity"
    } else {
        "order placed"
    };

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: message.to_owned(),
            order: placed.order,
        }),
    ))
}
