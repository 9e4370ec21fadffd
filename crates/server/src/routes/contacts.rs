//! Delivery contact handlers (buyer only).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use orderflow_core::ContactId;
use serde::Serialize;
use tracing::instrument;

use crate::db::contacts;
use crate::error::{AppError, Result};
use crate::middleware::RequireBuyer;
use crate::models::{Contact, CreateContactInput, UpdateContactInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteContactResponse {
    pub deleted: bool,
}

/// List the buyer's contacts.
#[instrument(skip(state, buyer))]
pub async fn index(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
) -> Result<Json<Vec<Contact>>> {
    let contacts = contacts::list_for_user(state.pool(), buyer.user_id).await?;
    Ok(Json(contacts))
}

/// Create a contact.
#[instrument(skip(state, buyer, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
    Json(body): Json<CreateContactInput>,
) -> Result<(StatusCode, Json<Contact>)> {
    let contact = contacts::create(state.pool(), buyer.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// Update a contact.
#[instrument(skip(state, buyer, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
    Path(contact_id): Path<ContactId>,
    Json(body): Json<UpdateContactInput>,
) -> Result<Json<Contact>> {
    let contact = contacts::update(state.pool(), buyer.user_id, contact_id, &body)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("contact not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    Ok(Json(contact))
}

/// Delete a contact.
#[instrument(skip(state, buyer))]
pub async fn remove(
    State(state): State<AppState>,
    RequireBuyer(buyer): RequireBuyer,
    Path(contact_id): Path<ContactId>,
) -> Result<Json<DeleteContactResponse>> {
    let deleted = contacts::delete(state.pool(), buyer.user_id, contact_id).await?;
    if !deleted {
        return Err(AppError::NotFound("contact not found".to_owned()));
    }
    Ok(Json(DeleteContactResponse { deleted }))
}
