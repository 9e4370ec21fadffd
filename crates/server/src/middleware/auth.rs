//! Authentication extractors.
//!
//! Identity management is external; every request carries an opaque bearer
//! token that resolves to a [`Principal`] (id + role). Handlers state their
//! role requirement in the signature and receive the principal explicitly.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use orderflow_core::UserRole;
use serde_json::json;

use crate::db::users;
use crate::models::Principal;
use crate::state::AppState;

/// Extractor that requires an authenticated buyer.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireBuyer(buyer): RequireBuyer) -> impl IntoResponse {
///     format!("hello, {}", buyer.name)
/// }
/// ```
pub struct RequireBuyer(pub Principal);

/// Extractor that requires an authenticated shop owner.
pub struct RequireShop(pub Principal);

/// Error returned when a request is not authenticated or the principal has
/// the wrong role.
pub enum AuthRejection {
    /// No usable `Authorization: Bearer` header.
    MissingToken,
    /// The token resolves to no principal.
    InvalidToken,
    /// The principal exists but has the wrong role.
    WrongRole(UserRole),
    /// Token lookup failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "authentication required"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
            Self::WrongRole(UserRole::Buyer) => {
                (StatusCode::FORBIDDEN, "only buyers may perform this action")
            }
            Self::WrongRole(UserRole::Shop) => {
                (StatusCode::FORBIDDEN, "only shops may perform this action")
            }
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<Principal, AuthRejection> {
    let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

    users::principal_by_token(state.pool(), token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "token lookup failed");
            AuthRejection::Internal
        })?
        .ok_or(AuthRejection::InvalidToken)
}

impl FromRequestParts<AppState> for RequireBuyer {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = authenticate(parts, state).await?;
        if principal.role != UserRole::Buyer {
            return Err(AuthRejection::WrongRole(UserRole::Buyer));
        }
        Ok(Self(principal))
    }
}

impl FromRequestParts<AppState> for RequireShop {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = authenticate(parts, state).await?;
        if principal.role != UserRole::Shop {
            return Err(AuthRejection::WrongRole(UserRole::Shop));
        }
        Ok(Self(principal))
    }
}
