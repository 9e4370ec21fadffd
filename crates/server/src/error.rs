//! Unified error handling for route handlers.
//!
//! Provides a unified `AppError` type that maps service errors onto HTTP
//! status codes and JSON error bodies. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::basket::BasketError;
use crate::services::checkout::CheckoutError;
use crate::services::orders::OrderQueryError;

/// Application-level error type for the order backend.
#[derive(Debug, Error)]
pub enum AppError {
    /// Basket operation failed.
    #[error("basket error: {0}")]
    Basket(#[from] BasketError),

    /// Checkout failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order listing failed.
    #[error("order query error: {0}")]
    OrderQuery(#[from] OrderQueryError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request error");
        }

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Database(_)
            | Self::Basket(BasketError::Repository(_))
            | Self::Checkout(CheckoutError::Repository(_))
            | Self::OrderQuery(OrderQueryError::Repository(_)) => {
                json!({ "error": "internal server error" })
            }
            Self::Basket(BasketError::ExceedsAvailable {
                stock_id,
                available,
                line_id,
            }) => json!({
                "error": self.to_string(),
                "stock_id": stock_id,
                "available": available,
                "line_id": line_id,
            }),
            Self::Basket(BasketError::LineNotFound { line_id }) => json!({
                "error": self.to_string(),
                "line_id": line_id,
            }),
            Self::Checkout(CheckoutError::NoAvailableItems) => json!({
                "error": "all items in the basket ran out of stock at the shops",
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Basket(err) => match err {
                BasketError::BasketNotFound
                | BasketError::LineNotFound { .. }
                | BasketError::StockNotFound { .. }
                | BasketError::NothingToDelete => StatusCode::NOT_FOUND,
                BasketError::ExceedsAvailable { .. } | BasketError::InvalidQuantity { .. } => {
                    StatusCode::BAD_REQUEST
                }
                BasketError::Repository(err) => repository_status(err),
            },
            Self::Checkout(err) => match err {
                CheckoutError::BasketNotFound | CheckoutError::ContactNotFound => {
                    StatusCode::NOT_FOUND
                }
                CheckoutError::EmptyBasket
                | CheckoutError::MissingContact
                | CheckoutError::NoAvailableItems => StatusCode::BAD_REQUEST,
                CheckoutError::InsufficientStock { .. } => StatusCode::CONFLICT,
                CheckoutError::Repository(err) => repository_status(err),
            },
            Self::OrderQuery(err) => match err {
                OrderQueryError::ShopNotFound => StatusCode::NOT_FOUND,
                OrderQueryError::Repository(err) => repository_status(err),
            },
            Self::Database(err) => repository_status(err),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use orderflow_core::StockId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_basket_error_status_codes() {
        assert_eq!(
            get_status(AppError::Basket(BasketError::BasketNotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Basket(BasketError::ExceedsAvailable {
                stock_id: StockId::new(1),
                available: 4,
                line_id: None
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Basket(BasketError::InvalidQuantity {
                quantity: 0
            })),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_checkout_error_status_codes() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyBasket)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::ContactNotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::NoAvailableItems)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::InsufficientStock {
                stock_id: StockId::new(7)
            })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_repository_errors_do_not_leak_details() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "invalid price in database".to_owned(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_conflict_is_retryable_status() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict(
                "basket changed".to_owned()
            ))),
            StatusCode::CONFLICT
        );
    }
}
