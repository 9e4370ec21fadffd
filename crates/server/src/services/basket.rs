//! The basket manager.
//!
//! Maintains the buyer's singleton basket order and its lines. Every mutating
//! operation runs inside one transaction and is all-or-nothing: a single
//! invalid line rolls the whole batch back. Availability is checked against
//! live stock at write time; nothing here mutates `shop_stock`.

use orderflow_core::{
    DEFAULT_LINE_QUANTITY, OrderLineId, StockId, UserId, line_quantity_in_bounds,
};
use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::instrument;

use crate::db::{RepositoryError, orders, stock};
use crate::models::Order;

/// Errors from basket operations.
#[derive(Debug, Error)]
pub enum BasketError {
    /// The buyer has no basket.
    #[error("basket not found")]
    BasketNotFound,

    /// A referenced line is not in the buyer's basket.
    #[error("order line {line_id} not found in basket")]
    LineNotFound { line_id: OrderLineId },

    /// A referenced stock listing does not exist.
    #[error("stock listing {stock_id} not found")]
    StockNotFound { stock_id: StockId },

    /// Requested quantity exceeds what the shop has.
    #[error("requested quantity for stock {stock_id} exceeds the {available} available")]
    ExceedsAvailable {
        stock_id: StockId,
        available: i64,
        /// The offending basket line, when the request addressed one.
        line_id: Option<OrderLineId>,
    },

    /// Quantity outside the allowed per-line range.
    #[error("quantity {quantity} is outside the allowed range [1, 100]")]
    InvalidQuantity { quantity: i64 },

    /// A removal matched none of the given line ids.
    #[error("no matching lines to delete")]
    NothingToDelete,

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One line of an add-to-basket request.
#[derive(Debug, Clone, Deserialize)]
pub struct AddLine {
    /// Stock listing to add.
    pub stock_id: StockId,
    /// Units to request; defaults to 1.
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// One line of a quantity-update request.
#[derive(Debug, Clone, Deserialize)]
pub struct LineUpdate {
    /// Basket line to change.
    pub line_id: OrderLineId,
    /// New quantity.
    pub quantity: i64,
}

/// Basket operations for one buyer. The buyer principal is passed explicitly
/// to every call.
pub struct BasketService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BasketService<'a> {
    /// Create a basket service over the given pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add lines to the buyer's basket, creating the basket if needed.
    ///
    /// Returns the number of lines written. Adding a stock listing already in
    /// the basket overwrites that line's quantity.
    ///
    /// # Errors
    ///
    /// Fails the whole batch on the first invalid line: quantity out of
    /// bounds, unknown stock, or quantity above current availability.
    #[instrument(skip(self, lines), fields(buyer = %buyer, line_count = lines.len()))]
    pub async fn add_lines(&self, buyer: UserId, lines: Vec<AddLine>) -> Result<u64, BasketError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let order_id = orders::get_or_create_basket(&mut tx, buyer).await?;

        let mut written = 0;
        for line in lines {
            let quantity = line.quantity.unwrap_or(DEFAULT_LINE_QUANTITY);
            if !line_quantity_in_bounds(quantity) {
                return Err(BasketError::InvalidQuantity { quantity });
            }

            check_availability(&mut tx, line.stock_id, quantity).await?;
            orders::upsert_line(&mut tx, order_id, line.stock_id, quantity).await?;
            written += 1;
        }

        tx.commit().await.map_err(RepositoryError::from)?;
        Ok(written)
    }

    /// Change quantities of existing basket lines.
    ///
    /// Returns the number of lines updated.
    ///
    /// # Errors
    ///
    /// Fails the whole batch on the first violation: no basket, a line that
    /// is not in this buyer's basket, quantity out of bounds, or quantity
    /// above current availability.
    #[instrument(skip(self, updates), fields(buyer = %buyer, update_count = updates.len()))]
    pub async fn update_lines(
        &self,
        buyer: UserId,
        updates: Vec<LineUpdate>,
    ) -> Result<u64, BasketError> {
        let order_id = orders::basket_id(self.pool, buyer)
            .await?
            .ok_or(BasketError::BasketNotFound)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let mut updated = 0;
        for update in updates {
            if !line_quantity_in_bounds(update.quantity) {
                return Err(BasketError::InvalidQuantity {
                    quantity: update.quantity,
                });
            }

            let line = orders::line_with_availability(&mut tx, order_id, update.line_id)
                .await?
                .ok_or(BasketError::LineNotFound {
                    line_id: update.line_id,
                })?;

            // A vanished stock row reads as zero availability.
            let available = line.available.unwrap_or(0);
            if update.quantity > available {
                return Err(BasketError::ExceedsAvailable {
                    stock_id: line.stock_id,
                    available,
                    line_id: Some(update.line_id),
                });
            }

            orders::set_line_quantity(&mut tx, update.line_id, update.quantity).await?;
            updated += 1;
        }

        tx.commit().await.map_err(RepositoryError::from)?;
        Ok(updated)
    }

    /// Remove lines from the buyer's basket.
    ///
    /// Returns the number of lines deleted. Ids that are already gone are
    /// ignored, so a repeated call is safe; it reports
    /// [`BasketError::NothingToDelete`] when nothing matched at all.
    ///
    /// # Errors
    ///
    /// Fails if the buyer has no basket or nothing matched.
    #[instrument(skip(self, line_ids), fields(buyer = %buyer, id_count = line_ids.len()))]
    pub async fn remove_lines(
        &self,
        buyer: UserId,
        line_ids: &[OrderLineId],
    ) -> Result<u64, BasketError> {
        let order_id = orders::basket_id(self.pool, buyer)
            .await?
            .ok_or(BasketError::BasketNotFound)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;
        let deleted = orders::delete_lines(&mut tx, order_id, line_ids).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        if deleted == 0 {
            return Err(BasketError::NothingToDelete);
        }
        Ok(deleted)
    }

    /// The buyer's basket with lines and total.
    ///
    /// # Errors
    ///
    /// Fails with [`BasketError::BasketNotFound`] if no basket exists.
    #[instrument(skip(self), fields(buyer = %buyer))]
    pub async fn get_basket(&self, buyer: UserId) -> Result<Order, BasketError> {
        let order_id = orders::basket_id(self.pool, buyer)
            .await?
            .ok_or(BasketError::BasketNotFound)?;

        Ok(orders::fetch_order(self.pool, order_id).await?)
    }
}

/// Reject a write that would take a line above the stock's current
/// availability.
async fn check_availability(
    conn: &mut SqliteConnection,
    stock_id: StockId,
    quantity: i64,
) -> Result<(), BasketError> {
    let Some(available) = stock::available_quantity(conn, stock_id).await? else {
        return Err(BasketError::StockNotFound { stock_id });
    };

    if quantity > available {
        return Err(BasketError::ExceedsAvailable {
            stock_id,
            available,
            line_id: None,
        });
    }
    Ok(())
}
