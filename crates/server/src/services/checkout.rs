//! Checkout: the basket → placed-order transition.
//!
//! Inventory may have shrunk between "add to basket" and "place order"
//! (concurrent buyers, catalog re-imports). Rather than failing the whole
//! order on any shortage, each line is capped to what remains and lines that
//! are fully out of stock are dropped; only total exhaustion is a hard
//! failure. The buyer is told the composition may have changed.

use orderflow_core::{ContactId, OrderState, StockId, UserId};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use crate::db::{RepositoryError, contacts, orders, stock};
use crate::models::Order;
use crate::services::notify::Notifier;

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The buyer has no basket.
    #[error("basket not found")]
    BasketNotFound,

    /// The basket has no lines.
    #[error("basket is empty")]
    EmptyBasket,

    /// No contact id was supplied.
    #[error("a delivery contact is required to place an order")]
    MissingContact,

    /// The contact does not exist or belongs to someone else.
    #[error("contact not found")]
    ContactNotFound,

    /// Every line in the basket was out of stock.
    #[error("all items in the basket are out of stock")]
    NoAvailableItems,

    /// A concurrent commit consumed the stock between the availability read
    /// and the decrement; the caller may retry.
    #[error("stock {stock_id} was depleted concurrently")]
    InsufficientStock { stock_id: StockId },

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A successfully placed order.
#[derive(Debug)]
pub struct PlacedOrder {
    /// The order after placement, with capped lines and final total.
    pub order: Order,
    /// Whether any line was capped or dropped during reconciliation.
    pub composition_changed: bool,
}

/// The order committer. The buyer principal is passed explicitly.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
    notifier: &'a Notifier,
}

impl<'a> CheckoutService<'a> {
    /// Create a checkout service over the given pool and notifier.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, notifier: &'a Notifier) -> Self {
        Self { pool, notifier }
    }

    /// Atomically convert the buyer's basket into a placed order.
    ///
    /// Each line is re-validated against live stock inside one transaction:
    /// exhausted lines are dropped, short lines are capped to what remains,
    /// and every surviving line's quantity is subtracted from its stock. The
    /// order then flips to [`OrderState::New`] and an `OrderPlaced` event is
    /// emitted once the transaction has committed.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`]; on every error path no stock has been
    /// decremented and the basket is still a basket.
    #[instrument(skip(self), fields(buyer = %buyer))]
    pub async fn place_order(
        &self,
        buyer: UserId,
        contact_id: Option<ContactId>,
    ) -> Result<PlacedOrder, CheckoutError> {
        // Preconditions, cheapest first, before opening the transaction.
        let order_id = orders::basket_id(self.pool, buyer)
            .await?
            .ok_or(CheckoutError::BasketNotFound)?;

        if orders::line_count(self.pool, order_id).await? == 0 {
            return Err(CheckoutError::EmptyBasket);
        }

        let contact_id = contact_id.ok_or(CheckoutError::MissingContact)?;
        let contact = contacts::get_owned(self.pool, buyer, contact_id)
            .await?
            .ok_or(CheckoutError::ContactNotFound)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let lines = orders::lines_with_availability(&mut tx, order_id).await?;

        let mut survivors = 0usize;
        let mut composition_changed = false;
        for line in &lines {
            // A vanished stock row reads as zero availability.
            let available = line.available.unwrap_or(0);

            if available == 0 {
                orders::delete_line(&mut tx, line.line_id).await?;
                composition_changed = true;
                continue;
            }

            let effective = line.quantity.min(available);
            if effective != line.quantity {
                orders::set_line_quantity(&mut tx, line.line_id, effective).await?;
                composition_changed = true;
            }

            if !stock::decrement(&mut tx, line.stock_id, effective).await? {
                // The availability read above is stale: another committer got
                // between it and the decrement. Undo everything and let the
                // caller retry.
                tx.rollback().await.map_err(RepositoryError::from)?;
                return Err(CheckoutError::InsufficientStock {
                    stock_id: line.stock_id,
                });
            }
            survivors += 1;
        }

        if survivors == 0 {
            // Nothing left to sell. The pruning of dead lines is kept (the
            // buyer's basket no longer lists unbuyable items) but no stock
            // was touched and the order stays a basket.
            tx.commit().await.map_err(RepositoryError::from)?;
            return Err(CheckoutError::NoAvailableItems);
        }

        orders::mark_placed(&mut tx, order_id, contact.id).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        // Outside the transaction: a notification failure must not unwind
        // the committed order.
        self.notifier.order_placed(buyer, order_id);

        let order = orders::fetch_order(self.pool, order_id).await?;
        debug_assert_eq!(order.state, OrderState::New);

        Ok(PlacedOrder {
            order,
            composition_changed,
        })
    }
}
