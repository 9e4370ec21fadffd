//! The inventory ledger: per-listing availability reads and decrements.
//!
//! `shop_stock.quantity` is the only cross-request shared mutable value in
//! the system. Both functions here run on the caller's transaction so the
//! read and the dependent writes commit or roll back together, and the
//! decrement is a guarded single-statement update: a concurrent committer
//! cannot interleave between the guard and the subtraction, so the quantity
//! can never go negative.

use orderflow_core::StockId;
use sqlx::SqliteConnection;

use super::RepositoryError;

/// Current availability of a stock listing, read inside the caller's
/// transaction.
///
/// Returns `None` when the listing no longer exists (catalog re-imports may
/// delete rows out from under a basket); callers treat that as zero
/// availability.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn available_quantity(
    conn: &mut SqliteConnection,
    stock_id: StockId,
) -> Result<Option<i64>, RepositoryError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT quantity FROM shop_stock WHERE id = ?1")
        .bind(stock_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(|(quantity,)| quantity))
}

/// Atomically subtract `amount` units, refusing to go below zero.
///
/// Returns `false` when fewer than `amount` units remain (or the row is
/// gone); the caller decides whether that is a retryable conflict.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn decrement(
    conn: &mut SqliteConnection,
    stock_id: StockId,
    amount: i64,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE shop_stock
        SET quantity = quantity - ?1
        WHERE id = ?2 AND quantity >= ?1
        ",
    )
    .bind(amount)
    .bind(stock_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
