//! Order and order-line repository.
//!
//! Baskets are orders in state `basket`; a partial unique index guarantees at
//! most one per buyer, which makes `get_or_create_basket` idempotent under
//! concurrent first writes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use orderflow_core::{
    ContactId, OrderId, OrderLineId, OrderState, ShopId, StockId, UserId,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::{RepositoryError, catalog::parse_price, contacts};
use crate::models::{Order, OrderLine};

// =============================================================================
// Basket lifecycle
// =============================================================================

/// The buyer's basket order id, if one exists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn basket_id(
    pool: &SqlitePool,
    buyer: UserId,
) -> Result<Option<OrderId>, RepositoryError> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM orders WHERE user_id = ?1 AND state = 'basket'")
            .bind(buyer)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(id,)| OrderId::new(id)))
}

/// Get the buyer's basket, creating it if absent.
///
/// The insert races with concurrent first writes for the same buyer; the
/// partial unique index plus `ON CONFLICT DO NOTHING` makes the loser of the
/// race fall through to the re-select.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the queries fail.
pub async fn get_or_create_basket(
    conn: &mut SqliteConnection,
    buyer: UserId,
) -> Result<OrderId, RepositoryError> {
    sqlx::query("INSERT INTO orders (user_id, state) VALUES (?1, 'basket') ON CONFLICT DO NOTHING")
        .bind(buyer)
        .execute(&mut *conn)
        .await?;

    let (id,): (i64,) =
        sqlx::query_as("SELECT id FROM orders WHERE user_id = ?1 AND state = 'basket'")
            .bind(buyer)
            .fetch_one(&mut *conn)
            .await?;
    Ok(OrderId::new(id))
}

// =============================================================================
// Line mutation
// =============================================================================

/// Upsert a line on an order: a second add of the same stock listing
/// overwrites the quantity instead of duplicating the line.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` for a constraint race,
/// `RepositoryError::Database` otherwise.
pub async fn upsert_line(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    stock_id: StockId,
    quantity: i64,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO order_line (order_id, stock_id, quantity)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (order_id, stock_id) DO UPDATE SET quantity = excluded.quantity
        ",
    )
    .bind(order_id)
    .bind(stock_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await
    .map_err(|e| RepositoryError::from_sqlx(e, "order line changed concurrently"))?;
    Ok(())
}

/// A line of an order together with the live availability of its stock.
#[derive(Debug, Clone, Copy)]
pub struct LineAvailability {
    pub line_id: OrderLineId,
    pub stock_id: StockId,
    pub quantity: i64,
    /// `None` when the stock row has been deleted (treated as zero).
    pub available: Option<i64>,
}

/// Look up one line of `order_id` with its stock's current availability.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn line_with_availability(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    line_id: OrderLineId,
) -> Result<Option<LineAvailability>, RepositoryError> {
    let row: Option<(i64, i64, i64, Option<i64>)> = sqlx::query_as(
        r"
        SELECT ol.id, ol.stock_id, ol.quantity, ss.quantity
        FROM order_line ol
        LEFT JOIN shop_stock ss ON ss.id = ol.stock_id
        WHERE ol.id = ?1 AND ol.order_id = ?2
        ",
    )
    .bind(line_id)
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|(line_id, stock_id, quantity, available)| LineAvailability {
        line_id: OrderLineId::new(line_id),
        stock_id: StockId::new(stock_id),
        quantity,
        available,
    }))
}

/// All lines of `order_id` with live stock availability, in line-id order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lines_with_availability(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Vec<LineAvailability>, RepositoryError> {
    let rows: Vec<(i64, i64, i64, Option<i64>)> = sqlx::query_as(
        r"
        SELECT ol.id, ol.stock_id, ol.quantity, ss.quantity
        FROM order_line ol
        LEFT JOIN shop_stock ss ON ss.id = ol.stock_id
        WHERE ol.order_id = ?1
        ORDER BY ol.id
        ",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(line_id, stock_id, quantity, available)| LineAvailability {
            line_id: OrderLineId::new(line_id),
            stock_id: StockId::new(stock_id),
            quantity,
            available,
        })
        .collect())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the line does not exist.
pub async fn set_line_quantity(
    conn: &mut SqliteConnection,
    line_id: OrderLineId,
    quantity: i64,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE order_line SET quantity = ?1 WHERE id = ?2")
        .bind(quantity)
        .bind(line_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Delete one line.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete_line(
    conn: &mut SqliteConnection,
    line_id: OrderLineId,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM order_line WHERE id = ?1")
        .bind(line_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Bulk-delete lines of an order by id, returning how many matched.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete_lines(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    line_ids: &[OrderLineId],
) -> Result<u64, RepositoryError> {
    if line_ids.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new("DELETE FROM order_line WHERE order_id = ");
    qb.push_bind(order_id);
    qb.push(" AND id IN (");
    let mut ids = qb.separated(", ");
    for id in line_ids {
        ids.push_bind(*id);
    }
    qb.push(")");

    let result = qb.build().execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

/// Number of lines on an order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn line_count(pool: &SqlitePool, order_id: OrderId) -> Result<i64, RepositoryError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_line WHERE order_id = ?1")
        .bind(order_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Attach the delivery contact and flip the order into the placed state.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order is gone or no longer a
/// basket.
pub async fn mark_placed(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    contact_id: ContactId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE orders SET contact_id = ?1, state = 'new' WHERE id = ?2 AND state = 'basket'",
    )
    .bind(contact_id)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

// =============================================================================
// Hydration and listings
// =============================================================================

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    contact_id: Option<i64>,
    state: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct LineRow {
    id: i64,
    order_id: i64,
    stock_id: i64,
    quantity: i64,
    product_name: String,
    shop_id: i64,
    shop_name: String,
    price: String,
}

impl LineRow {
    fn into_line(self) -> Result<OrderLine, RepositoryError> {
        let price = parse_price(&self.price)?;
        Ok(OrderLine {
            id: OrderLineId::new(self.id),
            stock_id: StockId::new(self.stock_id),
            product_name: self.product_name,
            shop_id: ShopId::new(self.shop_id),
            shop_name: self.shop_name,
            quantity: self.quantity,
            price,
            line_total: price * Decimal::from(self.quantity),
        })
    }
}

const LINE_SELECT: &str = r"
    SELECT ol.id, ol.order_id, ol.stock_id, ol.quantity,
           p.name AS product_name, s.id AS shop_id, s.name AS shop_name, ss.price
    FROM order_line ol
    JOIN shop_stock ss ON ss.id = ol.stock_id
    JOIN product p ON p.id = ss.product_id
    JOIN shop s ON s.id = ss.shop_id
";

async fn hydrate(
    pool: &SqlitePool,
    rows: Vec<OrderRow>,
) -> Result<Vec<Order>, RepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(LINE_SELECT);
    qb.push(" WHERE ol.order_id IN (");
    let mut ids = qb.separated(", ");
    for row in &rows {
        ids.push_bind(row.id);
    }
    qb.push(") ORDER BY ol.id");

    let line_rows: Vec<LineRow> = qb.build_query_as().fetch_all(pool).await?;

    let mut lines_by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for line in line_rows {
        let order_id = line.order_id;
        lines_by_order
            .entry(order_id)
            .or_default()
            .push(line.into_line()?);
    }

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let state: OrderState = row.state.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order state in database: {e}"))
        })?;

        let contact = match row.contact_id {
            Some(contact_id) => {
                contacts::get_owned(pool, UserId::new(row.user_id), ContactId::new(contact_id))
                    .await?
            }
            None => None,
        };

        let lines = lines_by_order.remove(&row.id).unwrap_or_default();
        let total = Order::compute_total(&lines);
        orders.push(Order {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            state,
            created_at: row.created_at,
            contact,
            lines,
            total,
        });
    }
    Ok(orders)
}

/// Fetch one order with lines, contact, and total.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order does not exist.
pub async fn fetch_order(pool: &SqlitePool, order_id: OrderId) -> Result<Order, RepositoryError> {
    let row: Option<OrderRow> = sqlx::query_as(
        "SELECT id, user_id, contact_id, state, created_at FROM orders WHERE id = ?1",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;

    let row = row.ok_or(RepositoryError::NotFound)?;
    let mut orders = hydrate(pool, vec![row]).await?;
    orders.pop().ok_or(RepositoryError::NotFound)
}

/// The buyer's placed orders (everything except the basket), newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_buyer_orders(
    pool: &SqlitePool,
    buyer: UserId,
) -> Result<Vec<Order>, RepositoryError> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        r"
        SELECT id, user_id, contact_id, state, created_at
        FROM orders
        WHERE user_id = ?1 AND state != 'basket'
        ORDER BY created_at DESC, id DESC
        ",
    )
    .bind(buyer)
    .fetch_all(pool)
    .await?;

    hydrate(pool, rows).await
}

/// Placed orders containing at least one line from the given shop, newest
/// first. Lines from other shops stay visible so the shop sees the whole
/// order it is part of.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_shop_orders(
    pool: &SqlitePool,
    shop_id: ShopId,
) -> Result<Vec<Order>, RepositoryError> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        r"
        SELECT DISTINCT o.id, o.user_id, o.contact_id, o.state, o.created_at
        FROM orders o
        JOIN order_line ol ON ol.order_id = o.id
        JOIN shop_stock ss ON ss.id = ol.stock_id
        WHERE ss.shop_id = ?1 AND o.state != 'basket'
        ORDER BY o.created_at DESC, o.id DESC
        ",
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    hydrate(pool, rows).await
}
