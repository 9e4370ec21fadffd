//! Catalog repository: shops, categories, products, and stock listings.
//!
//! Feed ingestion is an external collaborator that replaces stock rows
//! wholesale; the creation functions here exist for the seed tooling and
//! tests, not for a shop-facing upload path.

use orderflow_core::{CategoryId, ProductId, ShopId, StockId, UserId};
use rust_decimal::Decimal;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::RepositoryError;
use crate::models::{StockFilter, StockItem};

/// Row shape shared by the stock queries.
#[derive(Debug, FromRow)]
struct StockRow {
    id: i64,
    shop_id: i64,
    shop_name: String,
    product_id: i64,
    product_name: String,
    category: String,
    model: Option<String>,
    external_id: i64,
    price: String,
    price_rrp: String,
    quantity: i64,
}

impl StockRow {
    fn into_item(self) -> Result<StockItem, RepositoryError> {
        Ok(StockItem {
            id: StockId::new(self.id),
            shop_id: ShopId::new(self.shop_id),
            shop_name: self.shop_name,
            product_id: ProductId::new(self.product_id),
            product_name: self.product_name,
            category: self.category,
            model: self.model,
            external_id: self.external_id,
            price: parse_price(&self.price)?,
            price_rrp: parse_price(&self.price_rrp)?,
            quantity: self.quantity,
        })
    }
}

/// Parse a stored decimal price.
///
/// Prices are written by the catalog import as exact decimal strings; a
/// value that does not parse is corrupt, not a user error.
pub(crate) fn parse_price(raw: &str) -> Result<Decimal, RepositoryError> {
    raw.parse().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid price in database: {raw:?}: {e}"))
    })
}

const STOCK_SELECT: &str = r"
    SELECT ss.id, ss.shop_id, s.name AS shop_name,
           ss.product_id, p.name AS product_name, c.name AS category,
           ss.model, ss.external_id, ss.price, ss.price_rrp, ss.quantity
    FROM shop_stock ss
    JOIN shop s ON s.id = ss.shop_id
    JOIN product p ON p.id = ss.product_id
    JOIN category c ON c.id = p.category_id
";

/// Browse stock listings of shops currently accepting orders.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails, or
/// `DataCorruption` for unparseable stored prices.
pub async fn list_stock(
    pool: &SqlitePool,
    filter: &StockFilter,
) -> Result<Vec<StockItem>, RepositoryError> {
    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(STOCK_SELECT);
    qb.push(" WHERE s.accepts_orders = 1");

    if let Some(shop_id) = filter.shop_id {
        qb.push(" AND ss.shop_id = ").push_bind(shop_id);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(product) = &filter.product {
        qb.push(" AND p.name LIKE '%' || ")
            .push_bind(product.as_str())
            .push(" || '%'");
    }
    qb.push(" ORDER BY ss.id");

    let rows: Vec<StockRow> = qb.build_query_as().fetch_all(pool).await?;
    rows.into_iter().map(StockRow::into_item).collect()
}

/// A shop owner's own listings, regardless of the accepts-orders flag.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user owns no shop.
pub async fn list_own_stock(
    pool: &SqlitePool,
    owner: UserId,
) -> Result<Vec<StockItem>, RepositoryError> {
    let shop_id = shop_id_for_owner(pool, owner)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(STOCK_SELECT);
    qb.push(" WHERE ss.shop_id = ").push_bind(shop_id);
    qb.push(" ORDER BY ss.id");

    let rows: Vec<StockRow> = qb.build_query_as().fetch_all(pool).await?;
    rows.into_iter().map(StockRow::into_item).collect()
}

/// The shop owned by `owner`, if any.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn shop_id_for_owner(
    pool: &SqlitePool,
    owner: UserId,
) -> Result<Option<ShopId>, RepositoryError> {
    let id: Option<(i64,)> = sqlx::query_as("SELECT id FROM shop WHERE user_id = ?1")
        .bind(owner)
        .fetch_optional(pool)
        .await?;
    Ok(id.map(|(id,)| ShopId::new(id)))
}

// =============================================================================
// Seed support
// =============================================================================

/// Create a shop owned by `owner`.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the owner already has a shop.
pub async fn create_shop(
    pool: &SqlitePool,
    owner: UserId,
    name: &str,
) -> Result<ShopId, RepositoryError> {
    let result = sqlx::query("INSERT INTO shop (name, user_id) VALUES (?1, ?2)")
        .bind(name)
        .bind(owner)
        .execute(pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "user already owns a shop"))?;
    Ok(ShopId::new(result.last_insert_rowid()))
}

/// Create a category, reusing an existing row with the same name.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the queries fail.
pub async fn ensure_category(pool: &SqlitePool, name: &str) -> Result<CategoryId, RepositoryError> {
    sqlx::query("INSERT INTO category (name) VALUES (?1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    let (id,): (i64,) = sqlx::query_as("SELECT id FROM category WHERE name = ?1")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(CategoryId::new(id))
}

/// Create a product.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn create_product(
    pool: &SqlitePool,
    name: &str,
    category_id: CategoryId,
) -> Result<ProductId, RepositoryError> {
    let result = sqlx::query("INSERT INTO product (name, category_id) VALUES (?1, ?2)")
        .bind(name)
        .bind(category_id)
        .execute(pool)
        .await?;
    Ok(ProductId::new(result.last_insert_rowid()))
}

/// Parameters for creating a stock listing.
#[derive(Debug, Clone)]
pub struct NewStock {
    pub shop_id: ShopId,
    pub product_id: ProductId,
    pub external_id: i64,
    pub model: Option<String>,
    pub price: Decimal,
    pub price_rrp: Decimal,
    pub quantity: i64,
}

/// Create a stock listing.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` for a duplicate
/// (product, shop, external id) triple.
pub async fn create_stock(pool: &SqlitePool, stock: &NewStock) -> Result<StockId, RepositoryError> {
    let result = sqlx::query(
        r"
        INSERT INTO shop_stock (shop_id, product_id, external_id, model, price, price_rrp, quantity)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ",
    )
    .bind(stock.shop_id)
    .bind(stock.product_id)
    .bind(stock.external_id)
    .bind(&stock.model)
    .bind(stock.price.to_string())
    .bind(stock.price_rrp.to_string())
    .bind(stock.quantity)
    .execute(pool)
    .await
    .map_err(|e| RepositoryError::from_sqlx(e, "stock listing already exists"))?;

    Ok(StockId::new(result.last_insert_rowid()))
}
