//! Stock listing domain types.

use orderflow_core::{CategoryId, ProductId, ShopId, StockId};
use rust_decimal::Decimal;
use serde::Serialize;

/// One shop's priced listing of one product, as exposed to browse and basket
/// callers.
#[derive(Debug, Clone, Serialize)]
pub struct StockItem {
    /// Unique stock listing ID.
    pub id: StockId,
    /// Shop publishing the listing.
    pub shop_id: ShopId,
    /// Shop display name.
    pub shop_name: String,
    /// Product being listed.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Product category.
    pub category: String,
    /// Manufacturer model, when the feed carried one.
    pub model: Option<String>,
    /// The shop's identifier for this listing in its own catalog.
    pub external_id: i64,
    /// Unit price.
    pub price: Decimal,
    /// Recommended retail price.
    pub price_rrp: Decimal,
    /// Units currently available.
    pub quantity: i64,
}

/// Filters for browsing stock listings.
#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    /// Only listings from this shop.
    pub shop_id: Option<ShopId>,
    /// Only products in this category.
    pub category_id: Option<CategoryId>,
    /// Case-insensitive product-name substring.
    pub product: Option<String>,
}
