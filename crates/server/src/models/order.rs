//! Order domain types.

use chrono::{DateTime, Utc};
use orderflow_core::{OrderId, OrderLineId, OrderState, ShopId, StockId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Contact;

/// One (stock, quantity) pairing within an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    /// Unique line ID.
    pub id: OrderLineId,
    /// The stock listing this line buys from.
    pub stock_id: StockId,
    /// Product display name.
    pub product_name: String,
    /// Shop the stock belongs to.
    pub shop_id: ShopId,
    /// Shop display name.
    pub shop_name: String,
    /// Units requested (basket) or fulfilled (placed order).
    pub quantity: i64,
    /// Unit price at the listing.
    pub price: Decimal,
    /// `quantity * price`.
    pub line_total: Decimal,
}

/// A basket or placed order with its hydrated lines.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning buyer.
    pub user_id: UserId,
    /// Lifecycle state.
    pub state: OrderState,
    /// When the order (as a basket) was created.
    pub created_at: DateTime<Utc>,
    /// Delivery contact, attached at placement.
    pub contact: Option<Contact>,
    /// The order's lines.
    pub lines: Vec<OrderLine>,
    /// Σ line totals.
    pub total: Decimal,
}

impl Order {
    /// Recompute `total` from the lines.
    pub(crate) fn compute_total(lines: &[OrderLine]) -> Decimal {
        lines.iter().map(|line| line.line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(quantity: i64, price: &str) -> OrderLine {
        let price: Decimal = price.parse().unwrap();
        OrderLine {
            id: OrderLineId::new(1),
            stock_id: StockId::new(1),
            product_name: "widget".to_owned(),
            shop_id: ShopId::new(1),
            shop_name: "shop".to_owned(),
            quantity,
            price,
            line_total: price * Decimal::from(quantity),
        }
    }

    #[test]
    fn test_total_is_exact_decimal_sum() {
        let lines = vec![line(3, "19.99"), line(1, "0.01")];
        assert_eq!(Order::compute_total(&lines), "59.98".parse().unwrap());
    }

    #[test]
    fn test_total_of_no_lines_is_zero() {
        assert_eq!(Order::compute_total(&[]), Decimal::ZERO);
    }
}
