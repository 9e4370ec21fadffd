//! Order-line quantity bounds.
//!
//! A single order line carries between 1 and 100 units; requests without an
//! explicit quantity get [`DEFAULT_LINE_QUANTITY`]. Availability ceilings are
//! enforced separately, against live stock, by the basket and checkout
//! services.

/// Smallest quantity a line may carry.
pub const MIN_LINE_QUANTITY: i64 = 1;

/// Largest quantity a line may carry.
pub const MAX_LINE_QUANTITY: i64 = 100;

/// Quantity used when a basket add omits one.
pub const DEFAULT_LINE_QUANTITY: i64 = 1;

/// Whether `quantity` lies within the per-line bounds.
#[must_use]
pub const fn line_quantity_in_bounds(quantity: i64) -> bool {
    MIN_LINE_QUANTITY <= quantity && quantity <= MAX_LINE_QUANTITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(line_quantity_in_bounds(MIN_LINE_QUANTITY));
        assert!(line_quantity_in_bounds(MAX_LINE_QUANTITY));
        assert!(line_quantity_in_bounds(DEFAULT_LINE_QUANTITY));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        assert!(!line_quantity_in_bounds(0));
        assert!(!line_quantity_in_bounds(-3));
        assert!(!line_quantity_in_bounds(101));
    }
}
