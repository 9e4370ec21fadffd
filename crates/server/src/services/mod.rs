//! Business services.
//!
//! - [`basket`] - the buyer's mutable pre-order line collection
//! - [`checkout`] - the basket → placed-order transition against live stock
//! - [`orders`] - read-side order listings for buyers and shops
//! - [`notify`] - post-commit order notifications

pub mod basket;
pub mod checkout;
pub mod notify;
pub mod orders;
