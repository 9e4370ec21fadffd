//! Domain models.
//!
//! These types represent validated domain objects separate from database row
//! types; repositories map rows into them at the query boundary.

pub mod contact;
pub mod order;
pub mod principal;
pub mod stock;

pub use contact::{Contact, CreateContactInput, UpdateContactInput};
pub use order::{Order, OrderLine};
pub use principal::Principal;
pub use stock::{StockFilter, StockItem};
