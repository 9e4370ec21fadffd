//! The authenticated principal.

use orderflow_core::{UserId, UserRole};

/// An authenticated caller, resolved from a bearer token.
///
/// Identity management is external; the backend trusts this (id, role) pair
/// and threads it explicitly through every basket and order operation.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Unique user ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Email address notifications go to.
    pub email: String,
    /// Whether the caller is a shop or a buyer.
    pub role: UserRole,
}
