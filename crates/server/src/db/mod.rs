//! Database operations for the order backend.
//!
//! # Tables
//!
//! - `user` / `auth_token` - principals and the opaque tokens that resolve them
//! - `contact` - buyers' delivery contacts
//! - `shop` / `category` / `product` / `shop_stock` - the published catalog
//! - `orders` / `order_line` - baskets and placed orders
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p orderflow-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub mod catalog;
pub mod contacts;
pub mod orders;
pub mod stock;
pub mod users;

/// Embedded migrations for this crate's schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors from the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row not found where one was required.
    #[error("not found")]
    NotFound,

    /// Unique-constraint conflict; safe to retry.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be interpreted (bad price, state, or role).
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into [`Self::Conflict`].
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Enables WAL journaling, foreign-key enforcement, and a busy timeout that
/// bounds how long a transaction waits on the write lock.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be
/// opened.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
