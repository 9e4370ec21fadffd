//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! orderflow migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ORDERFLOW_DATABASE_URL` - `SQLite` connection string
//!   (falls back to `DATABASE_URL`)

use orderflow_server::config::ServerConfig;
use orderflow_server::db;

/// Run pending migrations against the configured database.
///
/// # Errors
///
/// Returns an error if configuration, connection, or migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
