//! Vibe Player Storage
//!
//! Local `SQLite` persistence for the account/economy core.
//!
//! The economy store and username slot store survive reloads by writing
//! their records here after every mutation. All tables are keyed per user
//! id, so switching accounts on the same device never leaks one user's
//! state into another's view.
//!
//! # Example
//!
//! ```rust,no_run
//! use vibe_storage::{create_pool, run_migrations, economy};
//! use vibe_core::types::UserId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://vibe.db").await?;
//! run_migrations(&pool).await?;
//!
//! let snapshot = economy::get(&pool, &UserId::new("u-1")).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod error;

// Vertical slices
pub mod economy;
pub mod username_slots;

pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://vibe.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    // In-memory databases are per-connection; more than one pool connection
    // would silently split the data across separate databases.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}
