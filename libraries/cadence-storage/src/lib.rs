//! Cadence Storage
//!
//! `SQLite` database layer for tracks, playlists and watch paths.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each collection owns its own queries (`tracks`,
//!   `playlists`, `watch_paths`)
//! - **Versioned Records**: every row carries a `version` bumped on update
//! - **Ordered Membership**: playlist order lives in `playlist_tracks.position`
//!   and is rewritten inside a transaction on every change
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{LocalStorageContext, create_pool, run_migrations};
//! use cadence_core::storage::StorageContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorageContext::new(pool);
//! let playlists = storage.get_all_playlists().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod time;

// Vertical slices
pub mod playlists;
pub mod tracks;
pub mod watch_paths;

pub use context::LocalStorageContext;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup so the schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://cadence.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::info!(url = database_url, "SQLite pool ready");

    Ok(pool)
}
