//! Bass Booster Storage
//!
//! `SQLite` persistence for the track library, a filesystem blob store for
//! audio payloads and artwork, and resolution of move-tolerant bookmarks.
//!
//! # Architecture
//!
//! - **Tracks**: query functions in [`tracks`], exposed through
//!   [`SqliteTrackStore`] as a [`bass_core::TrackStore`]
//! - **Blobs**: [`FsBlobStore`] keeps one file per blob in an app-private
//!   directory
//! - **Bookmarks**: [`BookmarkResolver`] turns a stored `LocationRef` into a
//!   readable path, re-deriving blob paths when the container moved
//! - **Library**: [`Library`] is the mutation surface used by the UI layer;
//!   failures are logged and reported as `None`
//!
//! # Example
//!
//! ```rust,no_run
//! use bass_core::{TrackFilter, TrackStore};
//! use bass_storage::{create_pool, run_migrations, SqliteTrackStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://bass.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteTrackStore::new(pool);
//! let favorites = store.list(TrackFilter::Favorites).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod blobs;
mod context;
mod error;
mod library;
mod resolver;

pub mod tracks;

pub use blobs::FsBlobStore;
pub use context::SqliteTrackStore;
pub use error::{Result, StorageError};
pub use library::Library;
pub use resolver::BookmarkResolver;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before the pool is handed to a store.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://bass.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;
    use std::time::Duration;

    debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        // WAL lets the tick-driven reads proceed while an import writes
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!("SQLite pool ready");

    Ok(pool)
}
