//! Opening the on-disk library

use crate::config::StorageSettings;
use crate::error::Result;
use bass_storage::{create_pool, run_migrations, BookmarkResolver, FsBlobStore, SqliteTrackStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Storage collaborators backed by `SQLite` and the blob directory
pub struct LibraryStorage {
    pub tracks: Arc<SqliteTrackStore>,
    pub blobs: Arc<FsBlobStore>,
    pub resolver: Arc<BookmarkResolver>,
}

/// Open the database and blob directory, running migrations
pub async fn open_storage(settings: &StorageSettings) -> Result<LibraryStorage> {
    let blobs = Arc::new(FsBlobStore::open(&settings.blob_dir).await?);

    if let Some(parent) = database_file(&settings.database_url).and_then(Path::parent) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(bass_storage::StorageError::from)?;
    }

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;
    info!(database_url = %settings.database_url, "Library storage opened");

    Ok(LibraryStorage {
        tracks: Arc::new(SqliteTrackStore::new(pool)),
        resolver: Arc::new(BookmarkResolver::new(blobs.clone())),
        blobs,
    })
}

fn database_file(url: &str) -> Option<&Path> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    (!path.is_empty() && !path.starts_with(":memory:")).then_some(Path::new(path))
}
