//! Bookmark resolution
//!
//! A bookmark records the last known path of an audio file and, for files
//! copied into the app container, the blob id. The container path can change
//! between launches, so blob bookmarks are re-derived from the blob store
//! and refreshed when the stored path is out of date.

use bass_core::{BassError, BlobStore, LocationRef, LocationResolver, Resolution, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves bookmarks against the filesystem and the blob store
pub struct BookmarkResolver {
    blobs: Arc<dyn BlobStore>,
}

impl BookmarkResolver {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }
}

impl LocationResolver for BookmarkResolver {
    fn resolve(&self, location: &LocationRef) -> Result<Resolution> {
        let (last_known, blob_id) = location.decode()?;

        if let Some(blob_id) = blob_id {
            let current = self.blobs.path_for(&blob_id)?;
            if is_file(&current) {
                if current == last_known {
                    return Ok(Resolution::Fresh(current));
                }
                debug!(
                    blob_id = %blob_id,
                    from = %last_known.display(),
                    to = %current.display(),
                    "Bookmark relocated"
                );
                let refreshed = LocationRef::for_blob(blob_id, current.clone());
                return Ok(Resolution::Relocated {
                    path: current,
                    refreshed,
                });
            }
            warn!(blob_id = %blob_id, "Blob behind bookmark is missing");
        }

        if is_file(&last_known) {
            Ok(Resolution::Fresh(last_known))
        } else {
            Err(BassError::StaleLocation(last_known.display().to_string()))
        }
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FsBlobStore;
    use bass_core::BlobId;

    async fn setup() -> (tempfile::TempDir, Arc<FsBlobStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path().join("blobs")).await.unwrap();
        (dir, Arc::new(store))
    }

    #[tokio::test]
    async fn plain_path_resolves_fresh() {
        let (dir, blobs) = setup().await;
        let file = dir.path().join("song.mp3");
        std::fs::write(&file, b"audio").unwrap();

        let resolver = BookmarkResolver::new(blobs);
        let resolution = resolver.resolve(&LocationRef::for_path(&file)).unwrap();

        assert_eq!(resolution, Resolution::Fresh(file));
    }

    #[tokio::test]
    async fn missing_file_is_stale() {
        let (dir, blobs) = setup().await;
        let resolver = BookmarkResolver::new(blobs);

        let err = resolver
            .resolve(&LocationRef::for_path(dir.path().join("gone.mp3")))
            .unwrap_err();

        assert!(matches!(err, BassError::StaleLocation(_)));
    }

    #[tokio::test]
    async fn undecodable_bookmark_is_invalid() {
        let (_dir, blobs) = setup().await;
        let resolver = BookmarkResolver::new(blobs);

        let err = resolver.resolve(&LocationRef::from_raw("garbage")).unwrap_err();

        assert!(matches!(err, BassError::InvalidLocation(_)));
    }

    #[tokio::test]
    async fn moved_container_relocates_blob_bookmark() {
        let (_dir, blobs) = setup().await;
        let id = blobs.save(b"audio", Some("mp3")).await.unwrap();
        let current = blobs.path_for(&id).unwrap();
        let stale = LocationRef::for_blob(id.clone(), "/old/container/blobs/x.mp3");

        let resolver = BookmarkResolver::new(blobs.clone());
        let resolution = resolver.resolve(&stale).unwrap();

        match resolution {
            Resolution::Relocated { path, refreshed } => {
                assert_eq!(path, current);
                // The refreshed bookmark now resolves fresh
                assert_eq!(
                    resolver.resolve(&refreshed).unwrap(),
                    Resolution::Fresh(current)
                );
            }
            other => panic!("expected relocation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deleted_blob_is_stale() {
        let (_dir, blobs) = setup().await;
        let id = BlobId::new("never-saved.mp3");
        let location = LocationRef::for_blob(id, "/old/container/blobs/never-saved.mp3");

        let err = BookmarkResolver::new(blobs).resolve(&location).unwrap_err();

        assert!(err.is_location_error());
    }
}
