//! Import orchestration
//!
//! Each picked file is read under scoped access, its tags extracted, the
//! audio payload and artwork copied into the blob store and a track record
//! created. A failing file never aborts the batch.

use crate::metadata::{file_extension, read_tags, ExtractedTags};
use crate::scope::{AccessGuard, SecurityScope};
use crate::{ImportError, Result};
use bass_core::{BlobId, BlobStore, CreateTrack, LocationRef, Track, TrackStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Audio formats accepted by the importer
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "wav", "aiff", "aif", "flac"];

/// Outcome of one import batch
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub imported: Vec<Track>,
    pub failed: Vec<ImportFailure>,
}

/// A file that could not be imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Imports picked audio files into the library
pub struct TrackImporter {
    tracks: Arc<dyn TrackStore>,
    blobs: Arc<dyn BlobStore>,
    scope: Arc<dyn SecurityScope>,
}

impl TrackImporter {
    pub fn new(
        tracks: Arc<dyn TrackStore>,
        blobs: Arc<dyn BlobStore>,
        scope: Arc<dyn SecurityScope>,
    ) -> Self {
        Self {
            tracks,
            blobs,
            scope,
        }
    }

    /// Import a batch of files in order
    pub async fn import(&self, paths: Vec<PathBuf>) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for path in paths {
            match self.import_file(&path).await {
                Ok(track) => summary.imported.push(track),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Import failed");
                    summary.failed.push(ImportFailure {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            imported = summary.imported.len(),
            failed = summary.failed.len(),
            "Import batch finished"
        );
        summary
    }

    /// Import a single file
    ///
    /// # Errors
    /// Returns an error if access is refused, the format is unsupported, the
    /// tags cannot be read or the library cannot be written. Blobs saved
    /// before a failure are removed again.
    pub async fn import_file(&self, path: &Path) -> Result<Track> {
        let extension = file_extension(path)
            .filter(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| ImportError::UnsupportedFormat(path.display().to_string()))?;

        let (tags, bytes) = {
            let _access = AccessGuard::acquire(self.scope.as_ref(), path)
                .ok_or_else(|| ImportError::AccessDenied(path.to_path_buf()))?;

            let tags = Self::read_tags_blocking(path.to_path_buf()).await?;
            let bytes = tokio::fs::read(path).await?;
            (tags, bytes)
        };

        debug!(
            path = %path.display(),
            title = %tags.title,
            artist = %tags.artist,
            duration = tags.duration_seconds,
            "Tags extracted"
        );

        let mut saved = Vec::new();
        match self.store(tags, &bytes, &extension, &mut saved).await {
            Ok(track) => Ok(track),
            Err(e) => {
                self.discard(&saved).await;
                Err(e)
            }
        }
    }

    async fn read_tags_blocking(path: PathBuf) -> Result<ExtractedTags> {
        tokio::task::spawn_blocking(move || read_tags(&path))
            .await
            .map_err(|e| ImportError::Task(e.to_string()))?
    }

    async fn store(
        &self,
        tags: ExtractedTags,
        bytes: &[u8],
        extension: &str,
        saved: &mut Vec<BlobId>,
    ) -> Result<Track> {
        let audio_id = self.blobs.save(bytes, Some(extension)).await?;
        saved.push(audio_id.clone());
        let location = LocationRef::for_blob(audio_id.clone(), self.blobs.path_for(&audio_id)?);

        let mut track = CreateTrack::new(tags.title, tags.artist, tags.duration_seconds, location)
            .with_audio_blob(audio_id);

        if let Some(artwork) = tags.artwork {
            let artwork_id = self
                .blobs
                .save(&artwork.data, Some(artwork.extension))
                .await?;
            saved.push(artwork_id.clone());
            track = track.with_artwork(artwork_id);
        }

        Ok(self.tracks.create(track).await?)
    }

    async fn discard(&self, saved: &[BlobId]) {
        for blob_id in saved {
            if let Err(e) = self.blobs.delete(blob_id).await {
                warn!(blob_id = %blob_id, error = %e, "Failed to discard blob");
            }
        }
    }
}
