//! Filesystem blob store
//!
//! One file per blob, named by its id, inside a single app-private
//! directory.

use async_trait::async_trait;
use bass_core::{BassError, BlobId, BlobStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StorageError;

/// Blob store writing into a directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open a blob store, creating the directory if needed
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created
    pub async fn open(root: impl Into<PathBuf>) -> crate::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "Blob store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, id: &BlobId) -> crate::Result<PathBuf> {
        if !id.is_safe_file_name() {
            return Err(StorageError::UnsafeBlobId(id.to_string()));
        }
        Ok(self.root.join(id.as_str()))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn save(&self, bytes: &[u8], extension: Option<&str>) -> bass_core::Result<BlobId> {
        let id = BlobId::generate(extension);
        let path = self.file_path(&id)?;

        // Readers only ever see complete blobs
        let partial = path.with_extension("partial");
        tokio::fs::write(&partial, bytes).await?;
        tokio::fs::rename(&partial, &path).await?;

        debug!(blob_id = %id, size = bytes.len(), "Blob saved");
        Ok(id)
    }

    async fn load(&self, id: &BlobId) -> bass_core::Result<Vec<u8>> {
        let path = self.file_path(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BassError::BlobNotFound(id.clone())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: &BlobId) -> bass_core::Result<()> {
        let path = self.file_path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(blob_id = %id, "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(blob_id = %id, "Deleting a blob that does not exist");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, id: &BlobId) -> bass_core::Result<PathBuf> {
        Ok(self.file_path(id)?)
    }
}
