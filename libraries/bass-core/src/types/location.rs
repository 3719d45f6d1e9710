//! Move-tolerant location references
//!
//! A [`LocationRef`] is persisted as an opaque string. Callers never look
//! inside it; they hand it to a [`LocationResolver`](crate::LocationResolver)
//! and get back a tagged [`Resolution`].

use crate::error::{BassError, Result};
use crate::types::BlobId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Opaque bookmark to an audio file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationRef(String);

#[derive(Debug, Serialize, Deserialize)]
struct Bookmark {
    path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blob_id: Option<BlobId>,
}

impl LocationRef {
    /// Wrap a raw persisted bookmark
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Bookmark a file outside the app container
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self::encode(&Bookmark {
            path: path.into(),
            blob_id: None,
        })
    }

    /// Bookmark a file stored in the blob store
    ///
    /// The blob id survives a move of the blob directory, the path is only
    /// the last known location.
    pub fn for_blob(blob_id: BlobId, last_known_path: impl Into<PathBuf>) -> Self {
        Self::encode(&Bookmark {
            path: last_known_path.into(),
            blob_id: Some(blob_id),
        })
    }

    fn encode(bookmark: &Bookmark) -> Self {
        // Serializing a struct of a path and a string cannot fail for UTF-8
        // paths; fall back to the lossy path for anything else.
        match serde_json::to_string(bookmark) {
            Ok(raw) => Self(raw),
            Err(_) => Self(format!(
                "{{\"path\":{:?}}}",
                bookmark.path.to_string_lossy()
            )),
        }
    }

    /// Decode the last known path and the blob id, if any
    pub fn decode(&self) -> Result<(PathBuf, Option<BlobId>)> {
        let bookmark: Bookmark = serde_json::from_str(&self.0)
            .map_err(|e| BassError::InvalidLocation(format!("{}: {}", self.0, e)))?;
        if bookmark.path.as_os_str().is_empty() && bookmark.blob_id.is_none() {
            return Err(BassError::InvalidLocation("empty bookmark".to_string()));
        }
        Ok((bookmark.path, bookmark.blob_id))
    }

    /// Raw persisted form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outcome of resolving a [`LocationRef`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The bookmark points at an existing file
    Fresh(PathBuf),

    /// The file moved; `refreshed` should replace the stored bookmark
    Relocated {
        path: PathBuf,
        refreshed: LocationRef,
    },
}

impl Resolution {
    /// Resolved file path
    pub fn path(&self) -> &Path {
        match self {
            Self::Fresh(path) | Self::Relocated { path, .. } => path,
        }
    }

    /// Consume into the resolved file path
    pub fn into_path(self) -> PathBuf {
        match self {
            Self::Fresh(path) | Self::Relocated { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_bookmark_decodes() {
        let location = LocationRef::for_path("/music/a.mp3");
        let (path, blob) = location.decode().unwrap();
        assert_eq!(path, PathBuf::from("/music/a.mp3"));
        assert!(blob.is_none());
    }

    #[test]
    fn blob_bookmark_keeps_blob_id() {
        let location = LocationRef::for_blob(BlobId::new("x.mp3"), "/data/blobs/x.mp3");
        let (_, blob) = location.decode().unwrap();
        assert_eq!(blob, Some(BlobId::new("x.mp3")));
    }

    #[test]
    fn garbage_bookmark_is_invalid() {
        let err = LocationRef::from_raw("not json").decode().unwrap_err();
        assert!(err.is_location_error());

        let err = LocationRef::from_raw(r#"{"path":""}"#).decode().unwrap_err();
        assert!(matches!(err, BassError::InvalidLocation(_)));
    }
}
