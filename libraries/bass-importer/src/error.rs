//! Error types for the importer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] bass_core::BassError),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Access to {0} was not granted")]
    AccessDenied(PathBuf),

    #[error("Import task failed: {0}")]
    Task(String),
}

impl From<ImportError> for bass_core::BassError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Storage(e) => e,
            ImportError::Io(e) => bass_core::BassError::Io(e),
            ImportError::Metadata(msg) => bass_core::BassError::metadata(msg),
            other => bass_core::BassError::invalid_input(other.to_string()),
        }
    }
}
