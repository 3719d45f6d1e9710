/// Core error types for Bass Booster
use crate::types::{BlobId, TrackId};
use thiserror::Error;

/// Result type alias using `BassError`
pub type Result<T> = std::result::Result<T, BassError>;

/// Core error type for Bass Booster
#[derive(Error, Debug)]
pub enum BassError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Audio graph errors
    #[error("Audio error: {0}")]
    Audio(String),

    /// Metadata parsing errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Blob not found
    #[error("Blob not found: {0}")]
    BlobNotFound(BlobId),

    /// Bookmark could not be decoded
    #[error("Invalid location reference: {0}")]
    InvalidLocation(String),

    /// Bookmark decoded but the file behind it is gone
    #[error("Stale location reference: {0}")]
    StaleLocation(String),

    /// Entitlement / purchase provider errors
    #[error("Purchase provider error: {0}")]
    Purchase(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl BassError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a purchase provider error
    pub fn purchase(msg: impl Into<String>) -> Self {
        Self::Purchase(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from resolving a location reference
    pub fn is_location_error(&self) -> bool {
        matches!(self, Self::InvalidLocation(_) | Self::StaleLocation(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for BassError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
