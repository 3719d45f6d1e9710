/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be turned back into a domain value
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Blob id that would escape the blob directory
    #[error("Unsafe blob id: {0}")]
    UnsafeBlobId(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StorageError> for bass_core::BassError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => bass_core::BassError::Io(e),
            StorageError::UnsafeBlobId(id) => bass_core::BassError::invalid_input(format!(
                "unsafe blob id: {id}"
            )),
            other => bass_core::BassError::storage(other.to_string()),
        }
    }
}
