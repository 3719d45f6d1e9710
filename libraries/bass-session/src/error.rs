/// Session error types
use thiserror::Error;

/// Result type alias using `SessionError`
pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage could not be opened
    #[error("Storage error: {0}")]
    Storage(#[from] bass_storage::StorageError),

    /// Collaborator failure
    #[error(transparent)]
    Core(#[from] bass_core::BassError),

    /// The session task is no longer running
    #[error("Session is closed")]
    Closed,
}

impl From<config::ConfigError> for SessionError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
