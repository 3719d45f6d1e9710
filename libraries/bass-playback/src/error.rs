//! Error types for playback control

use bass_core::BassError;
use thiserror::Error;

/// Playback errors
///
/// None of these are fatal: the controller logs them, emits an
/// [`Error`](crate::PlaybackEvent::Error) event and keeps its prior state.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The audio engine failed to start at initialization
    #[error("Audio engine is not running")]
    EngineUnavailable,

    /// The track's location reference could not be resolved
    #[error("Could not resolve track location: {0}")]
    Location(#[source] BassError),

    /// The audio graph rejected an operation
    #[error("Audio graph error: {0}")]
    Audio(String),
}

impl PlaybackError {
    /// Create an audio graph error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }
}

impl From<PlaybackError> for BassError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::Location(inner) => inner,
            other => BassError::audio(other.to_string()),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
