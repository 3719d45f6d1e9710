//! Playback Events
//!
//! Every state transition of the controller is reported as an event. The
//! owner drains them after each command:
//! - State changes (play/pause/stop)
//! - Track changes
//! - Position updates (on every tick and after seeks)
//! - Effect, repeat mode and playlist changes

use crate::effects::EffectChannel;
use crate::types::{PlaybackState, RepeatMode};
use bass_core::{LocationRef, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track was selected
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Position republish
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration
        duration_ms: u64,
    },

    /// An effect channel changed value or enable flag
    EffectChanged {
        channel: EffectChannel,
        value: f32,
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatModeChanged { mode: RepeatMode },

    /// Playlist replaced or reordered
    PlaylistChanged {
        /// New playlist length
        length: usize,
    },

    /// The track's file moved; the stored bookmark should be replaced
    LocationRefreshed {
        track_id: TrackId,
        location: LocationRef,
    },

    /// A new track was started from the library; show the player surface
    PresentationRequested,

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}
