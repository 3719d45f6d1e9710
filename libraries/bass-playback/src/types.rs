//! Core types for playback control

use crate::effects::EffectParameters;
use bass_core::{NowPlayingState, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No track selected
    Stopped,

    /// Currently playing
    Playing,

    /// Track selected, not playing
    Paused,
}

impl From<PlaybackState> for NowPlayingState {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Stopped => NowPlayingState::Stopped,
            PlaybackState::Playing => NowPlayingState::Playing,
            PlaybackState::Paused => NowPlayingState::Paused,
        }
    }
}

/// Repeat mode
///
/// The modes form a ring advanced by [`RepeatMode::next`]:
/// `Once → Shuffle → Loop → Advance → Once`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Play through the playlist once, then stop at zero
    #[default]
    Once,

    /// Play a fixed-point shuffle of the playlist
    Shuffle,

    /// Repeat the current track
    Loop,

    /// Keep advancing through the playlist
    Advance,
}

impl RepeatMode {
    /// All modes in ring order
    pub const ALL: [RepeatMode; 4] = [Self::Once, Self::Shuffle, Self::Loop, Self::Advance];

    /// Next mode in the ring
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Once => Self::Shuffle,
            Self::Shuffle => Self::Loop,
            Self::Loop => Self::Advance,
            Self::Advance => Self::Once,
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Position refresh period in milliseconds (default: 250)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Initial repeat mode (default: Once)
    #[serde(default)]
    pub repeat_mode: RepeatMode,
}

fn default_tick_interval_ms() -> u64 {
    250
}

impl PlaybackConfig {
    /// Position refresh period
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            repeat_mode: RepeatMode::default(),
        }
    }
}

/// Read-only view of the controller for callers outside the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub track: Option<Track>,
    pub position: Duration,
    pub duration: Duration,
    pub repeat_mode: RepeatMode,
    pub effects: EffectParameters,
    pub playlist: Vec<TrackId>,
    pub engine_ready: bool,
}
