/// Now-playing metadata pushed to the OS media surface
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Media type reported to the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Audio,
}

/// Playback-state flag of the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NowPlayingState {
    Playing,
    Paused,
    Stopped,
}

/// Structured now-playing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingInfo {
    pub title: String,
    pub artist: String,
    pub duration: Duration,
    /// 0.0 while paused, the effective speed while playing
    pub playback_rate: f32,
    pub elapsed: Duration,
    pub media_type: MediaType,
    #[serde(skip)]
    pub artwork: Option<Arc<[u8]>>,
}
