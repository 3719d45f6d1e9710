//! Platform audio graph abstraction
//!
//! The platform owns the actual node chain
//! (source → reverb → time/pitch → EQ → output). The controller only opens
//! files, schedules frame ranges and writes node parameters.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// An opened audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileInfo {
    /// Resolved file path
    pub path: PathBuf,

    /// Sample rate of the file's processing format
    pub sample_rate: u32,

    /// Total length in frames
    pub length_frames: u64,
}

impl AudioFileInfo {
    /// Length of the file as a duration
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.length_frames as f64 / f64::from(self.sample_rate))
    }
}

/// Identifier of one scheduled segment
///
/// Monotonically increasing. A completion callback carrying anything but the
/// active id belongs to a segment that was stopped or replaced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SegmentId(u64);

impl SegmentId {
    /// Wrap a raw id reported by the platform
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id
    pub fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A range of frames scheduled on the source node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub id: SegmentId,
    pub start_frame: u64,
    pub frame_count: u64,
}

/// Parameter write on one node of the graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeParameter {
    /// EQ low-shelf gain in dB
    BassGain(f32),
    /// Time-pitch playback rate
    Rate(f32),
    /// Time-pitch shift in cents
    PitchCents(f32),
    /// Reverb wet/dry mix, 0-100
    ReverbMix(f32),
}

/// Platform audio graph
///
/// Implementors wrap the platform engine. The graph reports the natural end
/// of a scheduled segment out of band; the owner forwards it to
/// [`PlaybackController::segment_finished`](crate::PlaybackController::segment_finished).
pub trait AudioGraph: Send {
    /// Start the engine. Called once at controller construction.
    fn start(&mut self) -> Result<()>;

    /// Open a file for scheduling
    ///
    /// Must not disturb whatever is currently playing.
    fn open(&mut self, path: &Path) -> Result<AudioFileInfo>;

    /// Schedule a segment of an opened file on the source node
    fn schedule(&mut self, file: &AudioFileInfo, segment: Segment) -> Result<()>;

    /// Start or resume the source node
    fn play(&mut self) -> Result<()>;

    /// Pause the source node, keeping scheduled segments
    fn pause(&mut self);

    /// Stop the source node and drop all scheduled segments
    fn stop(&mut self);

    /// Write a node parameter
    fn apply(&mut self, parameter: NodeParameter);
}
