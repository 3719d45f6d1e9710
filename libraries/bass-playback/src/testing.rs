//! Test doubles for the platform collaborators
//!
//! Every fake is a cheap handle over shared state: keep a clone in the test,
//! move the other into the controller, then inspect what the controller did.

use crate::clock::Clock;
use crate::error::{PlaybackError, Result};
use crate::graph::{AudioFileInfo, AudioGraph, NodeParameter, Segment};
use bass_core::{
    BassError, CreateTrack, LocationRef, LocationResolver, NowPlayingInfo, NowPlayingState,
    NowPlayingSurface, Resolution, Track,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Sample rate used by [`sample_track`] files
pub const TEST_SAMPLE_RATE: u32 = 44_100;

/// Build a track whose bookmark points at `/music/{name}.mp3`
pub fn sample_track(name: &str, duration_seconds: f64) -> Track {
    let location = LocationRef::for_path(format!("/music/{name}.mp3"));
    CreateTrack::new(name, "Test Artist", duration_seconds, location).into_track()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ===== Audio graph =====

/// One call observed by [`RecordingGraph`]
#[derive(Debug, Clone, PartialEq)]
pub enum GraphCall {
    Start,
    Open(PathBuf),
    Schedule(Segment),
    Play,
    Pause,
    Stop,
    Apply(NodeParameter),
}

#[derive(Default)]
struct GraphLog {
    calls: Vec<GraphCall>,
    files: HashMap<PathBuf, AudioFileInfo>,
    unreadable: HashSet<PathBuf>,
    fail_start: bool,
}

/// Audio graph that records calls and serves registered files
#[derive(Clone, Default)]
pub struct RecordingGraph {
    log: Arc<Mutex<GraphLog>>,
}

impl RecordingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph whose engine refuses to start
    pub fn failing_start() -> Self {
        let graph = Self::new();
        lock(&graph.log).fail_start = true;
        graph
    }

    /// Register a file that `open` will accept
    pub fn add_file(&self, path: impl Into<PathBuf>, sample_rate: u32, length_frames: u64) {
        let path = path.into();
        let info = AudioFileInfo {
            path: path.clone(),
            sample_rate,
            length_frames,
        };
        lock(&self.log).files.insert(path, info);
    }

    /// Register the file behind a [`sample_track`]
    pub fn add_track(&self, track: &Track) {
        if let Ok((path, _)) = track.location.decode() {
            let frames = (track.duration_seconds * f64::from(TEST_SAMPLE_RATE)).round() as u64;
            self.add_file(path, TEST_SAMPLE_RATE, frames);
        }
    }

    /// Make `open` fail for a path as if the file were corrupt
    pub fn corrupt(&self, path: impl Into<PathBuf>) {
        lock(&self.log).unreadable.insert(path.into());
    }

    pub fn calls(&self) -> Vec<GraphCall> {
        lock(&self.log).calls.clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.log).calls.clear();
    }

    /// Most recently scheduled segment
    pub fn last_segment(&self) -> Option<Segment> {
        lock(&self.log).calls.iter().rev().find_map(|call| match call {
            GraphCall::Schedule(segment) => Some(*segment),
            _ => None,
        })
    }

    /// Every parameter write, oldest first
    pub fn parameters(&self) -> Vec<NodeParameter> {
        lock(&self.log)
            .calls
            .iter()
            .filter_map(|call| match call {
                GraphCall::Apply(parameter) => Some(*parameter),
                _ => None,
            })
            .collect()
    }
}

impl AudioGraph for RecordingGraph {
    fn start(&mut self) -> Result<()> {
        let mut log = lock(&self.log);
        log.calls.push(GraphCall::Start);
        if log.fail_start {
            return Err(PlaybackError::audio("engine refused to start"));
        }
        Ok(())
    }

    fn open(&mut self, path: &Path) -> Result<AudioFileInfo> {
        let mut log = lock(&self.log);
        log.calls.push(GraphCall::Open(path.to_path_buf()));
        if log.unreadable.contains(path) {
            return Err(PlaybackError::audio(format!("corrupt file: {}", path.display())));
        }
        log.files
            .get(path)
            .cloned()
            .ok_or_else(|| PlaybackError::audio(format!("no such file: {}", path.display())))
    }

    fn schedule(&mut self, _file: &AudioFileInfo, segment: Segment) -> Result<()> {
        lock(&self.log).calls.push(GraphCall::Schedule(segment));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        lock(&self.log).calls.push(GraphCall::Play);
        Ok(())
    }

    fn pause(&mut self) {
        lock(&self.log).calls.push(GraphCall::Pause);
    }

    fn stop(&mut self) {
        lock(&self.log).calls.push(GraphCall::Stop);
    }

    fn apply(&mut self, parameter: NodeParameter) {
        lock(&self.log).calls.push(GraphCall::Apply(parameter));
    }
}

// ===== Clock =====

/// Clock that only moves when told to
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *lock(&self.now) += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *lock(&self.now)
    }
}

// ===== Now-playing surface =====

#[derive(Default)]
struct SurfaceLog {
    published: Vec<NowPlayingInfo>,
    states: Vec<NowPlayingState>,
    cleared: usize,
}

/// Now-playing surface that records every push
#[derive(Clone, Default)]
pub struct RecordingNowPlaying {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingNowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<NowPlayingInfo> {
        lock(&self.log).published.last().cloned()
    }

    pub fn published(&self) -> usize {
        lock(&self.log).published.len()
    }

    pub fn last_state(&self) -> Option<NowPlayingState> {
        lock(&self.log).states.last().copied()
    }

    pub fn cleared(&self) -> usize {
        lock(&self.log).cleared
    }
}

impl NowPlayingSurface for RecordingNowPlaying {
    fn publish(&mut self, info: NowPlayingInfo) {
        lock(&self.log).published.push(info);
    }

    fn set_playback_state(&mut self, state: NowPlayingState) {
        lock(&self.log).states.push(state);
    }

    fn clear(&mut self) {
        lock(&self.log).cleared += 1;
    }
}

// ===== Location resolver =====

/// Resolver that trusts decoded bookmark paths
///
/// Paths can be marked stale or moved to exercise the failure and
/// relocation branches without touching the filesystem.
#[derive(Clone, Default)]
pub struct StaticResolver {
    stale: Arc<Mutex<HashSet<PathBuf>>>,
    moved: Arc<Mutex<HashMap<PathBuf, PathBuf>>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolution of this path fails as if the file were deleted
    pub fn mark_stale(&self, path: impl Into<PathBuf>) {
        lock(&self.stale).insert(path.into());
    }

    /// Resolution of `from` reports a relocation to `to`
    pub fn relocate(&self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) {
        lock(&self.moved).insert(from.into(), to.into());
    }
}

impl LocationResolver for StaticResolver {
    fn resolve(&self, location: &LocationRef) -> bass_core::Result<Resolution> {
        let (path, _) = location.decode()?;
        if lock(&self.stale).contains(&path) {
            return Err(BassError::StaleLocation(path.display().to_string()));
        }
        if let Some(moved) = lock(&self.moved).get(&path) {
            return Ok(Resolution::Relocated {
                path: moved.clone(),
                refreshed: LocationRef::for_path(moved.clone()),
            });
        }
        Ok(Resolution::Fresh(path))
    }
}
