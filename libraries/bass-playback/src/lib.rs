//! Bass Booster - Playback Engine Controller
//!
//! This crate provides:
//! - Transport control (toggle, pause/resume, seek, next/previous)
//! - Wall-clock position tracking (no polling accumulation)
//! - Playlist context with display-order assignment and restore
//! - Repeat modes (Once, Shuffle, Loop, Advance) with fixed-point shuffle
//! - Effect channels (bass, speed, pitch, reverb) written straight to the graph
//! - Now-playing surface synchronization
//!
//! # Architecture
//!
//! `bass-playback` does no audio processing itself. The platform supplies an
//! [`AudioGraph`] (source → reverb → time/pitch → EQ → output), a
//! [`LocationResolver`](bass_core::LocationResolver) and a
//! [`NowPlayingSurface`](bass_core::NowPlayingSurface). The controller is a
//! plain single-owner state machine; events are queued and drained by the
//! owner after each call.
//!
//! # Example
//!
//! ```rust,no_run
//! use bass_playback::{PlaybackConfig, PlaybackController, SystemClock};
//! # use bass_playback::{AudioGraph, AudioFileInfo, NodeParameter, Segment, Result};
//! # use bass_core::{LocationRef, LocationResolver, NowPlayingInfo, NowPlayingState,
//! #     NowPlayingSurface, Resolution};
//! # use std::path::Path;
//! # use std::sync::Arc;
//! # struct Engine;
//! # impl AudioGraph for Engine {
//! #     fn start(&mut self) -> Result<()> { Ok(()) }
//! #     fn open(&mut self, _: &Path) -> Result<AudioFileInfo> { unimplemented!() }
//! #     fn schedule(&mut self, _: &AudioFileInfo, _: Segment) -> Result<()> { Ok(()) }
//! #     fn play(&mut self) -> Result<()> { Ok(()) }
//! #     fn pause(&mut self) {}
//! #     fn stop(&mut self) {}
//! #     fn apply(&mut self, _: NodeParameter) {}
//! # }
//! # struct Files;
//! # impl LocationResolver for Files {
//! #     fn resolve(&self, l: &LocationRef) -> bass_core::Result<Resolution> {
//! #         Ok(Resolution::Fresh(l.decode()?.0))
//! #     }
//! # }
//! # struct Surface;
//! # impl NowPlayingSurface for Surface {
//! #     fn publish(&mut self, _: NowPlayingInfo) {}
//! #     fn set_playback_state(&mut self, _: NowPlayingState) {}
//! # }
//! # let track: bass_core::Track = unimplemented!();
//! let mut controller = PlaybackController::new(
//!     Box::new(Engine),
//!     Arc::new(Files),
//!     Arc::new(SystemClock),
//!     Box::new(Surface),
//!     &PlaybackConfig::default(),
//! );
//!
//! controller.toggle_playback(track, None)?;
//! controller.update_bass_boost(12.0);
//! controller.seek(30.0)?;
//!
//! for event in controller.drain_events() {
//!     println!("{event:?}");
//! }
//! # Ok::<(), bass_playback::PlaybackError>(())
//! ```

#![forbid(unsafe_code)]

pub mod clock;
pub mod controller;
pub mod effects;
pub mod error;
pub mod events;
pub mod graph;
pub mod now_playing;
pub mod playlist;
pub mod shuffle;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use clock::{Clock, PositionClock, SystemClock};
pub use controller::PlaybackController;
pub use effects::{ChannelSettings, EffectChannel, EffectParameters};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use graph::{AudioFileInfo, AudioGraph, NodeParameter, Segment, SegmentId};
pub use playlist::Playlist;
pub use types::{PlaybackConfig, PlaybackSnapshot, PlaybackState, RepeatMode};
