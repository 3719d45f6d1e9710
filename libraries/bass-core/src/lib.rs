//! Bass Booster Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling
//! shared by every Bass Booster library.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `LocationRef`, `NowPlayingInfo`, purchase outcomes
//! - **Collaborator Traits**: `TrackStore`, `BlobStore`, `LocationResolver`,
//!   `EntitlementProvider`, `NowPlayingSurface`
//! - **Error Handling**: Unified `BassError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use bass_core::types::{CreateTrack, LocationRef};
//! use std::path::PathBuf;
//!
//! let track = CreateTrack::new(
//!     "Deep Bass",
//!     "Unknown",
//!     183.4,
//!     LocationRef::for_path(PathBuf::from("/music/deep-bass.mp3")),
//! )
//! .into_track();
//!
//! assert!(!track.is_favorite);
//! assert!(!track.is_onboarding);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{BassError, Result};
pub use storage::{BlobStore, TrackStore};
pub use traits::{EntitlementProvider, LocationResolver, NowPlayingSurface};

pub use types::{
    BlobId, CreateTrack, LocationRef, MediaType, NowPlayingInfo, NowPlayingState,
    PurchaseOutcome, Resolution, RestoreOutcome, Track, TrackFilter, TrackId, UpdateTrack,
};
