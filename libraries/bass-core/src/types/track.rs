/// Track domain type
use crate::types::{BlobId, LocationRef, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Persisted song record
///
/// Only `name` and `is_favorite` change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Display name
    pub name: String,

    /// Artist name
    pub artist: String,

    /// Total duration in seconds
    pub duration_seconds: f64,

    /// Favorite flag
    pub is_favorite: bool,

    /// Move-tolerant reference to the audio file
    pub location: LocationRef,

    /// Artwork image blob
    pub artwork_id: Option<BlobId>,

    /// Audio payload blob, when the file was copied into the app container
    pub audio_blob_id: Option<BlobId>,

    /// Bundled onboarding track rather than a user import
    pub is_onboarding: bool,

    /// When the track was added to the library
    pub created_at: DateTime<Utc>,
}

impl Track {
    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_seconds.max(0.0))
    }

    /// Blobs owned by this track, released on deletion
    pub fn owned_blobs(&self) -> impl Iterator<Item = &BlobId> {
        self.artwork_id.iter().chain(self.audio_blob_id.iter())
    }
}

/// Data for creating a new track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTrack {
    pub name: String,
    pub artist: String,
    pub duration_seconds: f64,
    pub location: LocationRef,
    pub artwork_id: Option<BlobId>,
    pub audio_blob_id: Option<BlobId>,
    pub is_onboarding: bool,
}

impl CreateTrack {
    /// Create a user track with no artwork
    pub fn new(
        name: impl Into<String>,
        artist: impl Into<String>,
        duration_seconds: f64,
        location: LocationRef,
    ) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            duration_seconds,
            location,
            artwork_id: None,
            audio_blob_id: None,
            is_onboarding: false,
        }
    }

    /// Mark as a bundled onboarding track
    #[must_use]
    pub fn onboarding(mut self) -> Self {
        self.is_onboarding = true;
        self
    }

    /// Attach an artwork blob
    #[must_use]
    pub fn with_artwork(mut self, artwork_id: BlobId) -> Self {
        self.artwork_id = Some(artwork_id);
        self
    }

    /// Attach the audio payload blob
    #[must_use]
    pub fn with_audio_blob(mut self, blob_id: BlobId) -> Self {
        self.audio_blob_id = Some(blob_id);
        self
    }

    /// Materialize into a track with a fresh id
    pub fn into_track(self) -> Track {
        Track {
            id: TrackId::generate(),
            name: self.name,
            artist: self.artist,
            duration_seconds: self.duration_seconds,
            is_favorite: false,
            location: self.location,
            artwork_id: self.artwork_id,
            audio_blob_id: self.audio_blob_id,
            is_onboarding: self.is_onboarding,
            created_at: Utc::now(),
        }
    }
}

/// Mutable fields of a track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTrack {
    pub name: Option<String>,
    pub is_favorite: Option<bool>,
}

impl UpdateTrack {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_favorite.is_none()
    }
}

/// Predicate for listing tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackFilter {
    /// Every track
    All,
    /// Tracks the user imported (not onboarding)
    UserImported,
    /// User tracks marked favorite
    Favorites,
    /// Bundled onboarding tracks
    Onboarding,
}

impl TrackFilter {
    /// Whether a track satisfies this filter
    pub fn matches(self, track: &Track) -> bool {
        match self {
            Self::All => true,
            Self::UserImported => !track.is_onboarding,
            Self::Favorites => !track.is_onboarding && track.is_favorite,
            Self::Onboarding => track.is_onboarding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> Track {
        CreateTrack::new(
            "Sub Drop",
            "Unknown",
            90.5,
            LocationRef::for_path(PathBuf::from("/tmp/sub-drop.mp3")),
        )
        .into_track()
    }

    #[test]
    fn filters_partition_onboarding_tracks() {
        let mut user = sample();
        let onboarding = CreateTrack::new(
            "Intro",
            "Bass Booster",
            30.0,
            LocationRef::for_path(PathBuf::from("/bundle/intro.mp3")),
        )
        .onboarding()
        .into_track();

        assert!(TrackFilter::UserImported.matches(&user));
        assert!(!TrackFilter::UserImported.matches(&onboarding));
        assert!(TrackFilter::Onboarding.matches(&onboarding));
        assert!(!TrackFilter::Favorites.matches(&user));

        user.is_favorite = true;
        assert!(TrackFilter::Favorites.matches(&user));
        assert!(TrackFilter::All.matches(&onboarding));
    }

    #[test]
    fn owned_blobs_lists_artwork_and_audio() {
        let track = CreateTrack::new(
            "Sub Drop",
            "Unknown",
            90.5,
            LocationRef::for_path(PathBuf::from("/tmp/sub-drop.mp3")),
        )
        .with_artwork(BlobId::new("art.jpg"))
        .with_audio_blob(BlobId::new("audio.mp3"))
        .into_track();

        let blobs: Vec<_> = track.owned_blobs().map(BlobId::as_str).collect();
        assert_eq!(blobs, vec!["art.jpg", "audio.mp3"]);
        assert_eq!(sample().owned_blobs().count(), 0);
    }

    #[test]
    fn negative_duration_is_zero() {
        let mut track = sample();
        track.duration_seconds = -3.0;
        assert_eq!(track.duration(), Duration::ZERO);
    }
}
