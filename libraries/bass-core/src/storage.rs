//! Storage traits for track records and raw payloads

use crate::error::Result;
use crate::types::{BlobId, CreateTrack, Track, TrackFilter, TrackId, UpdateTrack};
use async_trait::async_trait;
use std::path::PathBuf;

/// Persistence of track records
///
/// Implementations own the records; callers only ever hold copies.
#[async_trait]
pub trait TrackStore: Send + Sync {
    // ========================================================================
    // Reads
    // ========================================================================

    /// Get track by ID
    async fn get(&self, id: &TrackId) -> Result<Option<Track>>;

    /// List tracks matching a filter, newest first
    async fn list(&self, filter: TrackFilter) -> Result<Vec<Track>>;

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create a new track
    async fn create(&self, track: CreateTrack) -> Result<Track>;

    /// Insert or merge a full record
    ///
    /// When a record with the same id exists, the incoming fields replace
    /// the stored ones (later write wins per field). The creation timestamp
    /// of the stored record is kept.
    async fn upsert(&self, track: &Track) -> Result<Track>;

    /// Update the mutable fields of a track
    ///
    /// Returns `None` if the track does not exist.
    async fn update(&self, id: &TrackId, update: UpdateTrack) -> Result<Option<Track>>;

    /// Delete a track, returning the removed record
    async fn delete(&self, id: &TrackId) -> Result<Option<Track>>;

    /// Delete every onboarding track, returning the removed records
    async fn delete_onboarding(&self) -> Result<Vec<Track>>;
}

/// Raw byte payloads (audio files, artwork) keyed by generated id
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under a freshly generated id
    async fn save(&self, bytes: &[u8], extension: Option<&str>) -> Result<BlobId>;

    /// Load the bytes of a blob
    async fn load(&self, id: &BlobId) -> Result<Vec<u8>>;

    /// Delete a blob; deleting a missing blob is not an error
    async fn delete(&self, id: &BlobId) -> Result<()>;

    /// Filesystem path of a blob, for consumers that read files directly
    fn path_for(&self, id: &BlobId) -> Result<PathBuf>;
}
