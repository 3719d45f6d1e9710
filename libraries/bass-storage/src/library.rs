//! Library service
//!
//! The mutation surface the UI layer talks to. Persistence failures never
//! propagate: they are logged and reported as `None`.

use bass_core::{BlobStore, CreateTrack, Track, TrackFilter, TrackId, TrackStore, UpdateTrack};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Track library over a track store and a blob store
#[derive(Clone)]
pub struct Library {
    tracks: Arc<dyn TrackStore>,
    blobs: Arc<dyn BlobStore>,
}

impl Library {
    pub fn new(tracks: Arc<dyn TrackStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { tracks, blobs }
    }

    pub fn track_store(&self) -> &Arc<dyn TrackStore> {
        &self.tracks
    }

    pub fn blob_store(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    // ===== Reads =====

    /// List tracks, newest first
    pub async fn tracks(&self, filter: TrackFilter) -> Option<Vec<Track>> {
        match self.tracks.list(filter).await {
            Ok(tracks) => Some(tracks),
            Err(e) => {
                warn!(?filter, error = %e, "Failed to list tracks");
                None
            }
        }
    }

    pub async fn track(&self, id: &TrackId) -> Option<Track> {
        match self.tracks.get(id).await {
            Ok(track) => track,
            Err(e) => {
                warn!(track_id = %id, error = %e, "Failed to load track");
                None
            }
        }
    }

    // ===== Mutations =====

    /// Rename a track; blank names are rejected
    pub async fn rename(&self, id: &TrackId, name: &str) -> Option<Track> {
        let name = name.trim();
        if name.is_empty() {
            warn!(track_id = %id, "Ignoring rename to a blank name");
            return None;
        }

        let update = UpdateTrack {
            name: Some(name.to_string()),
            is_favorite: None,
        };
        self.apply(id, update, "rename").await
    }

    /// Flip the favorite flag
    pub async fn toggle_favorite(&self, id: &TrackId) -> Option<Track> {
        let current = self.track(id).await?;
        let update = UpdateTrack {
            name: None,
            is_favorite: Some(!current.is_favorite),
        };
        self.apply(id, update, "toggle favorite").await
    }

    async fn apply(&self, id: &TrackId, update: UpdateTrack, action: &str) -> Option<Track> {
        match self.tracks.update(id, update).await {
            Ok(Some(track)) => {
                debug!(track_id = %id, action, "Track updated");
                Some(track)
            }
            Ok(None) => {
                warn!(track_id = %id, action, "Track does not exist");
                None
            }
            Err(e) => {
                warn!(track_id = %id, action, error = %e, "Failed to update track");
                None
            }
        }
    }

    /// Delete a track and release its blobs
    pub async fn delete_track(&self, id: &TrackId) -> Option<Track> {
        let removed = match self.tracks.delete(id).await {
            Ok(Some(track)) => track,
            Ok(None) => {
                warn!(track_id = %id, "Deleting a track that does not exist");
                return None;
            }
            Err(e) => {
                warn!(track_id = %id, error = %e, "Failed to delete track");
                return None;
            }
        };

        self.release_blobs(std::slice::from_ref(&removed)).await;
        info!(track_id = %id, name = %removed.name, "Track deleted");
        Some(removed)
    }

    // ===== Onboarding =====

    /// Add the bundled onboarding tracks unless they are already present
    pub async fn seed_onboarding(&self, bundled: Vec<CreateTrack>) -> Option<Vec<Track>> {
        let existing = self.tracks(TrackFilter::Onboarding).await?;
        if !existing.is_empty() {
            debug!(count = existing.len(), "Onboarding tracks already seeded");
            return Some(existing);
        }

        let mut seeded = Vec::with_capacity(bundled.len());
        for track in bundled {
            match self.tracks.create(track.onboarding()).await {
                Ok(track) => seeded.push(track),
                Err(e) => warn!(error = %e, "Failed to seed onboarding track"),
            }
        }
        info!(count = seeded.len(), "Onboarding tracks seeded");
        Some(seeded)
    }

    /// Remove the onboarding tracks and their blobs
    pub async fn clear_onboarding(&self) -> Option<Vec<Track>> {
        match self.tracks.delete_onboarding().await {
            Ok(removed) => {
                self.release_blobs(&removed).await;
                if !removed.is_empty() {
                    info!(count = removed.len(), "Onboarding tracks removed");
                }
                Some(removed)
            }
            Err(e) => {
                warn!(error = %e, "Failed to remove onboarding tracks");
                None
            }
        }
    }

    async fn release_blobs(&self, tracks: &[Track]) {
        for blob_id in tracks.iter().flat_map(Track::owned_blobs) {
            if let Err(e) = self.blobs.delete(blob_id).await {
                warn!(blob_id = %blob_id, error = %e, "Failed to release blob");
            }
        }
    }
}
