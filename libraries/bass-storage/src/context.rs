use crate::tracks;
use async_trait::async_trait;
use bass_core::{
    error::Result, storage::TrackStore, CreateTrack, Track, TrackFilter, TrackId, UpdateTrack,
};
use sqlx::SqlitePool;

/// Track store backed by `SQLite`
#[derive(Clone)]
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    async fn get(&self, id: &TrackId) -> Result<Option<Track>> {
        Ok(tracks::get_by_id(&self.pool, id).await?)
    }

    async fn list(&self, filter: TrackFilter) -> Result<Vec<Track>> {
        Ok(tracks::get_filtered(&self.pool, filter).await?)
    }

    async fn create(&self, track: CreateTrack) -> Result<Track> {
        Ok(tracks::create(&self.pool, track).await?)
    }

    async fn upsert(&self, track: &Track) -> Result<Track> {
        Ok(tracks::upsert(&self.pool, track).await?)
    }

    async fn update(&self, id: &TrackId, update: UpdateTrack) -> Result<Option<Track>> {
        Ok(tracks::update(&self.pool, id, update).await?)
    }

    async fn delete(&self, id: &TrackId) -> Result<Option<Track>> {
        Ok(tracks::delete(&self.pool, id).await?)
    }

    async fn delete_onboarding(&self) -> Result<Vec<Track>> {
        Ok(tracks::delete_onboarding(&self.pool).await?)
    }
}
