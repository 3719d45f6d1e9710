//! Track queries
//!
//! Plain functions over a pool, wrapped by [`SqliteTrackStore`](crate::SqliteTrackStore).

use crate::error::{Result, StorageError};
use bass_core::types::{
    BlobId, CreateTrack, LocationRef, Track, TrackFilter, TrackId, UpdateTrack,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const TRACK_COLUMNS: &str = "id, name, artist, duration_seconds, is_favorite, location, \
     artwork_id, audio_blob_id, is_onboarding, created_at";

/// Get a track by ID
pub async fn get_by_id(pool: &SqlitePool, id: &TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(track_from_row).transpose()
}

/// List tracks matching a filter, newest first
pub async fn get_filtered(pool: &SqlitePool, filter: TrackFilter) -> Result<Vec<Track>> {
    let condition = match filter {
        TrackFilter::All => "1 = 1",
        TrackFilter::UserImported => "is_onboarding = 0",
        TrackFilter::Favorites => "is_onboarding = 0 AND is_favorite = 1",
        TrackFilter::Onboarding => "is_onboarding = 1",
    };

    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks WHERE {condition} \
         ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(track_from_row).collect()
}

/// Create a new track
///
/// Returns the record as stored, with `created_at` at millisecond precision.
pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    let track = track.into_track();
    insert(pool, &track).await?;

    get_by_id(pool, &track.id)
        .await?
        .ok_or_else(|| StorageError::not_found("Track", track.id.as_str()))
}

async fn insert(pool: &SqlitePool, track: &Track) -> Result<()> {
    sqlx::query(
        r"
        INSERT INTO tracks (
            id, name, artist, duration_seconds, is_favorite, location,
            artwork_id, audio_blob_id, is_onboarding, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(&track.id)
    .bind(&track.name)
    .bind(&track.artist)
    .bind(track.duration_seconds)
    .bind(track.is_favorite)
    .bind(track.location.as_str())
    .bind(track.artwork_id.as_ref())
    .bind(track.audio_blob_id.as_ref())
    .bind(track.is_onboarding)
    .bind(track.created_at.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a full record, or merge it into the stored one
///
/// Incoming fields win; the stored `created_at` is kept.
pub async fn upsert(pool: &SqlitePool, track: &Track) -> Result<Track> {
    sqlx::query(
        r"
        INSERT INTO tracks (
            id, name, artist, duration_seconds, is_favorite, location,
            artwork_id, audio_blob_id, is_onboarding, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            artist = excluded.artist,
            duration_seconds = excluded.duration_seconds,
            is_favorite = excluded.is_favorite,
            location = excluded.location,
            artwork_id = excluded.artwork_id,
            audio_blob_id = excluded.audio_blob_id,
            is_onboarding = excluded.is_onboarding
        ",
    )
    .bind(&track.id)
    .bind(&track.name)
    .bind(&track.artist)
    .bind(track.duration_seconds)
    .bind(track.is_favorite)
    .bind(track.location.as_str())
    .bind(track.artwork_id.as_ref())
    .bind(track.audio_blob_id.as_ref())
    .bind(track.is_onboarding)
    .bind(track.created_at.timestamp_millis())
    .execute(pool)
    .await?;

    get_by_id(pool, &track.id)
        .await?
        .ok_or_else(|| StorageError::not_found("Track", track.id.as_str()))
}

/// Update name and/or favorite flag
///
/// Returns `None` if the track does not exist.
pub async fn update(
    pool: &SqlitePool,
    id: &TrackId,
    update: UpdateTrack,
) -> Result<Option<Track>> {
    if update.is_empty() {
        return get_by_id(pool, id).await;
    }

    let result = sqlx::query(
        r"
        UPDATE tracks
        SET name = COALESCE(?, name),
            is_favorite = COALESCE(?, is_favorite)
        WHERE id = ?
        ",
    )
    .bind(update.name)
    .bind(update.is_favorite)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_by_id(pool, id).await
}

/// Delete a track, returning the removed record
pub async fn delete(pool: &SqlitePool, id: &TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(&format!(
        "DELETE FROM tracks WHERE id = ? RETURNING {TRACK_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(track_from_row).transpose()
}

/// Delete every onboarding track, returning the removed records
pub async fn delete_onboarding(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        "DELETE FROM tracks WHERE is_onboarding = 1 RETURNING {TRACK_COLUMNS}"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(track_from_row).collect()
}

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    let id: TrackId = row.try_get("id")?;
    let created_ms: i64 = row.try_get("created_at")?;
    let created_at: DateTime<Utc> = DateTime::from_timestamp_millis(created_ms).ok_or_else(|| {
        StorageError::CorruptRow(format!("track {id}: bad timestamp {created_ms}"))
    })?;

    Ok(Track {
        name: row.try_get("name")?,
        artist: row.try_get("artist")?,
        duration_seconds: row.try_get("duration_seconds")?,
        is_favorite: row.try_get("is_favorite")?,
        location: LocationRef::from_raw(row.try_get::<String, _>("location")?),
        artwork_id: row.try_get::<Option<BlobId>, _>("artwork_id")?,
        audio_blob_id: row.try_get::<Option<BlobId>, _>("audio_blob_id")?,
        is_onboarding: row.try_get("is_onboarding")?,
        created_at,
        id,
    })
}
