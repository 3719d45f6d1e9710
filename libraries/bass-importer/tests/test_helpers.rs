//! Fixtures for importer integration tests

#![allow(dead_code)]

use bass_core::{BlobStore, TrackStore};
use bass_importer::{NoopScope, SecurityScope, TrackImporter};
use bass_storage::{FsBlobStore, SqliteTrackStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestEnv {
    pub tracks: Arc<SqliteTrackStore>,
    pub blobs: Arc<FsBlobStore>,
    pub dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", dir.path().join("test.db").display());

        let pool = bass_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        bass_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let blobs = FsBlobStore::open(dir.path().join("blobs"))
            .await
            .expect("Failed to open blob store");

        Self {
            tracks: Arc::new(SqliteTrackStore::new(pool)),
            blobs: Arc::new(blobs),
            dir,
        }
    }

    pub fn importer(&self) -> TrackImporter {
        self.importer_with_scope(Arc::new(NoopScope))
    }

    pub fn importer_with_scope(&self, scope: Arc<dyn SecurityScope>) -> TrackImporter {
        let tracks: Arc<dyn TrackStore> = self.tracks.clone();
        let blobs: Arc<dyn BlobStore> = self.blobs.clone();
        TrackImporter::new(tracks, blobs, scope)
    }

    /// Directory the user "picks" files from
    pub fn picked(&self, name: &str) -> PathBuf {
        let dir = self.dir.path().join("picked");
        std::fs::create_dir_all(&dir).expect("Failed to create picked dir");
        dir.join(name)
    }

    /// Number of files currently in the blob store
    pub fn blob_count(&self) -> usize {
        std::fs::read_dir(self.blobs.root())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Write a mono 16-bit sine WAV of the given length
pub fn write_wav(path: &Path, seconds: f32) {
    use hound::{SampleFormat, WavSpec, WavWriter};

    let sample_rate = 8_000;
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).expect("Failed to create WAV");
    let num_samples = (sample_rate as f32 * seconds) as usize;
    for i in 0..num_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = (t * 60.0 * 2.0 * std::f32::consts::PI).sin();
        writer
            .write_sample((f32::from(i16::MAX) * 0.5 * sample) as i16)
            .expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}
