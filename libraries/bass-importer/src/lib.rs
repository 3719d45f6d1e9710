//! Bass Booster Music Importer
//!
//! Imports user-picked audio files into the library.
//!
//! # Architecture
//!
//! - `scope`: scoped access to picked files, released by an RAII guard
//! - `metadata`: title, artist, duration and cover art from audio tags
//! - `importer`: copies payloads into the blob store and creates tracks
//!
//! # Example
//!
//! ```rust,no_run
//! use bass_importer::{NoopScope, TrackImporter};
//! use bass_storage::{create_pool, run_migrations, FsBlobStore, SqliteTrackStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://bass.db").await?;
//! run_migrations(&pool).await?;
//!
//! let importer = TrackImporter::new(
//!     Arc::new(SqliteTrackStore::new(pool)),
//!     Arc::new(FsBlobStore::open("blobs").await?),
//!     Arc::new(NoopScope),
//! );
//! let summary = importer.import(vec!["/music/song.mp3".into()]).await;
//! println!("{} imported, {} failed", summary.imported.len(), summary.failed.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod error;

pub mod importer;
pub mod metadata;
pub mod scope;

pub use error::ImportError;
pub use importer::{ImportFailure, ImportSummary, TrackImporter, SUPPORTED_EXTENSIONS};
pub use scope::{AccessGuard, NoopScope, SecurityScope};

pub type Result<T> = std::result::Result<T, ImportError>;
