//! Bass Booster Session
//!
//! Wires the playback and presentation controllers, the track library and
//! the paywall into a single actor task.
//!
//! # Architecture
//!
//! - `config`: layered configuration (`config` crate, TOML + `BASS_` env)
//! - `logging`: `tracing-subscriber` setup
//! - `paywall`: entitlement flag and purchase alerts
//! - `session`: the actor, its commands and broadcast events
//! - `storage`: opens the `SQLite` library and blob directory
//!
//! # Example
//!
//! ```rust,no_run
//! use bass_session::{open_storage, BassConfig, Session, SessionCommand, SessionParts};
//! # use bass_core::EntitlementProvider;
//! # use bass_playback::AudioGraph;
//! # use std::sync::Arc;
//! # async fn example(
//! #     graph: Box<dyn AudioGraph>,
//! #     surface: Box<dyn bass_core::NowPlayingSurface>,
//! #     store: Arc<dyn EntitlementProvider>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! bass_session::init_logging();
//! let config = BassConfig::load()?;
//! let storage = open_storage(&config.storage).await?;
//!
//! let (session, task) = Session::spawn(
//!     &config,
//!     SessionParts {
//!         graph,
//!         resolver: storage.resolver,
//!         clock: Arc::new(bass_playback::SystemClock),
//!         surface,
//!         tracks: storage.tracks,
//!         blobs: storage.blobs,
//!         entitlement: store,
//!         scope: Arc::new(bass_importer::NoopScope),
//!     },
//! );
//!
//! let mut events = session.subscribe();
//! session.send(SessionCommand::Present).await?;
//! println!("{:?}", events.recv().await?);
//!
//! session.shutdown().await?;
//! task.await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod logging;
pub mod paywall;
pub mod session;
mod storage;

pub use config::{BassConfig, LinkSettings};
pub use error::{Result, SessionError};
pub use logging::init_logging;
pub use paywall::{Alert, AlertKind, Paywall};
pub use session::{
    Session, SessionCommand, SessionEvent, SessionHandle, SessionParts, SessionSnapshot,
};
pub use storage::{open_storage, LibraryStorage};
