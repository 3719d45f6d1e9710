//! Bass Booster - Minimizable Presentation Controller
//!
//! Drag-driven state machine for the now-playing surface, which is hidden,
//! expanded or minimized. The view layer subscribes to
//! [`PresentationState`] through a `tokio::sync::watch` channel and renders
//! [`Geometry`] derived from it.
//!
//! # Example
//!
//! ```rust
//! use bass_presentation::{PresentationController, PresentationEvent, SafeAreaInsets};
//!
//! let mut player = PresentationController::default();
//! let state = player.subscribe();
//!
//! player.present();
//! player.drag_changed(95.0);
//! player.drag_ended(95.0);
//!
//! assert!(state.borrow().is_minimized);
//! assert_eq!(state.borrow().offset, 0.0);
//! assert_eq!(
//!     player.drain_events(),
//!     vec![PresentationEvent::DidPresent, PresentationEvent::DidMinimize]
//! );
//!
//! let frame = player.geometry(SafeAreaInsets::default());
//! assert_eq!(frame.height, player.config().minimized_height);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod geometry;

pub use config::PresentationConfig;
pub use controller::{PresentationController, PresentationEvent, PresentationState};
pub use geometry::{Geometry, SafeAreaInsets};
