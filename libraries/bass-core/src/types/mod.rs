//! Domain types
mod entitlement;
mod ids;
mod location;
mod now_playing;
mod track;

pub use entitlement::{PurchaseOutcome, RestoreOutcome};
pub use ids::{BlobId, TrackId};
pub use location::{LocationRef, Resolution};
pub use now_playing::{MediaType, NowPlayingInfo, NowPlayingState};
pub use track::{CreateTrack, Track, TrackFilter, UpdateTrack};
