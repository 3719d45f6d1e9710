/// Collaborator traits consumed by the playback and session layers
use crate::error::Result;
use crate::types::{
    LocationRef, NowPlayingInfo, NowPlayingState, PurchaseOutcome, Resolution, RestoreOutcome,
};
use async_trait::async_trait;

/// Resolves opaque bookmarks into readable file paths
///
/// Resolution is a fallible pipeline: a bookmark that cannot be decoded
/// yields `InvalidLocation`, one whose file is gone yields `StaleLocation`.
pub trait LocationResolver: Send + Sync {
    /// Resolve a bookmark
    ///
    /// # Errors
    /// Returns an error if the bookmark is undecodable or its file is gone
    fn resolve(&self, location: &LocationRef) -> Result<Resolution>;
}

/// One-way output to the OS now-playing surface
///
/// Fire-and-forget: implementations must not fail back into the caller.
pub trait NowPlayingSurface: Send {
    /// Replace the displayed now-playing record
    fn publish(&mut self, info: NowPlayingInfo);

    /// Update the playback-state flag
    fn set_playback_state(&mut self, state: NowPlayingState);

    /// Remove the now-playing record entirely
    fn clear(&mut self) {}
}

/// In-app purchase / subscription provider
#[async_trait]
pub trait EntitlementProvider: Send + Sync {
    /// Whether the user currently holds an active entitlement
    async fn has_active_entitlement(&self) -> Result<bool>;

    /// Start a purchase for the given product
    async fn purchase(&self, product_id: &str) -> Result<PurchaseOutcome>;

    /// Restore previous purchases
    async fn restore(&self) -> Result<RestoreOutcome>;
}
