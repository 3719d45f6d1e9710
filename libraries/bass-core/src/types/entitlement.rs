use serde::{Deserialize, Serialize};

/// Result of a purchase attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    /// The entitlement is now active
    Purchased,
    /// The user backed out of the purchase sheet
    Cancelled,
    /// The provider reported a failure
    Failed(String),
}

/// Result of restoring previous purchases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum RestoreOutcome {
    /// An active entitlement was restored
    Restored,
    /// The provider found no purchase to restore
    NothingToRestore,
    /// The provider reported an error
    Failed(String),
}
