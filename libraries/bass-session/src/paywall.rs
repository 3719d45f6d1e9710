//! Entitlement state and purchase alerts

use bass_core::{PurchaseOutcome, RestoreOutcome};
use serde::{Deserialize, Serialize};

/// Severity of a user-facing alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Info,
    Failure,
}

/// User-facing alert produced by a purchase or restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(kind: AlertKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }

    /// Alert for a finished purchase; a cancelled purchase shows nothing
    pub fn for_purchase(outcome: &PurchaseOutcome) -> Option<Self> {
        match outcome {
            PurchaseOutcome::Purchased => Some(Self::new(
                AlertKind::Success,
                "Purchase Successful",
                "All effects are now unlocked.",
            )),
            PurchaseOutcome::Cancelled => None,
            PurchaseOutcome::Failed(reason) => Some(Self::purchase_failed(reason)),
        }
    }

    pub fn purchase_failed(reason: &str) -> Self {
        Self::new(AlertKind::Failure, "Purchase Failed", reason)
    }

    /// Alert for a finished restore
    pub fn for_restore(outcome: &RestoreOutcome) -> Self {
        match outcome {
            RestoreOutcome::Restored => Self::new(
                AlertKind::Success,
                "Restore Successful",
                "Your purchases have been restored.",
            ),
            RestoreOutcome::NothingToRestore => Self::new(
                AlertKind::Info,
                "Nothing to Restore",
                "No previous purchases were found for this account.",
            ),
            RestoreOutcome::Failed(reason) => Self::restore_failed(reason),
        }
    }

    pub fn restore_failed(reason: &str) -> Self {
        Self::new(AlertKind::Failure, "Restore Failed", reason)
    }
}

/// Entitlement flag and effect gating
#[derive(Debug, Clone)]
pub struct Paywall {
    entitled: bool,
    gate_effects: bool,
}

impl Paywall {
    pub fn new(gate_effects: bool) -> Self {
        Self {
            entitled: false,
            gate_effects,
        }
    }

    pub fn is_entitled(&self) -> bool {
        self.entitled
    }

    /// Record the entitlement, returning whether it changed
    pub fn set_entitled(&mut self, entitled: bool) -> bool {
        let changed = self.entitled != entitled;
        self.entitled = entitled;
        changed
    }

    /// Whether effect controls may change parameters
    pub fn allows_effects(&self) -> bool {
        self.entitled || !self.gate_effects
    }
}
