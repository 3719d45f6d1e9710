//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,bass=debug";

/// Install the global subscriber
///
/// Honors `RUST_LOG`, falling back to [`DEFAULT_FILTER`]. Returns `false`
/// if a subscriber was already installed.
pub fn init_logging() -> bool {
    init_logging_with(DEFAULT_FILTER)
}

/// Install the global subscriber with an explicit fallback filter
pub fn init_logging_with(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
