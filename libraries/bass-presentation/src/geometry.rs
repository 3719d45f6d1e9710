//! Render geometry of the player surface
//!
//! Pure functions of the presentation state; recomputed on every offset
//! change, never cached.

use crate::config::PresentationConfig;
use serde::{Deserialize, Serialize};

/// Safe-area insets of the hosting window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    pub top: f32,
    pub bottom: f32,
}

/// Vertical placement of the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Vertical center of the surface
    pub anchor_y: f32,
    /// Frame height
    pub height: f32,
}

/// Compute the surface geometry
///
/// Expanded, the full-height player follows a downward drag. Minimized, the
/// bar stays pinned above the bottom margin and grows upward as it is
/// dragged.
pub fn geometry(
    config: &PresentationConfig,
    is_minimized: bool,
    offset: f32,
    insets: SafeAreaInsets,
) -> Geometry {
    if is_minimized {
        let height = config.minimized_height - offset;
        let bottom = insets.top + config.expanded_height - insets.bottom - config.bottom_margin;
        Geometry {
            anchor_y: bottom - height / 2.0,
            height,
        }
    } else {
        let height = config.expanded_height;
        Geometry {
            anchor_y: insets.top + offset + height / 2.0,
            height,
        }
    }
}
