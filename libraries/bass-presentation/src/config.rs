//! Presentation sizes and gesture thresholds

use serde::{Deserialize, Serialize};

/// Configuration for the presentation controller
///
/// All values are in layout points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Height of the collapsed player bar (default: 70)
    #[serde(default = "default_minimized_height")]
    pub minimized_height: f32,

    /// Height of the full player (default: 800)
    #[serde(default = "default_expanded_height")]
    pub expanded_height: f32,

    /// Gap between the collapsed bar and the bottom safe area (default: 90)
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin: f32,

    /// Downward drag that collapses the expanded player (default: 90)
    #[serde(default = "default_minimize_threshold")]
    pub minimize_threshold: f32,

    /// Upward drag that expands the collapsed bar (default: 60)
    #[serde(default = "default_expand_threshold")]
    pub expand_threshold: f32,

    /// Upward offset at which the collapsed bar stops following (default: 60)
    #[serde(default = "default_upward_cutoff")]
    pub upward_cutoff: f32,
}

fn default_minimized_height() -> f32 {
    70.0
}

fn default_expanded_height() -> f32 {
    800.0
}

fn default_bottom_margin() -> f32 {
    90.0
}

fn default_minimize_threshold() -> f32 {
    90.0
}

fn default_expand_threshold() -> f32 {
    60.0
}

fn default_upward_cutoff() -> f32 {
    60.0
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            minimized_height: default_minimized_height(),
            expanded_height: default_expanded_height(),
            bottom_margin: default_bottom_margin(),
            minimize_threshold: default_minimize_threshold(),
            expand_threshold: default_expand_threshold(),
            upward_cutoff: default_upward_cutoff(),
        }
    }
}

impl PresentationConfig {
    /// Check sizes and thresholds are usable
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("minimized_height", self.minimized_height),
            ("expanded_height", self.expanded_height),
            ("minimize_threshold", self.minimize_threshold),
            ("expand_threshold", self.expand_threshold),
            ("upward_cutoff", self.upward_cutoff),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if !(self.bottom_margin.is_finite() && self.bottom_margin >= 0.0) {
            return Err(format!(
                "bottom_margin must not be negative, got {}",
                self.bottom_margin
            ));
        }
        if self.minimized_height >= self.expanded_height {
            return Err("minimized_height must be below expanded_height".to_string());
        }
        Ok(())
    }
}
