//! Application configuration
//!
//! Loaded from an optional TOML file, then overridden by `BASS_`-prefixed
//! environment variables. Nested keys use a double underscore, e.g.
//! `BASS_PLAYBACK__TICK_INTERVAL_MS=100`.

use crate::error::{Result, SessionError};
use bass_playback::PlaybackConfig;
use bass_presentation::PresentationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BassConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub presentation: PresentationConfig,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub paywall: PaywallSettings,

    #[serde(default)]
    pub links: LinkSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Directory holding audio payloads and artwork
    #[serde(default = "default_blob_dir")]
    pub blob_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaywallSettings {
    /// Subscription product offered on the paywall
    #[serde(default = "default_product_id")]
    pub product_id: String,

    /// Effect controls require an active entitlement
    #[serde(default = "default_gate_effects")]
    pub gate_effects: bool,
}

/// Outbound links shown in the settings screen
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkSettings {
    #[serde(default = "default_privacy_policy")]
    pub privacy_policy: String,

    #[serde(default = "default_terms_of_use")]
    pub terms_of_use: String,

    #[serde(default = "default_share")]
    pub share: String,

    #[serde(default = "default_support_email")]
    pub support_email: String,
}

impl BassConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from a specific file (if present) and environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("BASS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.tick_interval_ms == 0 {
            return Err(SessionError::Config(
                "playback.tick_interval_ms must be positive".to_string(),
            ));
        }

        self.presentation
            .validate()
            .map_err(|e| SessionError::Config(format!("presentation: {e}")))?;

        if self.storage.database_url.trim().is_empty() {
            return Err(SessionError::Config(
                "storage.database_url is required".to_string(),
            ));
        }

        if self.paywall.gate_effects && self.paywall.product_id.trim().is_empty() {
            return Err(SessionError::Config(
                "paywall.product_id is required while effects are gated".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            blob_dir: default_blob_dir(),
        }
    }
}

impl Default for PaywallSettings {
    fn default() -> Self {
        Self {
            product_id: default_product_id(),
            gate_effects: default_gate_effects(),
        }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            privacy_policy: default_privacy_policy(),
            terms_of_use: default_terms_of_use(),
            share: default_share(),
            support_email: default_support_email(),
        }
    }
}

// Default values
fn default_database_url() -> String {
    "sqlite://./data/bass.db".to_string()
}

fn default_blob_dir() -> PathBuf {
    PathBuf::from("./data/blobs")
}

fn default_product_id() -> String {
    "bassbooster.premium.weekly".to_string()
}

fn default_gate_effects() -> bool {
    true
}

fn default_privacy_policy() -> String {
    "https://example.com/bassbooster/privacy".to_string()
}

fn default_terms_of_use() -> String {
    "https://example.com/bassbooster/terms".to_string()
}

fn default_share() -> String {
    "https://example.com/bassbooster".to_string()
}

fn default_support_email() -> String {
    "support@example.com".to_string()
}
