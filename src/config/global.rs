//! Global configuration loading and ring resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV, RELEASE_FEED_URL};
use crate::core::UpgradeError;
use crate::release::RingType;

/// User-wide configuration, loaded from `~/.ringup/config.toml`.
///
/// A missing file is not an error: it yields the defaults, in which no
/// ring is configured and any upgrade attempt fails during ring
/// resolution with a configuration error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Configured update ring. Absent means "not configured", which is a
    /// configuration error at resolution time, not at load time.
    #[serde(default)]
    pub ring: Option<RingType>,
    /// Optional override of the release feed endpoint.
    #[serde(default)]
    pub feed_url: Option<String>,
    /// Update-check behavior.
    #[serde(default)]
    pub upgrade: UpgradeConfig,
}

/// Settings controlling update-check cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeConfig {
    /// Seconds a cached update-check result stays valid. Default 86400
    /// (24 hours), balancing freshness against feed rate limits.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
        }
    }
}

fn default_check_interval() -> u64 {
    86400
}

impl GlobalConfig {
    /// Path to the global configuration file.
    ///
    /// `RINGUP_CONFIG_PATH` takes priority; otherwise `~/.ringup/config.toml`.
    pub fn default_path() -> Result<PathBuf, UpgradeError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| UpgradeError::Configuration {
                reason: "could not determine home directory".to_string(),
            })
    }

    /// Directory holding the configuration file and adjacent state such as
    /// the version-check cache.
    pub fn config_dir() -> Result<PathBuf, UpgradeError> {
        let path = Self::default_path()?;
        Ok(path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Load the global configuration from its default location.
    pub async fn load() -> Result<Self, UpgradeError> {
        Self::load_from(&Self::default_path()?).await
    }

    /// Load the global configuration from an explicit path.
    pub async fn load_from(path: &Path) -> Result<Self, UpgradeError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|err| UpgradeError::Configuration {
                reason: format!("cannot read '{}': {err}", path.display()),
            })?;

        toml::from_str(&content).map_err(|err| UpgradeError::Configuration {
            reason: format!("invalid config '{}': {err}", path.display()),
        })
    }

    /// Effective release feed URL, honoring the configured override.
    pub fn feed_url(&self) -> &str {
        self.feed_url.as_deref().unwrap_or(RELEASE_FEED_URL)
    }
}

/// Capability to resolve the configured update ring.
pub trait RingSource {
    /// Resolve the ring, failing with [`UpgradeError::Configuration`] when
    /// the stored value is invalid or absent. No side effects.
    fn resolve(&self) -> Result<RingType, UpgradeError>;
}

/// Production ring resolution backed by [`GlobalConfig`].
pub struct RingPolicy {
    ring: Option<RingType>,
}

impl RingPolicy {
    pub fn new(config: &GlobalConfig) -> Self {
        Self { ring: config.ring }
    }
}

impl RingSource for RingPolicy {
    fn resolve(&self) -> Result<RingType, UpgradeError> {
        match self.ring {
            Some(ring) if ring != RingType::Invalid => Ok(ring),
            Some(_) => Err(UpgradeError::Configuration {
                reason: "invalid upgrade ring specified in config; expected \"fast\" or \"slow\""
                    .to_string(),
            }),
            None => Err(UpgradeError::Configuration {
                reason: "no upgrade ring configured; set ring = \"fast\" or \"slow\" in config"
                    .to_string(),
            }),
        }
    }
}
