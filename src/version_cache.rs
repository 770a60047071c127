//! Cached update-check results.
//!
//! Checking for updates costs a network round trip, so the result of the
//! last check is persisted as JSON next to the configuration file and
//! reused while it is fresh. The cache is advisory: a full upgrade attempt
//! always refetches the feed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::constants::VERSION_CACHE_FILE_NAME;

/// Result of the most recent update check.
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionCheckCache {
    /// Latest version tag seen on the feed (without `v` prefix).
    pub latest_version: String,
    /// Version that was running when the check was made.
    pub current_version: String,
    /// When the check was performed.
    pub checked_at: DateTime<Utc>,
    /// Whether the check found a newer admissible release.
    pub update_available: bool,
}

impl VersionCheckCache {
    /// Build a cache entry, deriving `update_available` from a semver
    /// comparison of the two versions (false when either fails to parse).
    pub fn new(current_version: String, latest_version: String) -> Self {
        let update_available = {
            let current = semver::Version::parse(&current_version).ok();
            let latest = semver::Version::parse(&latest_version).ok();
            match (current, latest) {
                (Some(c), Some(l)) => l > c,
                _ => false,
            }
        };

        Self {
            latest_version,
            current_version,
            checked_at: Utc::now(),
            update_available,
        }
    }

    /// Whether the cached result is still fresh for the given interval.
    pub fn is_valid(&self, interval_seconds: u64) -> bool {
        let age = Utc::now() - self.checked_at;
        age.num_seconds() < interval_seconds as i64
    }
}

/// Loads and saves the version-check cache file.
pub struct VersionCacheStore {
    path: PathBuf,
}

impl VersionCacheStore {
    /// Store the cache inside `state_dir` (normally the config directory).
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(VERSION_CACHE_FILE_NAME),
        }
    }

    pub async fn load(&self) -> Result<Option<VersionCheckCache>> {
        if !self.path.exists() {
            debug!("no version cache found");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .await
            .context("failed to read version cache")?;
        let cache = serde_json::from_str(&content).context("failed to parse version cache")?;
        Ok(Some(cache))
    }

    pub async fn save(&self, cache: &VersionCheckCache) -> Result<()> {
        let content =
            serde_json::to_string_pretty(cache).context("failed to serialize version cache")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("failed to create cache directory")?;
        }
        fs::write(&self.path, content)
            .await
            .context("failed to write version cache")?;

        debug!(path = %self.path.display(), "version check cached");
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .context("failed to remove version cache")?;
        }
        Ok(())
    }
}

/// Print a colored banner announcing an available update.
pub fn display_update_notification(current: &str, latest: &str) {
    eprintln!();
    eprintln!("{}", "A new version of ringup is available!".bright_cyan());
    eprintln!("  current: {}", current.yellow());
    eprintln!("  latest:  {}", latest.green().bold());
    eprintln!();
    eprintln!("  Run {} to upgrade", "ringup run".cyan().bold());
    eprintln!();
}

/// Human-readable version summary for status output.
pub fn format_version_info(current: &str, latest: Option<&str>) -> String {
    match latest {
        Some(v) if v != current => {
            format!("current version: {current}\nlatest version:  {v} (update available)")
        }
        _ => format!("current version: {current} (up to date)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cache_validity_depends_on_interval() {
        let cache = VersionCheckCache::new("1.0.0".to_string(), "1.1.0".to_string());
        assert!(cache.is_valid(3600));
        assert!(!cache.is_valid(0));
    }

    #[test]
    fn update_available_tracks_version_order() {
        assert!(VersionCheckCache::new("1.0.0".into(), "1.1.0".into()).update_available);
        assert!(!VersionCheckCache::new("1.1.0".into(), "1.1.0".into()).update_available);
        assert!(!VersionCheckCache::new("1.1.0".into(), "not-a-version".into()).update_available);
    }

    #[tokio::test]
    async fn cache_round_trips_through_the_store() {
        let temp = TempDir::new().unwrap();
        let store = VersionCacheStore::new(temp.path());

        assert!(store.load().await.unwrap().is_none());

        let cache = VersionCheckCache::new("1.0.0".to_string(), "1.2.0".to_string());
        store.save(&cache).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.latest_version, "1.2.0");
        assert_eq!(loaded.current_version, "1.0.0");
        assert!(loaded.update_available);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[test]
    fn version_info_formatting() {
        assert_eq!(
            format_version_info("1.0.0", None),
            "current version: 1.0.0 (up to date)"
        );
        assert_eq!(
            format_version_info("1.0.0", Some("1.0.0")),
            "current version: 1.0.0 (up to date)"
        );
        assert_eq!(
            format_version_info("1.0.0", Some("1.1.0")),
            "current version: 1.0.0\nlatest version:  1.1.0 (update available)"
        );
    }
}
