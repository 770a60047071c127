//! `ringup check` - query for a newer release without installing anything.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::debug;

use crate::config::{GlobalConfig, RingPolicy, RingSource};
use crate::release::fetch::{HttpReleaseFeed, ReleaseFeed};
use crate::release::select::select_upgrade;
use crate::version_cache::{
    VersionCacheStore, VersionCheckCache, display_update_notification,
};

#[derive(Args)]
pub struct CheckCommand {
    /// Bypass the cached check result and query the release feed
    #[arg(long)]
    refresh: bool,
}

impl CheckCommand {
    pub async fn execute(self) -> Result<()> {
        let config = GlobalConfig::load().await?;
        let ring = RingPolicy::new(&config).resolve()?;
        let current = super::current_version()?;
        let store = VersionCacheStore::new(&GlobalConfig::config_dir()?);

        if !self.refresh {
            if let Some(cache) = store.load().await? {
                if cache.is_valid(config.upgrade.check_interval) {
                    debug!("using cached update check");
                    self.report(&current.to_string(), &cache);
                    return Ok(());
                }
            }
        }

        let feed = HttpReleaseFeed::new(config.feed_url())?;
        let releases = feed
            .fetch_all()
            .await
            .context("failed to fetch release feed")?;
        let selected = select_upgrade(&current, &releases, ring)?;

        let latest = match &selected {
            Some(release) => release.version()?.to_string(),
            None => current.to_string(),
        };
        let cache = VersionCheckCache::new(current.to_string(), latest);
        store.save(&cache).await?;

        self.report(&current.to_string(), &cache);
        Ok(())
    }

    fn report(&self, current: &str, cache: &VersionCheckCache) {
        if cache.update_available {
            display_update_notification(current, &cache.latest_version);
        } else {
            println!("{} ringup {current} is up to date", "✓".green());
        }
    }
}
