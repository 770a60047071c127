//! `ringup status` - show the current version, ring, and last check.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::GlobalConfig;
use crate::release::RingType;
use crate::version_cache::{VersionCacheStore, format_version_info};

#[derive(Args)]
pub struct StatusCommand;

impl StatusCommand {
    pub async fn execute(self) -> Result<()> {
        let config = GlobalConfig::load().await?;
        let current = super::current_version()?.to_string();

        let ring = match config.ring {
            Some(RingType::Invalid) => "invalid".red().to_string(),
            Some(ring) => ring.to_string(),
            None => "not configured".yellow().to_string(),
        };
        println!("upgrade ring:    {ring}");

        let store = VersionCacheStore::new(&GlobalConfig::config_dir()?);
        match store.load().await? {
            Some(cache) => {
                println!(
                    "{}",
                    format_version_info(&current, Some(&cache.latest_version))
                );
                println!(
                    "last checked:    {}",
                    cache.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
            None => {
                println!("{}", format_version_info(&current, None));
                println!("last checked:    never (run 'ringup check')");
            }
        }
        Ok(())
    }
}
