//! `ringup run` - run one full upgrade attempt.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use crate::config::GlobalConfig;
use crate::constants::{DOWNLOADS_DIR_NAME, TOOLS_DIR_NAME};
use crate::orchestrator::{Outcome, ProductionEnv, UpgradeOrchestrator};
use crate::stage::upgrade_root;
use crate::version_cache::VersionCacheStore;

#[derive(Args)]
pub struct RunCommand;

impl RunCommand {
    pub async fn execute(self) -> Result<()> {
        let config = GlobalConfig::load().await?;
        let current = super::current_version()?;

        let root = upgrade_root()?;
        let env = ProductionEnv::new(&config, root.join(TOOLS_DIR_NAME))?;
        let orchestrator =
            UpgradeOrchestrator::new(env, current.clone(), root.join(DOWNLOADS_DIR_NAME));

        println!("Checking for updates (current version {current})...");
        let attempt = orchestrator.run().await;

        match attempt.outcome {
            Outcome::Completed => {
                if let Some(release) = &attempt.selected {
                    println!(
                        "{} upgraded to {}",
                        "✓".green().bold(),
                        release.tag.green().bold()
                    );
                }
                for asset in &attempt.downloaded {
                    if let Some(path) = &asset.local_path {
                        println!("  installed {} ({})", asset.name, path.display());
                    }
                }
                // The cached check result describes the old installation.
                VersionCacheStore::new(&GlobalConfig::config_dir()?)
                    .clear()
                    .await?;
                Ok(())
            }
            Outcome::NoUpdateAvailable => {
                println!("{} ringup {current} is up to date", "✓".green());
                Ok(())
            }
            Outcome::Failed { phase, error } => {
                bail!("upgrade failed while {phase}: {error}")
            }
        }
    }
}
