//! The upgrade state machine.
//!
//! [`UpgradeOrchestrator`] composes the capability traits — resolve ring,
//! fetch releases, stage tools, download assets, run installers — into one
//! all-or-nothing-per-step upgrade attempt:
//!
//! ```text
//! ResolvingRing → Fetching → Selecting ─┬─ NoUpdateAvailable (terminal)
//!                                       └─ Staging
//!                                            → DownloadingDependency
//!                                            → DownloadingProduct
//!                                            → InstallingDependency
//!                                            → InstallingProduct
//!                                            → Completed (terminal)
//! ```
//!
//! Any phase transitions to `Failed(phase, error)` on its first error. The
//! ordering is a hard invariant, not an optimization: staging must succeed
//! before any network cost is spent, the dependency installer is downloaded
//! and run before the product installer, and the product installer is never
//! invoked after a non-zero dependency exit.
//!
//! Execution is fully sequential; each phase blocks until its operation
//! completes. The staging/download tree is owned exclusively by the single
//! active attempt — at most one attempt runs per machine, a guarantee the
//! caller must enforce if concurrent invocation is possible.
//!
//! The orchestrator depends only on the capability traits, never on a
//! concrete variant; production wiring lives in [`ProductionEnv`] and the
//! test suite provides its own implementation.

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{GlobalConfig, RingPolicy, RingSource};
use crate::core::UpgradeError;
use crate::download::{AssetFetch, HttpDownloader};
use crate::install::{InstallLaunch, ProcessRunner};
use crate::release::fetch::{HttpReleaseFeed, ReleaseFeed};
use crate::release::select::select_upgrade;
use crate::release::{Asset, AssetRole, Release};
use crate::stage::{DirStager, ToolStaging};

/// Everything the orchestrator needs from the outside world.
///
/// Blanket-implemented for any type carrying all five capabilities, so the
/// orchestrator never names a concrete collaborator.
pub trait UpgradeEnv: RingSource + ReleaseFeed + ToolStaging + AssetFetch + InstallLaunch {}

impl<T> UpgradeEnv for T where
    T: RingSource + ReleaseFeed + ToolStaging + AssetFetch + InstallLaunch
{
}

/// Phases of one upgrade attempt, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ResolvingRing,
    Fetching,
    Selecting,
    Staging,
    DownloadingDependency,
    DownloadingProduct,
    InstallingDependency,
    InstallingProduct,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResolvingRing => "resolving ring",
            Self::Fetching => "fetching releases",
            Self::Selecting => "selecting candidate",
            Self::Staging => "staging tools",
            Self::DownloadingDependency => "downloading dependency installer",
            Self::DownloadingProduct => "downloading product installer",
            Self::InstallingDependency => "installing dependency",
            Self::InstallingProduct => "installing product",
        };
        f.write_str(name)
    }
}

/// Terminal result of one upgrade attempt.
#[derive(Debug)]
pub enum Outcome {
    /// Both installers completed with exit code zero.
    Completed,
    /// No admissible release strictly newer than the current version.
    NoUpdateAvailable,
    /// The attempt halted at `phase` with `error`. Remaining phases were
    /// not executed.
    Failed {
        phase: Phase,
        error: UpgradeError,
    },
}

/// Ephemeral record of one upgrade attempt.
///
/// Created per run, consumed by the caller, never persisted.
#[derive(Debug)]
pub struct UpgradeAttempt {
    /// Release the selector chose, if it got that far.
    pub selected: Option<Release>,
    /// Assets successfully materialized, in download order.
    pub downloaded: Vec<Asset>,
    /// How the attempt ended.
    pub outcome: Outcome,
}

/// The state machine driving one upgrade attempt.
pub struct UpgradeOrchestrator<E> {
    env: E,
    current_version: semver::Version,
    downloads_dir: PathBuf,
}

impl<E: UpgradeEnv> UpgradeOrchestrator<E> {
    pub fn new(env: E, current_version: semver::Version, downloads_dir: PathBuf) -> Self {
        Self {
            env,
            current_version,
            downloads_dir,
        }
    }

    /// Run one upgrade attempt to its terminal outcome.
    ///
    /// Never panics on a collaborator failure; the first error ends the
    /// attempt with `Failed { phase, error }`.
    pub async fn run(&self) -> UpgradeAttempt {
        let mut attempt = UpgradeAttempt {
            selected: None,
            downloaded: Vec::new(),
            outcome: Outcome::NoUpdateAvailable,
        };
        let mut phase = Phase::ResolvingRing;

        match self.drive(&mut attempt, &mut phase).await {
            Ok(outcome) => attempt.outcome = outcome,
            Err(error) => {
                warn!(%phase, %error, "upgrade attempt failed");
                attempt.outcome = Outcome::Failed { phase, error };
            }
        }
        attempt
    }

    async fn drive(
        &self,
        attempt: &mut UpgradeAttempt,
        phase: &mut Phase,
    ) -> Result<Outcome, UpgradeError> {
        *phase = Phase::ResolvingRing;
        let ring = self.env.resolve()?;
        info!(%ring, "resolved upgrade ring");

        *phase = Phase::Fetching;
        let releases = self.env.fetch_all().await?;

        *phase = Phase::Selecting;
        let Some(selected) = select_upgrade(&self.current_version, &releases, ring)? else {
            info!(current = %self.current_version, "no update available");
            return Ok(Outcome::NoUpdateAvailable);
        };
        info!(tag = %selected.tag, "upgrade candidate selected");
        attempt.selected = Some(selected.clone());

        // Staging must succeed before any download: if the tooling cannot
        // be made durable, abort before spending network and disk cost.
        *phase = Phase::Staging;
        let staged = self.env.ensure_staged().await?;
        debug!(staged = %staged.display(), "tools staged");

        *phase = Phase::DownloadingDependency;
        let dependency = self
            .download(&selected, AssetRole::Dependency, attempt)
            .await?;

        *phase = Phase::DownloadingProduct;
        let product = self.download(&selected, AssetRole::Product, attempt).await?;

        *phase = Phase::InstallingDependency;
        self.install(&dependency, AssetRole::Dependency).await?;

        *phase = Phase::InstallingProduct;
        self.install(&product, AssetRole::Product).await?;

        info!(tag = %selected.tag, "upgrade completed");
        Ok(Outcome::Completed)
    }

    async fn download(
        &self,
        release: &Release,
        role: AssetRole,
        attempt: &mut UpgradeAttempt,
    ) -> Result<Asset, UpgradeError> {
        let asset = release
            .find_asset(role)
            .ok_or_else(|| UpgradeError::UnknownAsset {
                name: format!("{role} installer for {}", release.tag),
            })?;

        let downloaded = self.env.download(asset, &self.downloads_dir).await?;
        attempt.downloaded.push(downloaded.clone());
        Ok(downloaded)
    }

    async fn install(&self, asset: &Asset, role: AssetRole) -> Result<(), UpgradeError> {
        let path = asset
            .local_path
            .as_ref()
            .ok_or_else(|| UpgradeError::Download {
                name: asset.name.clone(),
                reason: "asset was never materialized".to_string(),
            })?;

        let exit = self.env.run(path, role.installer_args()).await?;
        if !exit.success() {
            return Err(UpgradeError::Install {
                installer: asset.name.clone(),
                exit_code: exit.exit_code,
                message: exit.message,
            });
        }
        Ok(())
    }
}

/// Production wiring of the five capabilities.
///
/// Bundles the real collaborators — config-backed ring policy, HTTP feed,
/// directory stager, HTTP downloader, process runner — behind the
/// capability traits the orchestrator consumes.
pub struct ProductionEnv {
    ring: RingPolicy,
    feed: HttpReleaseFeed,
    stager: DirStager,
    downloader: HttpDownloader,
    runner: ProcessRunner,
}

impl ProductionEnv {
    pub fn new(config: &GlobalConfig, tools_dir: PathBuf) -> Result<Self, UpgradeError> {
        Ok(Self {
            ring: RingPolicy::new(config),
            feed: HttpReleaseFeed::new(config.feed_url())?,
            stager: DirStager::new(tools_dir),
            downloader: HttpDownloader::new()?,
            runner: ProcessRunner,
        })
    }
}

impl RingSource for ProductionEnv {
    fn resolve(&self) -> Result<crate::release::RingType, UpgradeError> {
        self.ring.resolve()
    }
}

impl ReleaseFeed for ProductionEnv {
    async fn fetch_all(&self) -> Result<Vec<Release>, UpgradeError> {
        self.feed.fetch_all().await
    }
}

impl ToolStaging for ProductionEnv {
    async fn ensure_staged(&self) -> Result<PathBuf, UpgradeError> {
        self.stager.ensure_staged().await
    }
}

impl AssetFetch for ProductionEnv {
    async fn download(
        &self,
        asset: &Asset,
        dest_dir: &std::path::Path,
    ) -> Result<Asset, UpgradeError> {
        self.downloader.download(asset, dest_dir).await
    }
}

impl InstallLaunch for ProductionEnv {
    async fn run(
        &self,
        installer: &std::path::Path,
        args: &str,
    ) -> Result<crate::install::InstallExit, UpgradeError> {
        self.runner.run(installer, args).await
    }
}
