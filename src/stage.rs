//! Tool staging: a durable copy of the orchestrator outside the live
//! installation.
//!
//! The upgrade replaces the installation that is currently running this
//! executable. Before spending any network or disk cost on downloads, the
//! executable is copied into a staging directory under the user's home so
//! the remainder of the workflow keeps a usable copy even while the live
//! installation is being overwritten by the installers it triggers.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::constants::{CONFIG_DIR_NAME, UPGRADE_DIR_NAME};
use crate::core::UpgradeError;

/// Capability to stage the upgrade tooling.
pub trait ToolStaging {
    /// Idempotently create the staging directory and copy the running
    /// executable into it, returning the staged executable path.
    ///
    /// Fails with [`UpgradeError::Staging`] when the directory cannot be
    /// created or the copy cannot be written.
    fn ensure_staged(&self)
    -> impl std::future::Future<Output = Result<PathBuf, UpgradeError>>;
}

/// Durable upgrade root: `~/.ringup/upgrade`.
///
/// Both the staged tools and the downloaded installers live under this
/// directory, outside any directory the installers replace.
pub fn upgrade_root() -> Result<PathBuf, UpgradeError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME).join(UPGRADE_DIR_NAME))
        .ok_or_else(|| UpgradeError::Staging {
            reason: "could not determine home directory".to_string(),
        })
}

/// Production stager copying the current executable into a tools directory.
pub struct DirStager {
    tools_dir: PathBuf,
}

impl DirStager {
    /// Stage into the given tools directory.
    pub fn new(tools_dir: PathBuf) -> Self {
        Self { tools_dir }
    }

    async fn copy_into_tools(&self, source: &Path) -> Result<PathBuf, UpgradeError> {
        let staging_err = |reason: String| UpgradeError::Staging { reason };

        let file_name = source.file_name().ok_or_else(|| {
            staging_err(format!(
                "executable path '{}' has no file name",
                source.display()
            ))
        })?;
        let staged = self.tools_dir.join(file_name);

        fs::create_dir_all(&self.tools_dir).await.map_err(|err| {
            staging_err(format!(
                "cannot create '{}': {err}",
                self.tools_dir.display()
            ))
        })?;

        // tokio::fs::copy preserves the permission bits, so the staged
        // copy stays executable on Unix.
        fs::copy(source, &staged).await.map_err(|err| {
            staging_err(format!("cannot write '{}': {err}", staged.display()))
        })?;

        debug!(staged = %staged.display(), "upgrade tools staged");
        Ok(staged)
    }
}

impl ToolStaging for DirStager {
    async fn ensure_staged(&self) -> Result<PathBuf, UpgradeError> {
        let current = std::env::current_exe().map_err(|err| UpgradeError::Staging {
            reason: format!("cannot locate running executable: {err}"),
        })?;
        self.copy_into_tools(&current).await
    }
}
