//! Installer invocation.
//!
//! Launches a local installer executable and blocks until it exits. A
//! non-zero exit code is reported through the return value, not as an
//! error: whether non-zero is fatal is the orchestrator's decision.

use std::path::Path;

use tracing::{debug, info};

use crate::core::UpgradeError;

/// Result of one installer invocation.
#[derive(Debug, Clone)]
pub struct InstallExit {
    /// Process exit code. `-1` when the process was terminated by a
    /// signal and no code was available.
    pub exit_code: i32,
    /// Captured stderr, trimmed. Usually empty on success.
    pub message: String,
}

impl InstallExit {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability to launch a local installer executable.
pub trait InstallLaunch {
    /// Run `installer` with `args` (whitespace-separated), waiting for it
    /// to exit.
    ///
    /// Fails with [`UpgradeError::Install`] only when the process cannot
    /// be launched at all; an unhappy exit code comes back as data.
    fn run(
        &self,
        installer: &Path,
        args: &str,
    ) -> impl std::future::Future<Output = Result<InstallExit, UpgradeError>>;
}

/// Production runner spawning the installer as a child process.
pub struct ProcessRunner;

impl InstallLaunch for ProcessRunner {
    async fn run(&self, installer: &Path, args: &str) -> Result<InstallExit, UpgradeError> {
        info!(installer = %installer.display(), args, "launching installer");

        let mut command = tokio::process::Command::new(installer);
        if !args.is_empty() {
            command.args(args.split_whitespace());
        }

        let output = command.output().await.map_err(|err| UpgradeError::Install {
            installer: installer.display().to_string(),
            exit_code: -1,
            message: format!("failed to launch: {err}"),
        })?;

        let exit_code = output.status.code().unwrap_or(-1);
        let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(exit_code, "installer exited");

        Ok(InstallExit { exit_code, message })
    }
}
