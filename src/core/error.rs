//! Error handling for ringup.
//!
//! All upgrade failures are expressed as [`UpgradeError`] variants, one per
//! failure category of the workflow: configuration, network, asset
//! recognition, download, staging, and installer execution. Components return
//! these as explicit `Result`s; nothing in the upgrade path panics on an
//! external failure.
//!
//! The CLI layer wraps these in [`anyhow::Error`] for context chaining, and
//! the binary renders them through [`display_error`].

use colored::Colorize;
use thiserror::Error;

/// The error type shared by every upgrade component.
///
/// Each variant corresponds to one failure category of the upgrade workflow.
/// The orchestrator propagates these unmodified, pairing them with the phase
/// in which they occurred in its terminal outcome.
#[derive(Error, Debug)]
pub enum UpgradeError {
    /// The upgrade ring is missing or invalid in the global configuration.
    #[error("configuration error: {reason}")]
    Configuration {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// The release feed or an asset endpoint could not be reached, timed
    /// out, or returned a malformed response.
    #[error("network error during {operation}: {reason}")]
    Network {
        /// The request that failed (feed fetch, asset fetch).
        operation: String,
        /// Transport or decoding failure detail.
        reason: String,
    },

    /// A release asset does not match any expected installer name.
    ///
    /// Unrecognized assets are rejected before any bytes are written.
    #[error("unrecognized or missing release asset: {name}")]
    UnknownAsset {
        /// The offending asset name (or the role that had no asset).
        name: String,
    },

    /// An asset download failed in transport or on write.
    ///
    /// A partial file is removed before this error is reported, so no
    /// later step can mistake it for a usable installer.
    #[error("failed to download asset '{name}': {reason}")]
    Download {
        /// Asset that was being downloaded.
        name: String,
        /// Transport or filesystem failure detail.
        reason: String,
    },

    /// The staging directory could not be created or the orchestrator
    /// executable could not be copied into it.
    #[error("failed to stage upgrade tools: {reason}")]
    Staging {
        /// Filesystem failure detail.
        reason: String,
    },

    /// An installer could not be launched or exited with a non-zero code.
    #[error("installer '{installer}' failed with exit code {exit_code}: {message}")]
    Install {
        /// File name of the installer that failed.
        installer: String,
        /// Process exit code (`-1` when the process never launched or was
        /// terminated by a signal).
        exit_code: i32,
        /// Captured installer output, when any was produced.
        message: String,
    },

    /// A release version tag could not be parsed as a semantic version.
    #[error("release tag '{tag}' is not a valid version")]
    VersionTag {
        /// The unparseable tag.
        tag: String,
        /// Underlying semver parse error.
        #[source]
        source: semver::Error,
    },
}

/// Print an error chain to stderr in a user-friendly, colored format.
///
/// Used by the binary entry point as the single exit path for failures.
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {}", "error:".red().bold(), error);
    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".yellow(), cause);
    }
}
