//! Command-line interface for ringup.
//!
//! Each command lives in its own module with an args struct and an
//! `execute()` method:
//!
//! - `check` - query the release feed (or the cache) for a newer version
//! - `run` - run one full upgrade attempt
//! - `status` - show the current version and the last check result
//!
//! Global flags control logging verbosity; `RUST_LOG` takes priority when
//! set, so scripted environments keep full control over filtering.

mod check;
mod run;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Top-level CLI definition.
#[derive(Parser)]
#[command(
    name = "ringup",
    version,
    about = "Ring-based self-update orchestrator",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug) output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a newer release is available
    Check(check::CheckCommand),
    /// Run a full upgrade attempt
    Run(run::RunCommand),
    /// Show current version, ring, and cached update information
    Status(status::StatusCommand),
}

impl Cli {
    /// Execute the selected command.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();
        match self.command {
            Commands::Check(cmd) => cmd.execute().await,
            Commands::Run(cmd) => cmd.execute().await,
            Commands::Status(cmd) => cmd.execute().await,
        }
    }

    fn init_logging(&self) {
        let default_level = if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Version of the running binary, parsed once from the build metadata.
pub(crate) fn current_version() -> Result<semver::Version> {
    semver::Version::parse(env!("CARGO_PKG_VERSION"))
        .map_err(|err| anyhow::anyhow!("invalid build version: {err}"))
}
