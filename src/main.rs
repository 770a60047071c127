//! ringup CLI entry point.
//!
//! Parses arguments, runs the selected command, and renders failures in a
//! user-friendly form before exiting non-zero.

use anyhow::Result;
use clap::Parser;
use ringup::cli;
use ringup::core::error::display_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(error) => {
            display_error(&error);
            std::process::exit(1);
        }
    }
}
