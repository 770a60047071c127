//! ringup - ring-based self-update orchestrator.
//!
//! Given the currently installed version and a configured update ring,
//! ringup determines whether a newer release exists on the remote
//! distribution point, downloads that release's installer assets, stages
//! its own executable so the upgrade survives replacement of the live
//! installation, and runs the installers in a fixed dependency order:
//! runtime first, product second.
//!
//! # Architecture
//!
//! The workflow is a small state machine over unreliable I/O. Each
//! external operation lives behind a capability trait so the orchestrator
//! never depends on a concrete collaborator:
//!
//! | Capability | Production implementation |
//! |------------|---------------------------|
//! | [`config::RingSource`] | [`config::RingPolicy`] over the global TOML config |
//! | [`release::fetch::ReleaseFeed`] | [`release::fetch::HttpReleaseFeed`] |
//! | [`stage::ToolStaging`] | [`stage::DirStager`] |
//! | [`download::AssetFetch`] | [`download::HttpDownloader`] |
//! | [`install::InstallLaunch`] | [`install::ProcessRunner`] |
//!
//! [`orchestrator::UpgradeOrchestrator`] sequences the capabilities into
//! one attempt with fail-fast semantics: the first error terminates the
//! attempt with the phase it occurred in; no rollback, no retries.
//!
//! # Modules
//!
//! - [`cli`] - command-line surface (`check`, `run`, `status`)
//! - [`config`] - global configuration and ring resolution
//! - [`core`] - the [`core::UpgradeError`] shared by every component
//! - [`release`] - release/asset data model, feed retrieval, selection
//! - [`stage`] - durable staging of the orchestrator executable
//! - [`download`] - installer asset materialization
//! - [`install`] - installer process invocation
//! - [`orchestrator`] - the upgrade state machine
//! - [`version_cache`] - cached update-check results

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod download;
pub mod install;
pub mod orchestrator;
pub mod release;
pub mod stage;
pub mod version_cache;
