//! Configuration management for ringup.
//!
//! A single global TOML file holds everything this tool is configured by:
//!
//! ```toml
//! # ~/.ringup/config.toml
//! ring = "slow"            # "fast" | "slow"
//! # feed_url = "https://releases.example.com/feed"   # optional override
//!
//! [upgrade]
//! check_interval = 86400   # seconds a cached update check stays valid
//! ```
//!
//! **Location:**
//! - Unix/macOS: `~/.ringup/config.toml`
//! - override: `RINGUP_CONFIG_PATH` environment variable
//!
//! How the ring value is stored is this module's concern alone; the rest of
//! the crate consumes it through [`RingPolicy`].

pub mod global;

pub use global::{GlobalConfig, RingPolicy, RingSource, UpgradeConfig};
