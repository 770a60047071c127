//! Global constants used throughout the ringup codebase.
//!
//! Endpoint locations, on-disk directory names, and the expected installer
//! asset names live here so the orchestrator, downloader, and CLI agree on
//! them without passing strings around.

use std::time::Duration;

/// Release feed queried for available versions.
///
/// A GitHub-style releases endpoint: a JSON array of release records, each
/// carrying a tag, a pre-release flag, and its downloadable assets.
pub const RELEASE_FEED_URL: &str = "https://api.github.com/repos/ringup/ringup/releases";

/// `User-Agent` sent with every feed and asset request.
pub const USER_AGENT: &str = concat!("ringup/", env!("CARGO_PKG_VERSION"));

/// Timeout for the release feed request (30 seconds).
pub const FEED_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Directory under the user's home holding config and upgrade state.
pub const CONFIG_DIR_NAME: &str = ".ringup";

/// Global configuration file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the global configuration file path.
pub const CONFIG_PATH_ENV: &str = "RINGUP_CONFIG_PATH";

/// Durable upgrade root under the config directory.
///
/// Holds the staged tools and downloaded installers so an in-flight upgrade
/// survives replacement of the live installation.
pub const UPGRADE_DIR_NAME: &str = "upgrade";

/// Staged copy of the running executable lives here.
pub const TOOLS_DIR_NAME: &str = "tools";

/// Downloaded installer assets land here.
pub const DOWNLOADS_DIR_NAME: &str = "downloads";

/// Cached result of the last update check, stored as JSON.
pub const VERSION_CACHE_FILE_NAME: &str = ".version_cache";

/// Asset name prefix identifying the dependency (runtime) installer.
///
/// Matching is case-insensitive, mirroring how release assets are published.
pub const DEPENDENCY_ASSET_PREFIX: &str = "runtime-";

/// Asset name prefix identifying the product installer.
pub const PRODUCT_ASSET_PREFIX: &str = "ringup-setup";

/// Argument string passed to the dependency installer.
pub const DEPENDENCY_INSTALLER_ARGS: &str = "--silent --no-restart";

/// Argument string passed to the product installer.
pub const PRODUCT_INSTALLER_ARGS: &str = "--silent";
