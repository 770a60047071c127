//! Release data model: assets, releases, rings, and installer roles.
//!
//! These types are deserialized straight from the release feed response and
//! are immutable once constructed, with one exception: an [`Asset`]'s
//! `local_path` transitions from absent to present exactly once, when the
//! downloader materializes it on disk.
//!
//! # Rings
//!
//! The update ring decides which releases are eligible for a machine:
//!
//! | Ring | Stable releases | Pre-releases |
//! |------|-----------------|--------------|
//! | `Fast` | yes | yes |
//! | `Slow` | yes | no |
//! | `Invalid` | no | no |
//!
//! `Invalid` is never a valid operating configuration; resolving it is a
//! configuration error, not a silent no-op.

pub mod fetch;
pub mod select;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEPENDENCY_ASSET_PREFIX, PRODUCT_ASSET_PREFIX};
use crate::core::UpgradeError;

/// A single downloadable file belonging to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    /// File name as published on the release.
    pub name: String,
    /// Size in bytes as reported by the feed. Informational only; the
    /// download is not cross-checked against it.
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// Direct download URL for the asset bytes.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
    /// Local path of the materialized file. Set exactly once, by a
    /// successful download, and never reverted.
    #[serde(skip)]
    pub local_path: Option<PathBuf>,
}

impl Asset {
    /// Whether this asset has been materialized to local storage.
    pub fn is_downloaded(&self) -> bool {
        self.local_path.is_some()
    }
}

/// One remote release: metadata plus its ordered assets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Human-readable release name.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Version tag, e.g. `"v1.2.3"`. Must parse as semver (a leading `v`
    /// is tolerated); see [`Release::version`].
    #[serde(rename = "tag_name")]
    pub tag: String,
    /// Whether the release is marked as a pre-release.
    #[serde(rename = "prerelease")]
    pub pre_release: bool,
    /// Downloadable assets attached to this release, in feed order.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Parse the version tag into a comparable version value.
    ///
    /// A tag that does not parse is a distinct [`UpgradeError::VersionTag`]
    /// error, never a panic.
    pub fn version(&self) -> Result<semver::Version, UpgradeError> {
        let trimmed = self.tag.trim_start_matches('v');
        semver::Version::parse(trimmed).map_err(|source| UpgradeError::VersionTag {
            tag: self.tag.clone(),
            source,
        })
    }

    /// Find the first asset filling the given installer role, if any.
    pub fn find_asset(&self, role: AssetRole) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|asset| AssetRole::classify(&asset.name) == Some(role))
    }
}

/// The configured update channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingType {
    /// Admits stable releases and pre-releases.
    Fast,
    /// Admits stable releases only.
    Slow,
    /// Unrecognized or unset ring. Always a configuration error.
    #[default]
    #[serde(other)]
    Invalid,
}

impl RingType {
    /// Whether a release is eligible under this ring.
    pub fn admits(self, release: &Release) -> bool {
        match self {
            Self::Fast => true,
            Self::Slow => !release.pre_release,
            Self::Invalid => false,
        }
    }
}

impl fmt::Display for RingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fast => "fast",
            Self::Slow => "slow",
            Self::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// The two installer roles this workflow knows about.
///
/// The dependency installer (runtime/toolchain) is always downloaded and
/// run before the product installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRole {
    /// Runtime/toolchain installer the product depends on.
    Dependency,
    /// The main product installer.
    Product,
}

impl AssetRole {
    /// Match an asset name against the expected installer names.
    ///
    /// Returns `None` for anything that is not a recognized installer;
    /// such assets are rejected before touching disk. Matching is
    /// case-insensitive.
    pub fn classify(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.starts_with(DEPENDENCY_ASSET_PREFIX) {
            Some(Self::Dependency)
        } else if lower.starts_with(PRODUCT_ASSET_PREFIX) {
            Some(Self::Product)
        } else {
            None
        }
    }

    /// Argument string passed to this role's installer.
    pub fn installer_args(self) -> &'static str {
        match self {
            Self::Dependency => crate::constants::DEPENDENCY_INSTALLER_ARGS,
            Self::Product => crate::constants::PRODUCT_INSTALLER_ARGS,
        }
    }
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dependency => "dependency",
            Self::Product => "product",
        };
        f.write_str(name)
    }
}
