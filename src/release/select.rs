//! Upgrade candidate selection.
//!
//! Given the fetched catalog, the current version, and the resolved ring,
//! pick the single best upgrade candidate. "No candidate" is a normal
//! outcome, not a failure.

use tracing::debug;

use super::{Release, RingType};
use crate::core::UpgradeError;

/// Pick the best upgrade candidate from `releases`, or `None`.
///
/// Releases are filtered to those admissible under `ring`, then to those
/// strictly newer than `current`; the maximum by version order wins.
/// Equal-version duplicates resolve to the first one encountered, so the
/// choice is deterministic for a given feed order.
///
/// A release tag that cannot be parsed is a [`UpgradeError::VersionTag`]
/// error rather than being silently skipped: a feed with a corrupt tag is
/// indistinguishable from a feed we are misreading.
pub fn select_upgrade(
    current: &semver::Version,
    releases: &[Release],
    ring: RingType,
) -> Result<Option<Release>, UpgradeError> {
    let mut best: Option<(semver::Version, &Release)> = None;

    for release in releases {
        if !ring.admits(release) {
            debug!(tag = %release.tag, %ring, "release not admissible under ring");
            continue;
        }

        let version = release.version()?;
        if version <= *current {
            continue;
        }

        match &best {
            Some((best_version, _)) if *best_version >= version => {}
            _ => best = Some((version, release)),
        }
    }

    Ok(best.map(|(_, release)| release.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str, pre_release: bool) -> Release {
        Release {
            display_name: format!("ringup {tag}"),
            tag: tag.to_string(),
            pre_release,
            assets: Vec::new(),
        }
    }

    fn v(s: &str) -> semver::Version {
        semver::Version::parse(s).unwrap()
    }

    #[test]
    fn picks_the_newest_admissible_release() {
        let releases = vec![
            release("v1.1.0", false),
            release("v1.3.0", false),
            release("v1.2.0", false),
        ];
        let selected = select_upgrade(&v("1.0.0"), &releases, RingType::Slow).unwrap();
        assert_eq!(selected.unwrap().tag, "v1.3.0");
    }

    #[test]
    fn never_selects_current_or_older() {
        let releases = vec![release("v1.0.0", false), release("v0.9.0", false)];
        let selected = select_upgrade(&v("1.0.0"), &releases, RingType::Fast).unwrap();
        assert!(selected.is_none());
    }

    #[test]
    fn slow_ring_ignores_newer_prerelease() {
        let releases = vec![release("v2.0.0", true)];
        let selected = select_upgrade(&v("1.0.0"), &releases, RingType::Slow).unwrap();
        assert!(selected.is_none());
    }

    #[test]
    fn fast_ring_accepts_prerelease() {
        let releases = vec![release("v2.0.0", true)];
        let selected = select_upgrade(&v("1.0.0"), &releases, RingType::Fast).unwrap();
        assert_eq!(selected.unwrap().tag, "v2.0.0");
    }

    #[test]
    fn equal_version_duplicates_resolve_to_first() {
        let mut first = release("v1.5.0", false);
        first.display_name = "first".to_string();
        let mut second = release("v1.5.0", false);
        second.display_name = "second".to_string();

        let selected =
            select_upgrade(&v("1.0.0"), &[first, second], RingType::Slow).unwrap();
        assert_eq!(selected.unwrap().display_name, "first");
    }

    #[test]
    fn corrupt_tag_is_a_selection_error() {
        let releases = vec![release("latest", false)];
        let err = select_upgrade(&v("1.0.0"), &releases, RingType::Fast).unwrap_err();
        assert!(matches!(err, UpgradeError::VersionTag { .. }));
    }

    #[test]
    fn empty_catalog_yields_none() {
        let selected = select_upgrade(&v("1.0.0"), &[], RingType::Fast).unwrap();
        assert!(selected.is_none());
    }
}
