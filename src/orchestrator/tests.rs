use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::*;
use crate::install::InstallExit;
use crate::release::RingType;

/// Which collaborator the mock environment should fail, mirroring the
/// orchestrator's externally-failing steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FailPoint {
    Fetch,
    Stage,
    DownloadDependency,
    DownloadProduct,
    InstallDependency,
    InstallProduct,
}

/// Test double carrying all five capabilities, with injectable failures
/// and a call-sequence tracker.
struct MockEnv {
    ring: Option<RingType>,
    releases: Vec<Release>,
    fail: HashSet<FailPoint>,
    calls: RefCell<Vec<&'static str>>,
}

impl MockEnv {
    fn new(ring: Option<RingType>) -> Self {
        Self {
            ring,
            releases: Vec::new(),
            fail: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Publish a fake release with both installer assets attached.
    fn with_remote_release(mut self, version: &str, pre_release: bool) -> Self {
        let url_prefix = format!("https://example.invalid/releases/download/v{version}");
        let asset = |name: String| Asset {
            download_url: format!("{url_prefix}/{name}"),
            name,
            size_bytes: 4096,
            local_path: None,
        };
        self.releases.push(Release {
            display_name: format!("ringup {version}"),
            tag: format!("v{version}"),
            pre_release,
            assets: vec![
                asset(format!("ringup-setup.{version}.run")),
                asset("runtime-3.1.4-x86_64.run".to_string()),
            ],
        });
        self
    }

    fn fail_on(mut self, point: FailPoint) -> Self {
        self.fail.insert(point);
        self
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl RingSource for MockEnv {
    fn resolve(&self) -> Result<RingType, UpgradeError> {
        self.record("resolve_ring");
        match self.ring {
            Some(ring) if ring != RingType::Invalid => Ok(ring),
            _ => Err(UpgradeError::Configuration {
                reason: "invalid upgrade ring".to_string(),
            }),
        }
    }
}

impl ReleaseFeed for MockEnv {
    async fn fetch_all(&self) -> Result<Vec<Release>, UpgradeError> {
        self.record("fetch");
        if self.fail.contains(&FailPoint::Fetch) {
            return Err(UpgradeError::Network {
                operation: "fetch feed".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.releases.clone())
    }
}

impl ToolStaging for MockEnv {
    async fn ensure_staged(&self) -> Result<PathBuf, UpgradeError> {
        self.record("stage");
        if self.fail.contains(&FailPoint::Stage) {
            return Err(UpgradeError::Staging {
                reason: "unable to copy upgrader tools".to_string(),
            });
        }
        Ok(PathBuf::from("/tmp/ringup-tools/ringup"))
    }
}

impl AssetFetch for MockEnv {
    async fn download(&self, asset: &Asset, dest_dir: &Path) -> Result<Asset, UpgradeError> {
        let (call, fail_point) = match AssetRole::classify(&asset.name) {
            Some(AssetRole::Dependency) => ("download_dependency", FailPoint::DownloadDependency),
            Some(AssetRole::Product) => ("download_product", FailPoint::DownloadProduct),
            None => {
                return Err(UpgradeError::UnknownAsset {
                    name: asset.name.clone(),
                });
            }
        };
        self.record(call);

        if self.fail.contains(&fail_point) {
            return Err(UpgradeError::Download {
                name: asset.name.clone(),
                reason: "connection reset".to_string(),
            });
        }

        let mut downloaded = asset.clone();
        downloaded.local_path = Some(dest_dir.join(&asset.name));
        Ok(downloaded)
    }
}

impl InstallLaunch for MockEnv {
    async fn run(&self, installer: &Path, _args: &str) -> Result<InstallExit, UpgradeError> {
        let name = installer
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let (call, fail_point) = match AssetRole::classify(name) {
            Some(AssetRole::Dependency) => ("install_dependency", FailPoint::InstallDependency),
            Some(AssetRole::Product) => ("install_product", FailPoint::InstallProduct),
            None => {
                return Err(UpgradeError::Install {
                    installer: name.to_string(),
                    exit_code: -1,
                    message: "cannot launch unknown installer".to_string(),
                });
            }
        };
        self.record(call);

        if self.fail.contains(&fail_point) {
            // Installer failure surfaces as a non-zero exit code, not as a
            // launch error.
            return Ok(InstallExit {
                exit_code: 1,
                message: "installation failed".to_string(),
            });
        }
        Ok(InstallExit {
            exit_code: 0,
            message: String::new(),
        })
    }
}

fn orchestrator(env: MockEnv) -> UpgradeOrchestrator<MockEnv> {
    UpgradeOrchestrator::new(
        env,
        semver::Version::new(1, 0, 0),
        PathBuf::from("/tmp/ringup-downloads"),
    )
}

#[tokio::test]
async fn completed_attempt_runs_every_phase_in_order() {
    let env = MockEnv::new(Some(RingType::Fast)).with_remote_release("1.2.3", false);
    let orch = orchestrator(env);

    let attempt = orch.run().await;

    assert!(matches!(attempt.outcome, Outcome::Completed));
    assert_eq!(attempt.selected.as_ref().unwrap().tag, "v1.2.3");
    assert_eq!(attempt.downloaded.len(), 2);
    assert!(attempt.downloaded.iter().all(Asset::is_downloaded));
    assert_eq!(
        orch.env.calls(),
        vec![
            "resolve_ring",
            "fetch",
            "stage",
            "download_dependency",
            "download_product",
            "install_dependency",
            "install_product",
        ]
    );
}

#[tokio::test]
async fn slow_ring_sees_no_update_in_prerelease_only_feed() {
    let env = MockEnv::new(Some(RingType::Slow)).with_remote_release("2.0.0", true);
    let orch = orchestrator(env);

    let attempt = orch.run().await;

    assert!(matches!(attempt.outcome, Outcome::NoUpdateAvailable));
    assert!(attempt.selected.is_none());
    assert!(attempt.downloaded.is_empty());
    // No staging, no downloads, no installs: the attempt ended at selection.
    assert_eq!(orch.env.calls(), vec!["resolve_ring", "fetch"]);
}

#[tokio::test]
async fn fast_ring_admits_prerelease() {
    let env = MockEnv::new(Some(RingType::Fast)).with_remote_release("2.0.0", true);
    let attempt = orchestrator(env).run().await;
    assert!(matches!(attempt.outcome, Outcome::Completed));
}

#[tokio::test]
async fn missing_ring_fails_during_ring_resolution() {
    let env = MockEnv::new(None).with_remote_release("1.2.3", false);
    let orch = orchestrator(env);

    let attempt = orch.run().await;

    match attempt.outcome {
        Outcome::Failed { phase, error } => {
            assert_eq!(phase, Phase::ResolvingRing);
            assert!(matches!(error, UpgradeError::Configuration { .. }));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(orch.env.calls(), vec!["resolve_ring"]);
}

#[tokio::test]
async fn feed_failure_fails_the_whole_attempt() {
    let env = MockEnv::new(Some(RingType::Fast))
        .with_remote_release("1.2.3", false)
        .fail_on(FailPoint::Fetch);
    let attempt = orchestrator(env).run().await;

    match attempt.outcome {
        Outcome::Failed { phase, error } => {
            assert_eq!(phase, Phase::Fetching);
            assert!(matches!(error, UpgradeError::Network { .. }));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn staging_failure_aborts_before_any_download() {
    let env = MockEnv::new(Some(RingType::Fast))
        .with_remote_release("1.2.3", false)
        .fail_on(FailPoint::Stage);
    let orch = orchestrator(env);

    let attempt = orch.run().await;

    match attempt.outcome {
        Outcome::Failed { phase, error } => {
            assert_eq!(phase, Phase::Staging);
            assert!(matches!(error, UpgradeError::Staging { .. }));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(attempt.downloaded.is_empty());
    assert_eq!(orch.env.calls(), vec!["resolve_ring", "fetch", "stage"]);
}

#[tokio::test]
async fn dependency_download_failure_stops_everything_downstream() {
    let env = MockEnv::new(Some(RingType::Fast))
        .with_remote_release("1.2.3", false)
        .fail_on(FailPoint::DownloadDependency);
    let orch = orchestrator(env);

    let attempt = orch.run().await;

    match attempt.outcome {
        Outcome::Failed { phase, error } => {
            assert_eq!(phase, Phase::DownloadingDependency);
            assert!(matches!(error, UpgradeError::Download { .. }));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(attempt.downloaded.is_empty());
    let calls = orch.env.calls();
    assert!(!calls.contains(&"download_product"));
    assert!(!calls.contains(&"install_dependency"));
    assert!(!calls.contains(&"install_product"));
}

#[tokio::test]
async fn product_download_failure_never_reaches_install() {
    let env = MockEnv::new(Some(RingType::Fast))
        .with_remote_release("1.2.3", false)
        .fail_on(FailPoint::DownloadProduct);
    let orch = orchestrator(env);

    let attempt = orch.run().await;

    match attempt.outcome {
        Outcome::Failed { phase, .. } => assert_eq!(phase, Phase::DownloadingProduct),
        other => panic!("expected failure, got {other:?}"),
    }
    // The dependency asset had already been materialized.
    assert_eq!(attempt.downloaded.len(), 1);
    assert!(!orch.env.calls().contains(&"install_dependency"));
}

#[tokio::test]
async fn nonzero_dependency_install_blocks_product_install() {
    let env = MockEnv::new(Some(RingType::Fast))
        .with_remote_release("1.2.3", false)
        .fail_on(FailPoint::InstallDependency);
    let orch = orchestrator(env);

    let attempt = orch.run().await;

    match attempt.outcome {
        Outcome::Failed { phase, error } => {
            assert_eq!(phase, Phase::InstallingDependency);
            match error {
                UpgradeError::Install { exit_code, .. } => assert_eq!(exit_code, 1),
                other => panic!("expected install error, got {other:?}"),
            }
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!orch.env.calls().contains(&"install_product"));
}

#[tokio::test]
async fn product_install_failure_reports_final_phase() {
    let env = MockEnv::new(Some(RingType::Fast))
        .with_remote_release("1.2.3", false)
        .fail_on(FailPoint::InstallProduct);
    let orch = orchestrator(env);

    let attempt = orch.run().await;

    match attempt.outcome {
        Outcome::Failed { phase, error } => {
            assert_eq!(phase, Phase::InstallingProduct);
            assert!(matches!(error, UpgradeError::Install { exit_code: 1, .. }));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    // Everything up to and including the dependency install ran.
    assert_eq!(
        orch.env.calls(),
        vec![
            "resolve_ring",
            "fetch",
            "stage",
            "download_dependency",
            "download_product",
            "install_dependency",
            "install_product",
        ]
    );
}

#[tokio::test]
async fn release_missing_an_installer_fails_at_download() {
    let mut env = MockEnv::new(Some(RingType::Fast)).with_remote_release("1.2.3", false);
    // Strip the dependency installer from the published release.
    env.releases[0]
        .assets
        .retain(|a| AssetRole::classify(&a.name) != Some(AssetRole::Dependency));
    let attempt = orchestrator(env).run().await;

    match attempt.outcome {
        Outcome::Failed { phase, error } => {
            assert_eq!(phase, Phase::DownloadingDependency);
            assert!(matches!(error, UpgradeError::UnknownAsset { .. }));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_is_idempotent_with_an_unchanged_remote() {
    let env = MockEnv::new(Some(RingType::Fast)).with_remote_release("1.2.3", false);
    let first = env.fetch_all().await.unwrap();
    let second = env.fetch_all().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn selector_never_offers_current_version() {
    let env = MockEnv::new(Some(RingType::Fast)).with_remote_release("1.0.0", false);
    let attempt = orchestrator(env).run().await;
    assert!(matches!(attempt.outcome, Outcome::NoUpdateAvailable));
}
