//! Asset download: materializing installer bytes to local storage.
//!
//! Only assets whose names match the expected installer roles are ever
//! written to disk; anything else is rejected up front. Bytes are streamed
//! into a `.part` file that is renamed into place on success, so a failed
//! or interrupted download never leaves a partial file behind a usable
//! `local_path`.

use std::path::Path;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::constants::USER_AGENT;
use crate::core::UpgradeError;
use crate::release::{Asset, AssetRole};

/// Capability to materialize a release asset to local storage.
pub trait AssetFetch {
    /// Download `asset` into `dest_dir`, returning a copy with
    /// `local_path` set.
    ///
    /// Fails with [`UpgradeError::UnknownAsset`] for unrecognized asset
    /// names (nothing is written) and [`UpgradeError::Download`] on
    /// transport or write failure.
    fn download(
        &self,
        asset: &Asset,
        dest_dir: &Path,
    ) -> impl std::future::Future<Output = Result<Asset, UpgradeError>>;
}

/// Production downloader streaming assets over HTTP.
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self, UpgradeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| UpgradeError::Network {
                operation: "client setup".to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self { client })
    }

    async fn stream_to_file(&self, asset: &Asset, path: &Path) -> Result<(), UpgradeError> {
        let download_err = |reason: String| UpgradeError::Download {
            name: asset.name.clone(),
            reason,
        };

        let response = self
            .client
            .get(&asset.download_url)
            .send()
            .await
            .map_err(|err| download_err(err.to_string()))?;

        if !response.status().is_success() {
            return Err(download_err(format!(
                "server returned {}",
                response.status()
            )));
        }

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|err| download_err(format!("cannot create '{}': {err}", path.display())))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| download_err(err.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|err| download_err(format!("write failed: {err}")))?;
        }
        file.flush()
            .await
            .map_err(|err| download_err(format!("flush failed: {err}")))?;

        Ok(())
    }
}

impl AssetFetch for HttpDownloader {
    async fn download(&self, asset: &Asset, dest_dir: &Path) -> Result<Asset, UpgradeError> {
        validate_name(&asset.name)?;

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|err| UpgradeError::Download {
                name: asset.name.clone(),
                reason: format!("cannot create '{}': {err}", dest_dir.display()),
            })?;

        let final_path = dest_dir.join(&asset.name);
        let part_path = dest_dir.join(format!("{}.part", asset.name));

        debug!(url = %asset.download_url, dest = %final_path.display(), "downloading asset");

        if let Err(err) = self.stream_to_file(asset, &part_path).await {
            // Leave nothing behind that a later attempt could mistake for
            // a complete installer.
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(err);
        }

        tokio::fs::rename(&part_path, &final_path)
            .await
            .map_err(|err| UpgradeError::Download {
                name: asset.name.clone(),
                reason: format!("cannot finalize '{}': {err}", final_path.display()),
            })?;

        info!(asset = %asset.name, "asset downloaded");

        let mut downloaded = asset.clone();
        downloaded.local_path = Some(final_path);
        Ok(downloaded)
    }
}

/// Reject asset names that are not recognized installers, or that would
/// escape the destination directory.
fn validate_name(name: &str) -> Result<(), UpgradeError> {
    let escapes_dir =
        name.contains('/') || name.contains('\\') || name.contains("..") || name.is_empty();
    if escapes_dir || AssetRole::classify(name).is_none() {
        return Err(UpgradeError::UnknownAsset {
            name: name.to_string(),
        });
    }
    Ok(())
}
