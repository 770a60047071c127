//! Release feed retrieval.
//!
//! [`ReleaseFeed`] is the capability the orchestrator depends on;
//! [`HttpReleaseFeed`] is the production implementation, performing a single
//! request against the distribution point and deserializing the response.
//! There is no retry here: retry policy belongs to the caller.

use serde::de::DeserializeOwned;
use tracing::debug;

use super::Release;
use crate::constants::{FEED_REQUEST_TIMEOUT, USER_AGENT};
use crate::core::UpgradeError;

/// Capability to retrieve the current set of available releases.
pub trait ReleaseFeed {
    /// Fetch all releases from the distribution point.
    ///
    /// Fails with [`UpgradeError::Network`] on transport failure, timeout,
    /// or a malformed response body.
    fn fetch_all(&self)
    -> impl std::future::Future<Output = Result<Vec<Release>, UpgradeError>>;
}

/// Production release feed backed by an HTTP endpoint.
pub struct HttpReleaseFeed {
    client: reqwest::Client,
    feed_url: String,
}

impl HttpReleaseFeed {
    /// Build a feed client for the given endpoint URL.
    pub fn new(feed_url: impl Into<String>) -> Result<Self, UpgradeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FEED_REQUEST_TIMEOUT)
            .build()
            .map_err(|err| UpgradeError::Network {
                operation: "client setup".to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            client,
            feed_url: feed_url.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, UpgradeError> {
        let network_err = |reason: String| UpgradeError::Network {
            operation: format!("fetch {url}"),
            reason,
        };

        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|err| network_err(err.to_string()))?;

        if !response.status().is_success() {
            return Err(network_err(format!(
                "server returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|err| network_err(format!("malformed response body: {err}")))
    }
}

impl ReleaseFeed for HttpReleaseFeed {
    async fn fetch_all(&self) -> Result<Vec<Release>, UpgradeError> {
        debug!(url = %self.feed_url, "fetching release feed");
        let releases: Vec<Release> = self.get_json(&self.feed_url).await?;
        debug!(count = releases.len(), "release feed fetched");
        Ok(releases)
    }
}
