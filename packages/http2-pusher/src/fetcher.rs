//! HTTP fetcher for external resources.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{PushError, Result};
use crate::traits::BaseAssetFetcher;

/// Fetches external resources with reqwest.
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl Default for HttpAssetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpAssetFetcher {
    pub fn new() -> Self {
        Self::with_client(
            reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        )
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseAssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = %url, "Fetching external resource");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "External resource request failed");
            PushError::unavailable(url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PushError::unavailable(url, format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PushError::unavailable(url, e))?;

        Ok(bytes.to_vec())
    }
}
