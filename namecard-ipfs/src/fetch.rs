//! HTTP content fetcher.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use url::Url;

use namecard_core::constants::DEFAULT_MAX_BODY_BYTES;
use namecard_core::error::{NamecardError, Result};
use namecard_core::traits::ContentFetcher;

use crate::ipfs::IpfsConfig;

/// Downloads metadata documents over HTTP(S) with a shared reqwest client.
///
/// Bodies larger than `max_body_bytes` are rejected without being buffered.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    http_client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Creates a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                NamecardError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Creates a fetcher using the IPFS configuration timeout and body limit.
    pub fn with_config(config: &IpfsConfig) -> Result<Self> {
        Ok(Self::new(Duration::from_secs(config.timeout_seconds))?
            .with_max_body_bytes(config.max_body_bytes))
    }

    /// Sets the response body size limit.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    fn too_large(&self, url: &str) -> NamecardError {
        warn!(url, limit = self.max_body_bytes, "Response body over limit");
        NamecardError::Fetch {
            url: url.to_string(),
            reason: format!("Response body exceeds {} bytes", self.max_body_bytes),
        }
    }

    fn validate_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|e| NamecardError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(NamecardError::Fetch {
                url: url.to_string(),
                reason: format!("Unsupported scheme: {}", scheme),
            }),
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = Self::validate_url(url)?;

        let mut response = self
            .http_client
            .get(parsed)
            .send()
            .await
            .map_err(|e| NamecardError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(NamecardError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                return Err(self.too_large(url));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| NamecardError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url, bytes = body.len(), "Fetched content");
        Ok(body)
    }
}
