//! IPFS URI parsing and gateway rewriting.
//!
//! Gateway URLs use the path form `https://<host>/ipfs/<cid><path>`, which
//! keeps case-sensitive CIDv0 identifiers out of the hostname.

use serde::{Deserialize, Serialize};

use namecard_core::constants::{
    DEFAULT_IPFS_GATEWAY_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS,
    IPFS_PATH_SEGMENT, IPFS_PREFIX,
};
use namecard_core::types::IpfsPath;

/// IPFS gateway configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IpfsConfig {
    /// Gateway host for path-style URLs (e.g. "ipfs.io")
    pub gateway_host: String,
    /// Request timeout in seconds for gateway and metadata fetches
    pub timeout_seconds: u64,
    /// Maximum response body size in bytes
    pub max_body_bytes: usize,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            gateway_host: DEFAULT_IPFS_GATEWAY_HOST.into(),
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl IpfsConfig {
    /// Creates a config for the given gateway host.
    pub fn new(gateway_host: impl Into<String>) -> Self {
        Self {
            gateway_host: gateway_host.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Sets the response body size limit.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Rewrites IPFS content addresses into HTTP gateway URLs.
#[derive(Clone, Debug)]
pub struct IpfsGateway {
    host: String,
}

impl IpfsGateway {
    /// Creates a gateway for the given host.
    ///
    /// Any scheme or trailing slash on `host` is dropped.
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let host = host
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();
        Self { host }
    }

    /// Creates a gateway from configuration.
    pub fn from_config(config: &IpfsConfig) -> Self {
        Self::new(config.gateway_host.clone())
    }

    /// Gateway host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// HTTP URL for a parsed content path.
    pub fn http_url(&self, path: &IpfsPath) -> String {
        format!("https://{}/ipfs/{}{}", self.host, path.cid, path.path)
    }

    /// HTTP URL for a raw `ipfs://` URI.
    pub fn rewrite(&self, uri: &str) -> String {
        self.http_url(&parse_ipfs_uri(uri))
    }
}

impl Default for IpfsGateway {
    fn default() -> Self {
        Self::new(DEFAULT_IPFS_GATEWAY_HOST)
    }
}

/// Splits an `ipfs://` URI into content id and sub-path.
///
/// One redundant `ipfs/` segment after the scheme is skipped. The path keeps
/// its leading `/` and is empty when there is none. Never fails.
pub fn parse_ipfs_uri(uri: &str) -> IpfsPath {
    let rest = uri.strip_prefix(IPFS_PREFIX).unwrap_or(uri);
    let rest = rest.strip_prefix(IPFS_PATH_SEGMENT).unwrap_or(rest);

    match rest.find('/') {
        Some(idx) => IpfsPath::new(&rest[..idx], &rest[idx..]),
        None => IpfsPath::new(rest, ""),
    }
}
