//! Token metadata fetching for ERC-721 / ERC-1155 avatars.
//!
//! Flow for a token avatar:
//! 1. Call the standard's metadata getter (`tokenURI` or `uri`)
//! 2. Fill in the `{id}` placeholder of ERC-1155 URIs
//! 3. Fetch the metadata JSON over HTTP(S) or through the IPFS gateway
//! 4. Normalize its `image` field to an HTTP(S) URL
//!
//! Every failure ends as `None`; nothing crosses this boundary as an error.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use namecard_core::constants::{
    HTTPS_PREFIX, HTTP_PREFIX, IPFS_PREFIX, METADATA_IMAGE_FIELD, TOKEN_ID_PLACEHOLDER,
    TOKEN_ID_PLACEHOLDER_HEX,
};
use namecard_core::error::{NamecardError, Result};
use namecard_core::traits::{ChainClient, ContentFetcher};
use namecard_core::types::TokenRef;
use namecard_ipfs::{parse_ipfs_uri, IpfsGateway};

/// Resolves a token reference into the HTTP(S) URL of its image.
#[derive(Clone)]
pub struct TokenMetadataFetcher {
    chain: Arc<dyn ChainClient>,
    fetcher: Arc<dyn ContentFetcher>,
    gateway: IpfsGateway,
}

impl TokenMetadataFetcher {
    /// Creates a metadata fetcher.
    pub fn new(
        chain: Arc<dyn ChainClient>,
        fetcher: Arc<dyn ContentFetcher>,
        gateway: IpfsGateway,
    ) -> Self {
        Self {
            chain,
            fetcher,
            gateway,
        }
    }

    /// Returns the token's image URL, or `None` on any failure.
    #[instrument(skip(self), fields(standard = %token.standard))]
    pub async fn fetch_avatar(&self, token: &TokenRef) -> Option<String> {
        match self.try_fetch_avatar(token).await {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    contract = %token.contract_address,
                    token_id = %token.token_id,
                    error = %e,
                    "Token avatar resolution failed"
                );
                None
            }
        }
    }

    async fn try_fetch_avatar(&self, token: &TokenRef) -> Result<Option<String>> {
        let function = token.standard.view_function();

        let token_uri = self
            .chain
            .call_view_function(
                &token.contract_address,
                &function,
                std::slice::from_ref(&token.token_id),
            )
            .await?;

        let Some(token_uri) = token_uri else {
            debug!(function = function.name, "Contract returned no token URI");
            return Ok(None);
        };

        let resolved_uri = substitute_token_id(&token_uri, &token.token_id);
        debug!(token_uri = %resolved_uri, "Resolved token URI");

        let Some(metadata) = self.fetch_metadata(&resolved_uri).await? else {
            return Ok(None);
        };

        let Some(image) = metadata.get(METADATA_IMAGE_FIELD).and_then(|v| v.as_str()) else {
            debug!(token_uri = %resolved_uri, "Metadata has no image field");
            return Ok(None);
        };

        Ok(self.normalize_image(image))
    }

    /// Fetches and parses a metadata document.
    ///
    /// Returns `Ok(None)` for URIs that are neither HTTP(S) nor IPFS.
    async fn fetch_metadata(&self, uri: &str) -> Result<Option<serde_json::Value>> {
        let url = if uri.starts_with(HTTP_PREFIX) || uri.starts_with(HTTPS_PREFIX) {
            uri.to_string()
        } else if uri.starts_with(IPFS_PREFIX) {
            self.gateway.http_url(&parse_ipfs_uri(uri))
        } else {
            debug!(uri, "Unsupported metadata URI scheme");
            return Ok(None);
        };

        let body = self.fetcher.fetch(&url).await?;

        let metadata: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| NamecardError::MetadataParse {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Some(metadata))
    }

    /// Normalizes an image field. Images are never token references.
    fn normalize_image(&self, image: &str) -> Option<String> {
        if image.starts_with(HTTP_PREFIX) || image.starts_with(HTTPS_PREFIX) {
            Some(image.to_string())
        } else if image.starts_with(IPFS_PREFIX) {
            Some(self.gateway.http_url(&parse_ipfs_uri(image)))
        } else {
            debug!(image, "Unsupported image URI scheme");
            None
        }
    }
}

/// Replaces the first `0x{id}` (or else the first `{id}`) with the token id.
pub fn substitute_token_id(uri: &str, token_id: &str) -> String {
    if uri.contains(TOKEN_ID_PLACEHOLDER_HEX) {
        uri.replacen(TOKEN_ID_PLACEHOLDER_HEX, token_id, 1)
    } else if uri.contains(TOKEN_ID_PLACEHOLDER) {
        uri.replacen(TOKEN_ID_PLACEHOLDER, token_id, 1)
    } else {
        uri.to_string()
    }
}
