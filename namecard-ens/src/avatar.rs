//! Avatar record classification and resolution.

use std::sync::Arc;

use tracing::{debug, instrument};

use namecard_core::constants::{
    ERC1155_PREFIX, ERC721_PREFIX, HTTPS_PREFIX, HTTP_PREFIX, IPFS_PREFIX,
};
use namecard_core::traits::{ChainClient, ContentFetcher};
use namecard_core::types::{AvatarReference, TokenRef};
use namecard_ipfs::{parse_ipfs_uri, IpfsGateway};

use crate::metadata::TokenMetadataFetcher;

/// Classifies an avatar record value by its prefix.
///
/// Prefixes are checked in order HTTP, HTTPS, ERC-721, ERC-1155, IPFS. A
/// token prefix followed by a malformed reference is `Unrecognized`.
pub fn classify(value: &str) -> AvatarReference {
    if value.starts_with(HTTP_PREFIX) || value.starts_with(HTTPS_PREFIX) {
        AvatarReference::Http(value.to_string())
    } else if value.starts_with(ERC721_PREFIX) || value.starts_with(ERC1155_PREFIX) {
        TokenRef::parse(value)
            .map(AvatarReference::Token)
            .unwrap_or(AvatarReference::Unrecognized)
    } else if value.starts_with(IPFS_PREFIX) {
        AvatarReference::Ipfs(parse_ipfs_uri(value))
    } else {
        AvatarReference::Unrecognized
    }
}

/// Turns raw avatar record values into HTTP(S) image URLs.
#[derive(Clone)]
pub struct AvatarResolver {
    gateway: IpfsGateway,
    metadata: TokenMetadataFetcher,
}

impl AvatarResolver {
    /// Creates an avatar resolver.
    pub fn new(
        chain: Arc<dyn ChainClient>,
        fetcher: Arc<dyn ContentFetcher>,
        gateway: IpfsGateway,
    ) -> Self {
        Self {
            metadata: TokenMetadataFetcher::new(chain, fetcher, gateway.clone()),
            gateway,
        }
    }

    /// Resolves a raw avatar value.
    ///
    /// The result is `None` or starts with `http://` / `https://`.
    #[instrument(skip(self))]
    pub async fn resolve(&self, raw: &str) -> Option<String> {
        match classify(raw) {
            AvatarReference::Http(url) => Some(url),
            AvatarReference::Ipfs(path) => Some(self.gateway.http_url(&path)),
            AvatarReference::Token(token) => self.metadata.fetch_avatar(&token).await,
            AvatarReference::Unrecognized => {
                debug!("Unrecognized avatar scheme");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockChain, MockFetcher};
    use namecard_core::types::{IpfsPath, TokenStandard};
    use proptest::prelude::*;

    fn resolver(chain: MockChain, http: MockFetcher) -> AvatarResolver {
        AvatarResolver::new(Arc::new(chain), Arc::new(http), IpfsGateway::new("ipfs.io"))
    }

    #[test]
    fn test_classify_variants() {
        assert_eq!(
            classify("https://example.com/a.png"),
            AvatarReference::Http("https://example.com/a.png".into())
        );
        assert_eq!(
            classify("http://example.com/a.png"),
            AvatarReference::Http("http://example.com/a.png".into())
        );
        assert_eq!(
            classify("ipfs://ipfs/abc123/foo/bar"),
            AvatarReference::Ipfs(IpfsPath::new("abc123", "/foo/bar"))
        );
        assert_eq!(
            classify("eip155:1/erc721:0xABC/7"),
            AvatarReference::Token(TokenRef {
                standard: TokenStandard::Erc721,
                contract_address: "0xABC".into(),
                token_id: "7".into(),
            })
        );
        assert!(matches!(
            classify("eip155:1/erc1155:0xABC/7"),
            AvatarReference::Token(TokenRef { standard: TokenStandard::Erc1155, .. })
        ));
    }

    #[test]
    fn test_classify_unrecognized() {
        assert!(classify("").is_unrecognized());
        assert!(classify("HTTPS://EXAMPLE.COM").is_unrecognized());
        assert!(classify("data:image/png;base64,AAAA").is_unrecognized());
        assert!(classify("eip155:137/erc721:0xABC/7").is_unrecognized());
        assert!(classify("eip155:1/erc721:onlyonepart").is_unrecognized());
    }

    proptest! {
        #[test]
        fn prop_unknown_prefixes_are_unrecognized(value in "[a-zA-Z0-9:/._-]{0,40}") {
            prop_assume!(!value.starts_with("http://"));
            prop_assume!(!value.starts_with("https://"));
            prop_assume!(!value.starts_with("ipfs://"));
            prop_assume!(!value.starts_with("eip155:1/erc721:"));
            prop_assume!(!value.starts_with("eip155:1/erc1155:"));
            prop_assert!(classify(&value).is_unrecognized());
        }

        #[test]
        fn prop_http_urls_pass_through(path in "[a-z0-9/._-]{0,30}") {
            let url = format!("https://example.com/{}", path);
            prop_assert_eq!(classify(&url), AvatarReference::Http(url.clone()));
        }
    }

    #[tokio::test]
    async fn test_resolve_http_is_identity() {
        let resolver = resolver(MockChain::default(), MockFetcher::default());
        let url = "https://euc.li/alice.eth?size=large";
        assert_eq!(resolver.resolve(url).await.as_deref(), Some(url));
    }

    #[tokio::test]
    async fn test_resolve_ipfs() {
        let resolver = resolver(MockChain::default(), MockFetcher::default());
        assert_eq!(
            resolver.resolve("ipfs://QmAvatar").await.as_deref(),
            Some("https://ipfs.io/ipfs/QmAvatar")
        );
    }

    #[tokio::test]
    async fn test_resolve_unrecognized_makes_no_calls() {
        let chain = Arc::new(MockChain::default());
        let http = Arc::new(MockFetcher::default());
        let resolver = AvatarResolver::new(chain.clone(), http.clone(), IpfsGateway::default());

        assert!(resolver.resolve("ar://some-arweave-tx").await.is_none());
        assert!(chain.calls().is_empty());
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_token() {
        let chain = MockChain::default()
            .view("0xABC", "tokenURI", "7", Some("https://meta.example/7.json"));
        let http = MockFetcher::default()
            .body("https://meta.example/7.json", r#"{"image":"https://img.example/7.png"}"#);
        let resolver = resolver(chain, http);

        assert_eq!(
            resolver.resolve("eip155:1/erc721:0xABC/7").await.as_deref(),
            Some("https://img.example/7.png")
        );
    }
}
