//! ENS identity provider.
//!
//! Resolves an address by:
//! 1. Reverse-resolving it to its primary domain
//! 2. Looking up the domain's resolver (only when text records are requested)
//! 3. Reading every requested text record concurrently
//! 4. Normalizing the `avatar` record into an HTTP(S) URL

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use namecard_core::constants::{
    AVATAR_KEY, DEFAULT_ETH_RPC_URL, DEFAULT_REQUEST_TIMEOUT_SECS, ENS_REGISTRY_ADDRESS,
};
use namecard_core::error::{NamecardError, Result};
use namecard_core::traits::{ChainClient, ContentFetcher, ProviderClient};
use namecard_core::types::{AddressQuery, IdentityRecord, Network, ProviderType};
use namecard_ipfs::{HttpFetcher, IpfsConfig, IpfsGateway};

use crate::avatar::AvatarResolver;
use crate::rpc::EnsRpcClient;

/// ENS client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnsConfig {
    /// Ethereum RPC URL, used when no credential is set
    pub rpc_url: String,
    /// Network for credential-based endpoints
    pub network: Network,
    /// Infura project id
    pub credential_id: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// ENS registry contract address
    pub registry_address: String,
}

impl Default for EnsConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_ETH_RPC_URL.into(),
            network: Network::Mainnet,
            credential_id: None,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            registry_address: ENS_REGISTRY_ADDRESS.into(),
        }
    }
}

impl EnsConfig {
    /// Creates a new configuration with the given RPC URL.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }

    /// Sets the network.
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Sets the Infura project id.
    pub fn with_credential(mut self, credential_id: impl Into<String>) -> Self {
        self.credential_id = Some(credential_id.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// RPC endpoint to use: Infura when a credential is set, else `rpc_url`.
    pub fn endpoint(&self) -> String {
        match self.credential_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => self.network.infura_url(id),
            _ => self.rpc_url.clone(),
        }
    }
}

/// ENS implementation of [`ProviderClient`].
pub struct EnsProvider {
    chain: Arc<dyn ChainClient>,
    avatar: AvatarResolver,
}

impl EnsProvider {
    /// Creates a provider from explicit collaborators.
    pub fn new(
        chain: Arc<dyn ChainClient>,
        fetcher: Arc<dyn ContentFetcher>,
        gateway: IpfsGateway,
    ) -> Self {
        Self {
            avatar: AvatarResolver::new(chain.clone(), fetcher, gateway),
            chain,
        }
    }

    /// Creates a provider backed by JSON-RPC and HTTP.
    pub fn with_config(ens: EnsConfig, ipfs: IpfsConfig) -> Result<Self> {
        let chain = EnsRpcClient::with_config(&ens)?;
        let fetcher = HttpFetcher::with_config(&ipfs)?;

        debug!(network = %ens.network, rpc_url = chain.rpc_url(), "Created ENS provider");

        Ok(Self::new(
            Arc::new(chain),
            Arc::new(fetcher),
            IpfsGateway::from_config(&ipfs),
        ))
    }
}

#[async_trait]
impl ProviderClient for EnsProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Ens
    }

    #[instrument(skip(self, query), fields(address = %query.address))]
    async fn resolve_identity(&self, query: &AddressQuery) -> Result<Option<IdentityRecord>> {
        let Some(domain) = self.chain.lookup_domain(&query.address).await? else {
            debug!("No primary domain");
            return Ok(None);
        };

        let mut record = IdentityRecord::new(domain);

        if !query.wants_text_records() {
            return Ok(Some(record));
        }

        let resolver = self
            .chain
            .get_resolver(&record.domain)
            .await?
            .ok_or_else(|| NamecardError::MissingResolver {
                domain: record.domain.clone(),
            })?;

        let fields = query.unique_fields();
        let values =
            try_join_all(fields.iter().map(|key| self.chain.get_text(&resolver, key))).await?;

        let mut text_records: BTreeMap<String, Option<String>> = fields
            .into_iter()
            .map(str::to_string)
            .zip(values)
            .collect();

        if let Some(slot) = text_records.get_mut(AVATAR_KEY) {
            if let Some(raw) = slot.take() {
                *slot = self.avatar.resolve(&raw).await;
            }
        }

        record.text_records = text_records;

        info!(domain = %record.domain, records = record.text_records.len(), "Resolved identity");
        Ok(Some(record))
    }

    async fn domain_for_address(&self, address: &str) -> Result<Option<String>> {
        self.chain.lookup_domain(address).await
    }

    async fn resolve_avatar(&self, raw: &str) -> Option<String> {
        self.avatar.resolve(raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockChain, MockFetcher};
    use std::time::Duration;

    const ALICE: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn provider(
        chain: MockChain,
        http: MockFetcher,
    ) -> (EnsProvider, Arc<MockChain>, Arc<MockFetcher>) {
        let chain = Arc::new(chain);
        let http = Arc::new(http);
        let provider = EnsProvider::new(chain.clone(), http.clone(), IpfsGateway::new("ipfs.io"));
        (provider, chain, http)
    }

    #[test]
    fn test_config_endpoint() {
        let config = EnsConfig::default();
        assert_eq!(config.endpoint(), DEFAULT_ETH_RPC_URL);

        let config = EnsConfig::new("http://localhost:8545")
            .with_network(Network::Sepolia)
            .with_credential("abc");
        assert_eq!(config.endpoint(), "https://sepolia.infura.io/v3/abc");

        let config = EnsConfig::new("http://localhost:8545").with_credential("  ");
        assert_eq!(config.endpoint(), "http://localhost:8545");
    }

    #[test]
    fn test_with_config_rejects_bad_registry() {
        let mut config = EnsConfig::default();
        config.registry_address = "registry".into();

        let err = EnsProvider::with_config(config, IpfsConfig::default()).err().unwrap();
        assert!(matches!(err, NamecardError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_resolve_full_identity() {
        let chain = MockChain::with_domain("alice.eth")
            .text("avatar", Some("eip155:1/erc721:0xABC/7"))
            .text("com.twitter", Some("alice"))
            .view("0xABC", "tokenURI", "7", Some("https://meta.example/7.json"));
        let http = MockFetcher::default()
            .body("https://meta.example/7.json", r#"{"image":"ipfs://Qm123/img.png"}"#);
        let (provider, _, _) = provider(chain, http);

        let query = AddressQuery::new(ALICE).with_fields(["avatar", "com.twitter"]);
        let record = provider.resolve_identity(&query).await.unwrap().unwrap();

        assert_eq!(record.domain, "alice.eth");
        assert_eq!(record.avatar(), Some("https://ipfs.io/ipfs/Qm123/img.png"));
        assert_eq!(record.get("com.twitter"), Some("alice"));
    }

    #[tokio::test]
    async fn test_no_domain_stops_early() {
        let (provider, chain, _) = provider(MockChain::default(), MockFetcher::default());

        let query = AddressQuery::new(ALICE).with_fields(["avatar"]);
        assert!(provider.resolve_identity(&query).await.unwrap().is_none());
        assert_eq!(chain.calls(), vec![format!("lookup_domain:{}", ALICE)]);
    }

    #[tokio::test]
    async fn test_domain_only_skips_resolver() {
        let (provider, chain, _) =
            provider(MockChain::with_domain("bob.eth"), MockFetcher::default());

        let record = provider.resolve_identity(&AddressQuery::new(ALICE)).await.unwrap().unwrap();
        assert_eq!(record, IdentityRecord::new("bob.eth"));
        assert_eq!(chain.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_field_list_still_needs_resolver() {
        let mut chain = MockChain::with_domain("bob.eth");
        chain.resolver = None;
        let (provider, _, _) = provider(chain, MockFetcher::default());

        let query = AddressQuery::new(ALICE).with_fields(Vec::<String>::new());
        let err = provider.resolve_identity(&query).await.unwrap_err();
        assert_eq!(err.to_string(), "Error finding resolver for bob.eth.");
    }

    #[tokio::test]
    async fn test_resolver_failure_skips_text_records() {
        let mut chain = MockChain::with_domain("bob.eth").text("url", Some("https://bob.example"));
        chain.resolver_error = true;
        let (provider, chain, http) = provider(chain, MockFetcher::default());

        let query = AddressQuery::new(ALICE).with_fields(["url", "avatar"]);
        let err = provider.resolve_identity(&query).await.unwrap_err();

        assert!(matches!(err, NamecardError::ChainQuery(_)));
        assert!(!chain.calls().iter().any(|c| c.starts_with("get_text:")));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unset_records_are_null() {
        let chain = MockChain::with_domain("carol.eth").text("url", Some("https://carol.example"));
        let (provider, _, http) = provider(chain, MockFetcher::default());

        let query = AddressQuery::new(ALICE).with_fields(["url", "avatar", "email"]);
        let record = provider.resolve_identity(&query).await.unwrap().unwrap();

        assert_eq!(record.text_records.len(), 3);
        assert_eq!(record.get("url"), Some("https://carol.example"));
        assert_eq!(record.text_records.get("avatar"), Some(&None));
        assert_eq!(record.text_records.get("email"), Some(&None));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_fields_fetched_once() {
        let chain = MockChain::with_domain("dave.eth").text("url", Some("https://dave.example"));
        let (provider, chain, _) = provider(chain, MockFetcher::default());

        let query = AddressQuery::new(ALICE).with_fields(["url", "url"]);
        let record = provider.resolve_identity(&query).await.unwrap().unwrap();

        assert_eq!(record.text_records.len(), 1);
        let text_calls = chain.calls().iter().filter(|c| c.starts_with("get_text:")).count();
        assert_eq!(text_calls, 1);
    }

    #[tokio::test]
    async fn test_slow_record_keeps_its_key() {
        let chain = MockChain::with_domain("zed.eth")
            .slow_text("com.twitter", Some("zed_tw"), Duration::from_millis(80))
            .slow_text("email", Some("zed@example.com"), Duration::from_millis(20))
            .text("url", Some("https://zed.example"));
        let (provider, chain, _) = provider(chain, MockFetcher::default());

        let query = AddressQuery::new(ALICE).with_fields(["com.twitter", "email", "url"]);
        let record = provider.resolve_identity(&query).await.unwrap().unwrap();

        assert_eq!(record.get("com.twitter"), Some("zed_tw"));
        assert_eq!(record.get("email"), Some("zed@example.com"));
        assert_eq!(record.get("url"), Some("https://zed.example"));
        assert_eq!(record.text_records.len(), 3);

        let text_calls: Vec<String> = chain
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("get_text:"))
            .collect();
        assert_eq!(text_calls.len(), 3);
    }

    #[tokio::test]
    async fn test_text_failure_fails_resolution() {
        let chain = MockChain::with_domain("erin.eth")
            .text("avatar", Some("https://img.example/a.png"))
            .failing_text("com.github");
        let (provider, _, _) = provider(chain, MockFetcher::default());

        let query = AddressQuery::new(ALICE).with_fields(["avatar", "com.github"]);
        let err = provider.resolve_identity(&query).await.unwrap_err();
        assert!(matches!(err, NamecardError::ChainQuery(_)));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut chain = MockChain::default();
        chain.domain_error = true;
        let (provider, _, _) = provider(chain, MockFetcher::default());

        let err = provider.resolve_identity(&AddressQuery::new(ALICE)).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_avatar_failure_degrades_to_null() {
        let chain = MockChain::with_domain("frank.eth")
            .text("avatar", Some("eip155:1/erc1155:0xfaff/3"))
            .text("url", Some("https://frank.example"))
            .failing_view("0xfaff", "uri", "3");
        let (provider, _, _) = provider(chain, MockFetcher::default());

        let query = AddressQuery::new(ALICE).with_fields(["avatar", "url"]);
        let record = provider.resolve_identity(&query).await.unwrap().unwrap();

        assert_eq!(record.text_records.get("avatar"), Some(&None));
        assert_eq!(record.get("url"), Some("https://frank.example"));
    }

    #[tokio::test]
    async fn test_resolve_avatar_and_domain_helpers() {
        let (provider, _, _) = provider(MockChain::with_domain("gus.eth"), MockFetcher::default());

        assert_eq!(provider.provider_type(), ProviderType::Ens);
        assert_eq!(provider.domain_for_address(ALICE).await.unwrap().as_deref(), Some("gus.eth"));
        assert_eq!(
            provider.resolve_avatar("ipfs://ipfs/QmX/a.png").await.as_deref(),
            Some("https://ipfs.io/ipfs/QmX/a.png")
        );
        assert!(provider.resolve_avatar("ftp://nope").await.is_none());
    }
}
