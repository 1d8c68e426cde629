//! App state: provider registry and config.

use namecard_core::constants::{
    DEFAULT_ETH_RPC_URL, DEFAULT_IPFS_GATEWAY_HOST, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use namecard_core::types::Network;
use namecard_ens::EnsConfig;
use namecard_ipfs::IpfsConfig;
use namecard_registry::{ProviderRegistry, RegistryConfig};
use tracing::warn;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Ethereum RPC URL, used when no Infura id is set
    pub rpc_url: String,
    /// Network for Infura endpoints
    pub network: Network,
    /// Infura project id
    pub infura_id: Option<String>,
    /// IPFS gateway host
    pub ipfs_gateway_host: String,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
    /// Default deadline for a whole resolution
    pub resolve_timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_ETH_RPC_URL.into(),
            network: Network::Mainnet,
            infura_id: None,
            ipfs_gateway_host: DEFAULT_IPFS_GATEWAY_HOST.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            resolve_timeout_ms: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `.env` and the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let network = match std::env::var("NETWORK") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring NETWORK, using mainnet");
                Network::Mainnet
            }),
            Err(_) => defaults.network,
        };

        Self {
            rpc_url: std::env::var("ETH_RPC_URL").unwrap_or(defaults.rpc_url),
            network,
            infura_id: std::env::var("INFURA_ID").ok().filter(|v| !v.trim().is_empty()),
            ipfs_gateway_host: std::env::var("IPFS_GATEWAY_HOST")
                .unwrap_or(defaults.ipfs_gateway_host),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            resolve_timeout_ms: std::env::var("RESOLVE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Builds the registry configuration.
    pub fn registry_config(&self) -> RegistryConfig {
        let mut ens = EnsConfig::new(&self.rpc_url)
            .with_network(self.network)
            .with_timeout(self.request_timeout_secs);
        if let Some(id) = &self.infura_id {
            ens = ens.with_credential(id);
        }

        RegistryConfig {
            ens,
            ipfs: IpfsConfig::new(&self.ipfs_gateway_host).with_timeout(self.request_timeout_secs),
        }
    }
}

/// Shared handler state.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Provider clients
    pub registry: ProviderRegistry,
}

impl AppState {
    /// Creates state with a fresh registry built from `config`.
    pub fn new(config: ApiConfig) -> Self {
        let registry = ProviderRegistry::new(config.registry_config());
        Self { config, registry }
    }

    /// Creates state around an existing registry.
    pub fn with_registry(config: ApiConfig, registry: ProviderRegistry) -> Self {
        Self { config, registry }
    }
}
