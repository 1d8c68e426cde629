//! Provider registry.
//!
//! One client per provider type, constructed on first use and shared after
//! that. Concurrent first accesses may both construct a client; the first
//! one inserted is kept and the other is dropped.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use namecard_core::error::{NamecardError, Result};
use namecard_core::traits::ProviderClient;
use namecard_core::types::{
    AddressQuery, IdentityRecord, ProviderType, ResolveOptions, ResolveResponse,
};
use namecard_ens::{EnsConfig, EnsProvider};
use namecard_ipfs::IpfsConfig;

/// Configuration used to construct provider clients.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// ENS configuration
    pub ens: EnsConfig,
    /// IPFS configuration
    pub ipfs: IpfsConfig,
}

impl RegistryConfig {
    /// Creates a config with the given RPC URL.
    pub fn with_rpc(rpc_url: impl Into<String>) -> Self {
        Self {
            ens: EnsConfig::new(rpc_url),
            ..Default::default()
        }
    }
}

/// Keyed get-or-create cache of provider clients.
pub struct ProviderRegistry {
    config: RegistryConfig,
    providers: DashMap<ProviderType, Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            providers: DashMap::new(),
        }
    }

    /// Registers a client, replacing any existing one of the same type.
    pub fn register(&self, provider: Arc<dyn ProviderClient>) {
        let kind = provider.provider_type();
        if self.providers.insert(kind, provider).is_some() {
            debug!(provider = %kind, "Replaced registered provider");
        }
    }

    /// Returns the number of constructed clients.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no client has been constructed yet.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Returns the client for `kind`, constructing it on first use.
    ///
    /// `options` only matter for that first construction.
    pub fn get_or_create(
        &self,
        kind: ProviderType,
        options: &ResolveOptions,
    ) -> Result<Arc<dyn ProviderClient>> {
        if let Some(existing) = self.providers.get(&kind) {
            return Ok(existing.value().clone());
        }

        let created = self.build(kind, options)?;
        let entry = self.providers.entry(kind).or_insert(created);

        debug!(provider = %kind, "Provider client ready");
        Ok(entry.value().clone())
    }

    fn build(
        &self,
        kind: ProviderType,
        options: &ResolveOptions,
    ) -> Result<Arc<dyn ProviderClient>> {
        match kind {
            ProviderType::Ens => {
                let provider =
                    EnsProvider::with_config(self.ens_config(options), self.config.ipfs.clone())?;
                Ok(Arc::new(provider))
            }
        }
    }

    fn ens_config(&self, options: &ResolveOptions) -> EnsConfig {
        let mut ens = self.config.ens.clone();
        if let Some(network) = options.network {
            ens.network = network;
        }
        if let Some(credential_id) = &options.credential_id {
            ens.credential_id = Some(credential_id.clone());
        }
        ens
    }

    /// Resolves an address with the named provider.
    ///
    /// Unknown provider tokens fail before any network access. When
    /// `options.timeout_ms` is set, the whole resolution is abandoned once it
    /// elapses.
    #[instrument(skip(self, fields, options))]
    pub async fn resolve(
        &self,
        address: &str,
        provider: &str,
        fields: Option<Vec<String>>,
        options: ResolveOptions,
    ) -> Result<Option<IdentityRecord>> {
        let kind: ProviderType = provider.parse()?;
        let client = self.get_or_create(kind, &options)?;

        let query = AddressQuery {
            address: address.to_string(),
            fields,
        };

        let result = with_deadline(options.timeout_ms, client.resolve_identity(&query)).await;

        match &result {
            Ok(Some(record)) => info!(domain = %record.domain, "Resolution complete"),
            Ok(None) => info!("No identity found"),
            Err(e) => warn!(error = %e, "Resolution failed"),
        }

        result
    }

    /// Like [`resolve`](Self::resolve), returning the `{data, error}` envelope.
    pub async fn resolve_response(
        &self,
        address: &str,
        provider: &str,
        fields: Option<Vec<String>>,
        options: ResolveOptions,
    ) -> ResolveResponse {
        self.resolve(address, provider, fields, options).await.into()
    }

    /// Normalizes a raw avatar value with the named provider.
    pub async fn resolve_avatar(
        &self,
        raw: &str,
        provider: &str,
        options: ResolveOptions,
    ) -> Result<Option<String>> {
        let kind: ProviderType = provider.parse()?;
        let client = self.get_or_create(kind, &options)?;

        with_deadline(options.timeout_ms, async { Ok(client.resolve_avatar(raw).await) }).await
    }
}

/// Runs `fut`, failing with [`NamecardError::Timeout`] if the deadline elapses.
async fn with_deadline<T, F>(timeout_ms: Option<u64>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout_ms {
        Some(millis) => tokio::time::timeout(std::time::Duration::from_millis(millis), fut)
            .await
            .map_err(|_| NamecardError::Timeout { millis })?,
        None => fut.await,
    }
}
