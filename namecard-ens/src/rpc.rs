//! JSON-RPC chain client for ENS.
//!
//! Every lookup is a plain `eth_call` against the ENS registry or a resolver
//! contract; calldata is built with alloy sol types.

use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use sha3::{Digest, Keccak256};
use tracing::{debug, instrument, warn};

use namecard_core::constants::REVERSE_REGISTRAR_SUFFIX;
use namecard_core::error::{NamecardError, Result};
use namecard_core::traits::ChainClient;
use namecard_core::types::{ResolverHandle, ViewFunction};

use crate::resolver::EnsConfig;

sol! {
    function resolver(bytes32 node) external view returns (address);
    function name(bytes32 node) external view returns (string);
    function text(bytes32 node, string key) external view returns (string);
}

/// Computes the EIP-137 namehash of a domain.
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];

    for label in name.rsplit('.') {
        if label.is_empty() {
            continue;
        }

        let label_hash = Keccak256::digest(label.as_bytes());

        let mut combined = [0u8; 64];
        combined[..32].copy_from_slice(&node);
        combined[32..].copy_from_slice(&label_hash);

        node = Keccak256::digest(combined).into();
    }

    node
}

/// Four-byte function selector of a canonical signature.
fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// ENS chain client speaking Ethereum JSON-RPC.
pub struct EnsRpcClient {
    rpc_url: String,
    registry: Address,
    http_client: reqwest::Client,
}

impl EnsRpcClient {
    /// Creates a client from configuration.
    pub fn with_config(config: &EnsConfig) -> Result<Self> {
        let registry = Address::from_str(&config.registry_address).map_err(|e| {
            NamecardError::ConfigError(format!("Invalid ENS registry address: {}", e))
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                NamecardError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            rpc_url: config.endpoint(),
            registry,
            http_client,
        })
    }

    /// Endpoint this client sends requests to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Sends an `eth_call` and returns the raw return data.
    async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {
                    "to": to.to_checksum(None),
                    "data": format!("0x{}", hex::encode(&data)),
                },
                "latest"
            ],
            "id": 1
        });

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NamecardError::ChainQuery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NamecardError::ChainQuery(format!(
                "RPC endpoint returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NamecardError::ChainQuery(e.to_string()))?;

        if let Some(error) = json.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown RPC error");
            warn!(to = %to, error = %msg, "eth_call returned an error");
            return Err(NamecardError::ChainQuery(msg.to_string()));
        }

        let result = json
            .get("result")
            .and_then(|v| v.as_str())
            .ok_or_else(|| NamecardError::ChainQuery("Missing result in RPC response".into()))?;

        hex::decode(result.strip_prefix("0x").unwrap_or(result))
            .map_err(|e| NamecardError::ChainQuery(format!("Invalid RPC result: {}", e)))
    }

    /// Asks the registry for the resolver of a node. Zero means none.
    async fn resolver_of(&self, node: B256) -> Result<Option<Address>> {
        let data = self.eth_call(self.registry, resolverCall { node }.abi_encode()).await?;

        let address = resolverCall::abi_decode_returns(&data, true)
            .map_err(|e| NamecardError::ChainQuery(format!("Invalid resolver response: {}", e)))?
            ._0;

        if address == Address::ZERO {
            Ok(None)
        } else {
            Ok(Some(address))
        }
    }

    /// Decodes a `string` return value, mapping empty data and "" to `None`.
    fn decode_string(data: &[u8]) -> std::result::Result<Option<String>, String> {
        if data.is_empty() {
            return Ok(None);
        }

        let value = String::abi_decode(data, true).map_err(|e| e.to_string())?;

        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    /// Validates a `0x`-prefixed 20-byte hex address and returns its hex digits.
    fn address_hex(address: &str) -> Result<String> {
        let trimmed = address.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| NamecardError::InvalidAddress(address.to_string()))?;

        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(NamecardError::InvalidAddress(address.to_string()));
        }

        Ok(digits.to_lowercase())
    }

    /// Normalizes an ENS name (lowercase, validate format).
    fn normalize_name(name: &str) -> Result<String> {
        let normalized = name.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(NamecardError::ValidationError("ENS name cannot be empty".into()));
        }

        if !normalized.contains('.') {
            return Err(NamecardError::ValidationError(format!(
                "ENS name must be a full domain: {}",
                normalized
            )));
        }

        Ok(normalized)
    }
}

#[async_trait]
impl ChainClient for EnsRpcClient {
    #[instrument(skip(self))]
    async fn lookup_domain(&self, address: &str) -> Result<Option<String>> {
        let digits = Self::address_hex(address)?;
        let reverse_name = format!("{}.{}", digits, REVERSE_REGISTRAR_SUFFIX);
        let node = B256::from(namehash(&reverse_name));

        let Some(resolver) = self.resolver_of(node).await? else {
            debug!(address, "No reverse resolver set");
            return Ok(None);
        };

        let data = self.eth_call(resolver, nameCall { node }.abi_encode()).await?;
        let name = Self::decode_string(&data)
            .map_err(|e| NamecardError::ChainQuery(format!("Invalid name response: {}", e)))?;

        debug!(address, name = ?name, "Reverse lookup complete");
        Ok(name)
    }

    #[instrument(skip(self))]
    async fn get_resolver(&self, domain: &str) -> Result<Option<ResolverHandle>> {
        let normalized = Self::normalize_name(domain)?;
        let node = namehash(&normalized);

        let resolver = self.resolver_of(B256::from(node)).await?;

        Ok(resolver.map(|address| ResolverHandle {
            address: address.to_checksum(None),
            domain: normalized,
            node: format!("0x{}", hex::encode(node)),
        }))
    }

    #[instrument(skip(self, resolver), fields(domain = %resolver.domain))]
    async fn get_text(&self, resolver: &ResolverHandle, key: &str) -> Result<Option<String>> {
        let to = Address::from_str(&resolver.address)
            .map_err(|e| NamecardError::ChainQuery(format!("Invalid resolver address: {}", e)))?;
        let node = B256::from_str(&resolver.node)
            .map_err(|e| NamecardError::ChainQuery(format!("Invalid resolver node: {}", e)))?;

        let call = textCall {
            node,
            key: key.to_string(),
        };
        let data = self.eth_call(to, call.abi_encode()).await?;

        Self::decode_string(&data)
            .map_err(|e| NamecardError::ChainQuery(format!("Invalid text response: {}", e)))
    }

    #[instrument(skip(self, function), fields(function = function.name))]
    async fn call_view_function(
        &self,
        contract: &str,
        function: &ViewFunction,
        args: &[String],
    ) -> Result<Option<String>> {
        let contract_error = |reason: String| NamecardError::ContractCall {
            contract: contract.to_string(),
            function: function.name.to_string(),
            reason,
        };

        let to = Address::from_str(contract.trim())
            .map_err(|e| contract_error(format!("Invalid contract address: {}", e)))?;

        let mut data = selector(function.signature).to_vec();
        for arg in args {
            let value = U256::from_str(arg.trim())
                .map_err(|e| contract_error(format!("Invalid uint256 argument {}: {}", arg, e)))?;
            data.extend_from_slice(&value.to_be_bytes::<32>());
        }

        let result = self
            .eth_call(to, data)
            .await
            .map_err(|e| contract_error(e.to_string()))?;

        Self::decode_string(&result).map_err(contract_error)
    }
}
