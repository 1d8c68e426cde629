//! Provider dispatch types.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NamecardError, Result};

/// Naming systems that can resolve identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Ethereum Name Service
    Ens,
}

impl ProviderType {
    /// Token used to select this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Ens => "ens",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = NamecardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ens" => Ok(ProviderType::Ens),
            other => Err(NamecardError::UnknownProvider(other.to_string())),
        }
    }
}

/// Ethereum network an RPC endpoint is built for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet
    #[default]
    Mainnet,
    /// Sepolia testnet
    Sepolia,
    /// Holesky testnet
    Holesky,
}

impl Network {
    /// Lowercase network name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Sepolia => "sepolia",
            Network::Holesky => "holesky",
        }
    }

    /// Infura HTTPS endpoint for this network.
    pub fn infura_url(&self, project_id: &str) -> String {
        format!("https://{}.infura.io/v3/{}", self.as_str(), project_id)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = NamecardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "homestead" => Ok(Network::Mainnet),
            "sepolia" => Ok(Network::Sepolia),
            "holesky" => Ok(Network::Holesky),
            other => Err(NamecardError::ConfigError(format!("Unknown network: {}", other))),
        }
    }
}

/// Per-call options of the top-level resolve operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Network used when the provider client is first constructed
    #[serde(default)]
    pub network: Option<Network>,
    /// RPC credential (Infura project id) used at construction
    #[serde(default)]
    pub credential_id: Option<String>,
    /// Deadline for the whole resolution
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ResolveOptions {
    /// Sets the network.
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Sets the RPC credential.
    pub fn with_credential(mut self, credential_id: impl Into<String>) -> Self {
        self.credential_id = Some(credential_id.into());
        self
    }

    /// Sets the deadline in milliseconds.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Deadline as a duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
