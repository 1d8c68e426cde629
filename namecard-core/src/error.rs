//! Error types for namecard.
//!
//! This module provides a single error hierarchy using `thiserror`.
//! Errors are split into two families: the ones that abort a resolution and
//! are surfaced to the caller, and the avatar-pipeline ones that degrade the
//! avatar to `null` instead.

use thiserror::Error;

/// Result type alias using `NamecardError`.
pub type Result<T> = std::result::Result<T, NamecardError>;

/// Main error type for all namecard operations.
#[derive(Debug, Error)]
pub enum NamecardError {
    // ═══════════════════════════════════════════════════════════════════════════
    // DISPATCH ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No provider implementation is registered for the requested token.
    #[error("Unknown DID provider: {0}")]
    UnknownProvider(String),

    /// The input is not a well-formed wallet address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CHAIN ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Address, domain, resolver or text-record lookup failed.
    #[error("Chain query failed: {0}")]
    ChainQuery(String),

    /// The domain exists but has no resolver to read text records from.
    #[error("Error finding resolver for {domain}.")]
    MissingResolver {
        /// Domain whose resolver could not be found
        domain: String,
    },

    /// An on-chain view function call failed.
    #[error("Contract call {function} on {contract} failed: {reason}")]
    ContractCall {
        /// Contract address
        contract: String,
        /// View function name
        function: String,
        /// Underlying failure
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // METADATA ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP fetch of a metadata document or gateway resource failed.
    #[error("Fetch failed for {url}: {reason}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// A fetched metadata document is not valid JSON.
    #[error("Invalid metadata from {url}: {reason}")]
    MetadataParse {
        /// URL the document was fetched from
        url: String,
        /// Parser message
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // DEADLINE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The overall resolution deadline elapsed.
    #[error("Resolution timed out after {millis}ms")]
    Timeout {
        /// Deadline in milliseconds
        millis: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl NamecardError {
    /// Returns true if this error aborts an identity resolution.
    ///
    /// Everything except the avatar-pipeline errors is fatal.
    pub fn is_fatal(&self) -> bool {
        !self.is_avatar_degradable()
    }

    /// Returns true if this error only degrades the avatar value to `null`.
    pub fn is_avatar_degradable(&self) -> bool {
        matches!(
            self,
            NamecardError::ContractCall { .. }
                | NamecardError::Fetch { .. }
                | NamecardError::MetadataParse { .. }
        )
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            NamecardError::UnknownProvider(_) => "UNKNOWN_PROVIDER",
            NamecardError::InvalidAddress(_) => "INVALID_ADDRESS",
            NamecardError::ChainQuery(_) => "CHAIN_QUERY_ERROR",
            NamecardError::MissingResolver { .. } => "MISSING_RESOLVER",
            NamecardError::ContractCall { .. } => "CONTRACT_CALL_ERROR",
            NamecardError::Fetch { .. } => "FETCH_ERROR",
            NamecardError::MetadataParse { .. } => "METADATA_PARSE_ERROR",
            NamecardError::Timeout { .. } => "TIMEOUT",
            NamecardError::JsonError(_) => "JSON_ERROR",
            NamecardError::HexError(_) => "HEX_ERROR",
            NamecardError::ValidationError(_) => "VALIDATION_ERROR",
            NamecardError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}
