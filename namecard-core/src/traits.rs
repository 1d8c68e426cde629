//! Capability traits for namecard.
//!
//! The resolution pipeline never talks to a blockchain node or an HTTP server
//! directly. It is handed implementations of these traits, which keeps the
//! pipeline testable with in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AddressQuery, IdentityRecord, ProviderType, ResolverHandle, ViewFunction};

// ═══════════════════════════════════════════════════════════════════════════════
// CHAIN CLIENT TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only access to a naming system deployed on a blockchain.
///
/// Lookup failures are reported as [`NamecardError::ChainQuery`] and view
/// function failures as [`NamecardError::ContractCall`].
///
/// [`NamecardError::ChainQuery`]: crate::NamecardError::ChainQuery
/// [`NamecardError::ContractCall`]: crate::NamecardError::ContractCall
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Reverse-resolves an address to its primary domain, if one is set.
    async fn lookup_domain(&self, address: &str) -> Result<Option<String>>;

    /// Finds the resolver contract for a domain.
    async fn get_resolver(&self, domain: &str) -> Result<Option<ResolverHandle>>;

    /// Reads a text record through a resolver.
    async fn get_text(&self, resolver: &ResolverHandle, key: &str) -> Result<Option<String>>;

    /// Calls a string-returning view function on a contract.
    async fn call_view_function(
        &self,
        contract: &str,
        function: &ViewFunction,
        args: &[String],
    ) -> Result<Option<String>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTENT FETCHER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Fetches raw bytes from an HTTP(S) URL.
///
/// Failures are reported as [`NamecardError::Fetch`]; callers parse the body
/// themselves.
///
/// [`NamecardError::Fetch`]: crate::NamecardError::Fetch
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Downloads the resource at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER CLIENT TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// A naming-system backend able to resolve identities.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Which provider this client implements.
    fn provider_type(&self) -> ProviderType;

    /// Resolves an address into an identity record.
    ///
    /// `Ok(None)` means the address has no domain, which is not an error.
    async fn resolve_identity(&self, query: &AddressQuery) -> Result<Option<IdentityRecord>>;

    /// Returns the primary domain of an address, if any.
    async fn domain_for_address(&self, address: &str) -> Result<Option<String>>;

    /// Normalizes a raw avatar record value into an HTTP(S) URL.
    async fn resolve_avatar(&self, raw: &str) -> Option<String>;
}
