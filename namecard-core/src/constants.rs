//! Protocol constants for namecard.
//!
//! URI prefixes are matched literally, so they must stay byte-for-byte equal
//! to what wallets and ENS apps write into avatar records.

// ═══════════════════════════════════════════════════════════════════════════════
// URI PREFIXES
// ═══════════════════════════════════════════════════════════════════════════════

/// Plain HTTP URL prefix.
pub const HTTP_PREFIX: &str = "http://";

/// HTTPS URL prefix.
pub const HTTPS_PREFIX: &str = "https://";

/// IPFS content address prefix.
pub const IPFS_PREFIX: &str = "ipfs://";

/// Redundant path segment some writers put after [`IPFS_PREFIX`].
pub const IPFS_PATH_SEGMENT: &str = "ipfs/";

/// CAIP-19 style prefix of an ERC-721 token reference on mainnet.
pub const ERC721_PREFIX: &str = "eip155:1/erc721:";

/// CAIP-19 style prefix of an ERC-1155 token reference on mainnet.
pub const ERC1155_PREFIX: &str = "eip155:1/erc1155:";

// ═══════════════════════════════════════════════════════════════════════════════
// TEXT RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Reserved text-record key holding the avatar value.
pub const AVATAR_KEY: &str = "avatar";

/// Key of the domain name in a serialized identity record.
pub const DOMAIN_KEY: &str = "domain";

/// Metadata document field holding the token image.
pub const METADATA_IMAGE_FIELD: &str = "image";

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN METADATA
// ═══════════════════════════════════════════════════════════════════════════════

/// Token-id placeholder used by ERC-1155 metadata URIs, hex-prefixed form.
pub const TOKEN_ID_PLACEHOLDER_HEX: &str = "0x{id}";

/// Token-id placeholder used by ERC-1155 metadata URIs.
pub const TOKEN_ID_PLACEHOLDER: &str = "{id}";

/// Human-readable ABI of the ERC-721 metadata getter.
pub const ERC721_TOKEN_URI_ABI: &str =
    "function tokenURI(uint256 tokenId) public view returns (string)";

/// Human-readable ABI of the ERC-1155 metadata getter.
pub const ERC1155_URI_ABI: &str = "function uri(uint256 id) external view returns (string)";

// ═══════════════════════════════════════════════════════════════════════════════
// ENS
// ═══════════════════════════════════════════════════════════════════════════════

/// ENS registry (with fallback) address, identical on mainnet and testnets.
pub const ENS_REGISTRY_ADDRESS: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// Reverse-resolution parent domain.
pub const REVERSE_REGISTRAR_SUFFIX: &str = "addr.reverse";

/// Default Ethereum RPC URL when no endpoint or credential is configured.
pub const DEFAULT_ETH_RPC_URL: &str = "https://ethereum.publicnode.com";

// ═══════════════════════════════════════════════════════════════════════════════
// IPFS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default public gateway host for path-style IPFS URLs.
pub const DEFAULT_IPFS_GATEWAY_HOST: &str = "ipfs.io";

/// Largest metadata document the fetcher will read (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// ═══════════════════════════════════════════════════════════════════════════════
// TIMEOUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
