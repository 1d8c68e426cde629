//! Avatar reference types.
//!
//! - [`AvatarReference`]: An avatar record value tagged by its URI scheme
//! - [`TokenRef`]: An ERC-721/ERC-1155 token pointed at by an avatar record
//! - [`IpfsPath`]: A content id plus sub-path inside it

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ERC1155_PREFIX, ERC1155_URI_ABI, ERC721_PREFIX, ERC721_TOKEN_URI_ABI,
};

// ═══════════════════════════════════════════════════════════════════════════════
// AVATAR REFERENCE
// ═══════════════════════════════════════════════════════════════════════════════

/// An avatar text-record value, classified by its prefix.
///
/// Produced once per value by the classifier and consumed once by the avatar
/// resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarReference {
    /// Already an `http://` or `https://` URL.
    Http(String),
    /// An `ipfs://` content address.
    Ipfs(IpfsPath),
    /// An on-chain token whose metadata holds the image.
    Token(TokenRef),
    /// Anything else.
    Unrecognized,
}

impl AvatarReference {
    /// Returns true for [`AvatarReference::Unrecognized`].
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, AvatarReference::Unrecognized)
    }
}

/// Content id and sub-path of an IPFS URI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpfsPath {
    /// Content identifier
    pub cid: String,
    /// Path inside the content, starting with `/`, or empty
    pub path: String,
}

impl IpfsPath {
    /// Creates a new IPFS path.
    pub fn new(cid: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            path: path.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN REFERENCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Token standards that expose a metadata-URI view function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStandard {
    /// Non-fungible token, `tokenURI(uint256)`
    Erc721,
    /// Multi-token, `uri(uint256)`
    Erc1155,
}

impl TokenStandard {
    /// Avatar-record prefix for this standard.
    pub fn prefix(&self) -> &'static str {
        match self {
            TokenStandard::Erc721 => ERC721_PREFIX,
            TokenStandard::Erc1155 => ERC1155_PREFIX,
        }
    }

    /// Detects the standard from an avatar-record prefix.
    pub fn from_prefix(value: &str) -> Option<Self> {
        if value.starts_with(ERC721_PREFIX) {
            Some(TokenStandard::Erc721)
        } else if value.starts_with(ERC1155_PREFIX) {
            Some(TokenStandard::Erc1155)
        } else {
            None
        }
    }

    /// The view function returning the token's metadata URI.
    pub fn view_function(&self) -> ViewFunction {
        match self {
            TokenStandard::Erc721 => ViewFunction {
                name: "tokenURI",
                signature: "tokenURI(uint256)",
                abi: ERC721_TOKEN_URI_ABI,
            },
            TokenStandard::Erc1155 => ViewFunction {
                name: "uri",
                signature: "uri(uint256)",
                abi: ERC1155_URI_ABI,
            },
        }
    }
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStandard::Erc721 => write!(f, "ERC721"),
            TokenStandard::Erc1155 => write!(f, "ERC1155"),
        }
    }
}

/// A string-returning, single-purpose contract view function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewFunction {
    /// Function name
    pub name: &'static str,
    /// Canonical signature used for the selector
    pub signature: &'static str,
    /// Human-readable ABI fragment
    pub abi: &'static str,
}

/// A token pointed at by an avatar record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    /// Token standard
    pub standard: TokenStandard,
    /// Contract address, unvalidated
    pub contract_address: String,
    /// Token id, unvalidated
    pub token_id: String,
}

impl TokenRef {
    /// Parses a prefixed token reference such as `eip155:1/erc721:0xabc/7`.
    ///
    /// Returns `None` if the prefix is unknown or the shape is wrong.
    pub fn parse(uri: &str) -> Option<Self> {
        let standard = TokenStandard::from_prefix(uri)?;
        let (contract_address, token_id) = parse_token_ref(uri)?;
        Some(Self {
            standard,
            contract_address: contract_address.to_string(),
            token_id: token_id.to_string(),
        })
    }
}

/// Splits `eip155:1/erc<standard>:<contract>/<tokenId>` into contract and token id.
///
/// Only the segment counts are checked: three `:`-separated segments and two
/// `/`-separated parts in the last one.
pub fn parse_token_ref(uri: &str) -> Option<(&str, &str)> {
    let segments: Vec<&str> = uri.split(':').collect();
    if segments.len() != 3 {
        return None;
    }

    let parts: Vec<&str> = segments[2].split('/').collect();
    if parts.len() != 2 {
        return None;
    }

    Some((parts[0], parts[1]))
}
