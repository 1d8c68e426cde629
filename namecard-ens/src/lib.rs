//! # namecard ENS integration
//!
//! Resolves wallet addresses to ENS identities and normalizes avatar
//! records (HTTP, IPFS, ERC-721 and ERC-1155 references) into HTTP(S) URLs.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod avatar;
mod metadata;
mod resolver;
mod rpc;

#[cfg(test)]
mod testing;

pub use avatar::{classify, AvatarResolver};
pub use metadata::{substitute_token_id, TokenMetadataFetcher};
pub use resolver::{EnsConfig, EnsProvider};
pub use rpc::{namehash, EnsRpcClient};
