//! IPFS support for namecard.
//!
//! Parses `ipfs://` URIs, rewrites them to a public HTTP gateway, and
//! provides the reqwest-backed [`HttpFetcher`] used to download token
//! metadata.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod fetch;
mod ipfs;

pub use fetch::HttpFetcher;
pub use ipfs::{parse_ipfs_uri, IpfsConfig, IpfsGateway};
