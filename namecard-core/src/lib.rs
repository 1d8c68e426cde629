//! # namecard core
//!
//! Core types, errors, and traits for resolving wallet addresses into
//! decentralized identity records.
//!
//! This crate provides the foundational building blocks used by all other namecard crates:
//!
//! - **Types**: Queries, identity records, avatar references, providers
//! - **Errors**: One error enum covering every resolution failure
//! - **Constants**: URI prefixes, reserved text-record keys, ENS contract data
//! - **Traits**: The injected chain client, content fetcher, and provider capabilities
//!
//! ## Example
//!
//! ```rust
//! use namecard_core::{AddressQuery, TokenRef};
//!
//! let query = AddressQuery::new("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
//!     .with_fields(["avatar", "com.twitter"]);
//! assert!(query.wants_text_records());
//!
//! let token = TokenRef::parse("eip155:1/erc721:0xabc/7").unwrap();
//! assert_eq!(token.token_id, "7");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{NamecardError, Result};
pub use traits::*;
pub use types::*;
