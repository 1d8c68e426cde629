//! # namecard Registry
//!
//! Maps provider tokens to lazily constructed provider clients and exposes
//! the top-level `resolve` operation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use namecard_registry::{ProviderRegistry, RegistryConfig};
//!
//! let registry = ProviderRegistry::new(RegistryConfig::default());
//!
//! let response = registry
//!     .resolve_response(address, "ens", Some(vec!["avatar".into()]), Default::default())
//!     .await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod registry;

pub use registry::{ProviderRegistry, RegistryConfig};
