//! Domain types for namecard.
//!
//! This module provides the data structures passed through a resolution:
//!
//! - [`AddressQuery`]: What the caller asks for
//! - [`IdentityRecord`]: Domain plus requested text records
//! - [`AvatarReference`]: Classified avatar record value
//! - [`ProviderType`] / [`ResolveOptions`]: Provider dispatch inputs

mod avatar;
mod identity;
mod provider;

pub use avatar::*;
pub use identity::*;
pub use provider::*;
