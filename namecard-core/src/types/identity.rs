//! Identity query and result types.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::{AVATAR_KEY, DOMAIN_KEY};
use crate::error::{NamecardError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY
// ═══════════════════════════════════════════════════════════════════════════════

/// A request to resolve an address into an identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    /// Wallet address, as given by the caller
    pub address: String,
    /// Requested text-record keys; `None` means "domain only"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl AddressQuery {
    /// Creates a query for the domain only.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            fields: None,
        }
    }

    /// Requests the given text-record keys.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if any text records were requested.
    ///
    /// An empty list still counts as a request, so the resolver is looked up.
    pub fn wants_text_records(&self) -> bool {
        self.fields.is_some()
    }

    /// Requested keys with duplicates removed, in first-seen order.
    pub fn unique_fields(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for field in self.fields.iter().flatten() {
            if !seen.contains(&field.as_str()) {
                seen.push(field.as_str());
            }
        }
        seen
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVER HANDLE
// ═══════════════════════════════════════════════════════════════════════════════

/// The resolver contract serving a domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverHandle {
    /// Resolver contract address
    pub address: String,
    /// Domain served by this resolver
    pub domain: String,
    /// Namehash of the domain (hex, `0x`-prefixed)
    pub node: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTITY RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// A resolved identity: the primary domain and the requested text records.
///
/// Serializes flat, as `{"domain": ..., "<field>": ...}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Primary domain of the address
    pub domain: String,
    /// Requested text records; `None` when the record is unset
    pub text_records: BTreeMap<String, Option<String>>,
}

impl IdentityRecord {
    /// Creates a record with no text records.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            text_records: BTreeMap::new(),
        }
    }

    /// Returns a text record value, flattening unset records to `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.text_records.get(key).and_then(|v| v.as_deref())
    }

    /// Returns the normalized avatar URL, if any.
    pub fn avatar(&self) -> Option<&str> {
        self.get(AVATAR_KEY)
    }
}

impl Serialize for IdentityRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(DOMAIN_KEY, &self.domain)?;
        for (key, value) in &self.text_records {
            // The domain always wins over a text record of the same name.
            if key == DOMAIN_KEY {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESPONSE ENVELOPE
// ═══════════════════════════════════════════════════════════════════════════════

/// Serializable error value of a [`ResolveResponse`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl From<&NamecardError> for ErrorBody {
    fn from(err: &NamecardError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// `{data, error}` envelope returned by the top-level resolve operation.
///
/// Exactly one side is set, except "no identity found" where both are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolveResponse {
    /// The identity, if one was found
    pub data: Option<IdentityRecord>,
    /// The error, if resolution failed
    pub error: Option<ErrorBody>,
}

impl ResolveResponse {
    /// Returns true for the "no identity found" case.
    pub fn is_not_found(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }
}

impl From<Result<Option<IdentityRecord>>> for ResolveResponse {
    fn from(result: Result<Option<IdentityRecord>>) -> Self {
        match result {
            Ok(data) => Self { data, error: None },
            Err(err) => Self {
                data: None,
                error: Some(ErrorBody::from(&err)),
            },
        }
    }
}
