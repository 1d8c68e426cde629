//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};

/// Query parameters of `GET /api/v1/resolve/:address`.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveParams {
    /// Provider token, defaults to "ens"
    pub provider: Option<String>,
    /// Comma-separated text-record keys
    pub fields: Option<String>,
    /// Network used if the provider client is constructed by this call
    pub network: Option<String>,
    /// RPC credential used if the provider client is constructed by this call
    pub credential_id: Option<String>,
    /// Deadline in milliseconds
    pub timeout_ms: Option<u64>,
}

impl ResolveParams {
    /// Requested keys; `None` when the parameter is absent.
    pub fn field_list(&self) -> Option<Vec<String>> {
        self.fields.as_ref().map(|fields| {
            fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// Query parameters of `GET /api/v1/avatar`.
#[derive(Debug, Deserialize)]
pub struct AvatarParams {
    /// Raw avatar record value
    pub value: String,
    /// Provider token, defaults to "ens"
    pub provider: Option<String>,
}

/// Response for avatar normalization.
#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    /// HTTP(S) image URL, or null
    pub avatar: Option<String>,
}

/// Response for health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Constructed provider clients
    pub providers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_list() {
        let params = ResolveParams {
            fields: Some("avatar, com.twitter,,url".into()),
            ..Default::default()
        };
        assert_eq!(
            params.field_list(),
            Some(vec!["avatar".to_string(), "com.twitter".to_string(), "url".to_string()])
        );

        assert_eq!(ResolveParams::default().field_list(), None);

        let empty = ResolveParams {
            fields: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(empty.field_list(), Some(vec![]));
    }
}
