//! API route handlers.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use namecard_core::types::{Network, ProviderType, ResolveOptions, ResolveResponse};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: start.elapsed().as_secs(),
        providers: state.registry.len(),
    })
}

/// GET /api/v1/resolve/:address
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveResponse>> {
    let mut options = ResolveOptions {
        timeout_ms: params.timeout_ms.or(state.config.resolve_timeout_ms),
        credential_id: params.credential_id.clone(),
        ..Default::default()
    };
    if let Some(network) = &params.network {
        let network: Network = network
            .parse()
            .map_err(|e: namecard_core::NamecardError| ApiError::bad_request(e.to_string()))?;
        options = options.with_network(network);
    }

    let provider = params
        .provider
        .as_deref()
        .unwrap_or_else(|| ProviderType::Ens.as_str());

    debug!(%address, provider, "Resolve request");

    let data = state
        .registry
        .resolve(&address, provider, params.field_list(), options)
        .await?;

    Ok(Json(ResolveResponse { data, error: None }))
}

/// GET /api/v1/avatar
pub async fn resolve_avatar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AvatarParams>,
) -> Result<Json<AvatarResponse>> {
    let provider = params
        .provider
        .as_deref()
        .unwrap_or_else(|| ProviderType::Ens.as_str());

    let options = ResolveOptions {
        timeout_ms: state.config.resolve_timeout_ms,
        ..Default::default()
    };

    let avatar = state
        .registry
        .resolve_avatar(&params.value, provider, options)
        .await?;

    Ok(Json(AvatarResponse { avatar }))
}
