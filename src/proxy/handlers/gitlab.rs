// GitLab Handler
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::Value;
use tracing::debug;

use crate::proxy::common::credentials::resolve_token;
use crate::proxy::common::params::QueryParams;
use crate::proxy::common::path::decode_path;
use crate::proxy::error::ProxyError;
use crate::proxy::server::AppState;
use crate::proxy::upstream::UpstreamRequest;

/// Proxy a GET to the GitLab API v4.
///
/// Path param: the API path, URL-safe base64 encoded so the router never
/// turns `%2F` in namespaced paths into `/`.
pub async fn handle_proxy(
    State(state): State<AppState>,
    Path(encoded_path): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ProxyError> {
    proxy_request(&state, &encoded_path, query).await
}

/// `GET /gitlab/`: the empty encoded path, i.e. the API root
pub async fn handle_proxy_root(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ProxyError> {
    proxy_request(&state, "", query).await
}

async fn proxy_request(
    state: &AppState,
    encoded_path: &str,
    query: Vec<(String, String)>,
) -> Result<Json<Value>, ProxyError> {
    let api_path = decode_path(encoded_path)?;

    // The client token must never be forwarded, whichever branch the policy takes
    let mut params = QueryParams::from_pairs(query);
    let client_token = params.take_client_token();

    let gitlab = &state.gitlab;
    let token = resolve_token(gitlab, client_token.as_deref())?;
    debug!(
        "Proxying GitLab request: {} (authenticated: {})",
        api_path,
        token.is_some()
    );

    let request = UpstreamRequest::build(gitlab, &api_path, &params, token)?;
    let result = state.upstream.fetch_all(request, gitlab.max_pages).await?;

    Ok(Json(result))
}
