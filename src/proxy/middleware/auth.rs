// API Key authentication middleware
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use subtle::ConstantTimeEq;

use crate::proxy::server::AppState;

/// Guard the proxy route with the configured access key.
///
/// The key is read from `Authorization: Bearer <key>` or `x-api-key`. An empty
/// configured key lets every request through. The GitLab token never travels in
/// these headers, so they are not forwarded upstream.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    tracing::info!("Request: {} {}", request.method(), request.uri().path());

    if state.api_key.is_empty() {
        return Ok(next.run(request).await);
    }

    let api_key = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .or_else(|| {
            request
                .headers()
                .get("x-api-key")
                .and_then(|h| h.to_str().ok())
        });

    if keys_match(api_key, &state.api_key) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Rejected request with missing or invalid API key");
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// Constant-time comparison of the presented key with the configured one
fn keys_match(provided: Option<&str>, expected: &str) -> bool {
    provided.is_some_and(|key| bool::from(key.as_bytes().ct_eq(expected.as_bytes())))
}
