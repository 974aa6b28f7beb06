// Request-scoped proxy errors and their client-visible translation

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use thiserror::Error;

use super::common::path::PathError;

const CLIENT_TOKEN_DISABLED: &str = "Client side access tokens have been disabled for security reasons.\n\
Please remove your access token from the client and instead add it to \
the proxy configuration file:\n\
\"gitlab\": { \"access_token\": \"<TOKEN>\" }\n";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("The server only accepts url safe base64 encoded path: {0}")]
    Decode(#[from] PathError),

    #[error("{}", CLIENT_TOKEN_DISABLED)]
    ClientTokenDisabled,

    #[error("Access token is not a valid header value")]
    InvalidCredential,

    #[error("Invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Upstream answered with a non-2xx status
    #[error("Upstream responded with {status}")]
    Upstream {
        status: StatusCode,
        body: Bytes,
        content_type: Option<HeaderValue>,
    },

    /// No response received from upstream
    #[error("Upstream request failed with {status}: {reason}")]
    Transport { status: StatusCode, reason: String },

    #[error("Upstream returned an invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Pagination stopped after {0} pages")]
    PageLimit(usize),
}

impl ProxyError {
    /// Build a transport error from a failed `reqwest` send
    pub fn transport(err: &reqwest::Error) -> Self {
        let status = if err.is_timeout() {
            StatusCode::GATEWAY_TIMEOUT
        } else {
            StatusCode::BAD_GATEWAY
        };
        ProxyError::Transport {
            status,
            reason: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Decode(_) | ProxyError::InvalidCredential => StatusCode::BAD_REQUEST,
            ProxyError::ClientTokenDisabled => StatusCode::FORBIDDEN,
            ProxyError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream { status, .. } | ProxyError::Transport { status, .. } => *status,
            ProxyError::InvalidPayload(_) | ProxyError::PageLimit(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Upstream status and body are passed through verbatim
            ProxyError::Upstream {
                body, content_type, ..
            } => match content_type {
                Some(content_type) => {
                    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
                }
                None => (status, body).into_response(),
            },
            ProxyError::Transport { reason, .. } => {
                tracing::warn!("Upstream transport failure: {}", reason);
                (status, status.as_u16().to_string()).into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::common::path::decode_path;

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_decode_error_is_bad_request() {
        let err = ProxyError::from(decode_path("a").unwrap_err());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_of(response)
            .await
            .starts_with("The server only accepts url safe base64 encoded path: "));
    }

    #[tokio::test]
    async fn test_policy_error_is_forbidden() {
        let response = ProxyError::ClientTokenDisabled.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_of(response).await, CLIENT_TOKEN_DISABLED);
    }

    #[tokio::test]
    async fn test_upstream_error_passes_through() {
        let err = ProxyError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: Bytes::from_static(b"{\"message\":\"Retry later\"}"),
            content_type: Some(HeaderValue::from_static("application/json")),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_of(response).await, "{\"message\":\"Retry later\"}");
    }

    #[tokio::test]
    async fn test_transport_error_body_is_status_code() {
        let err = ProxyError::Transport {
            status: StatusCode::BAD_GATEWAY,
            reason: "connection refused".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_of(response).await, "502");
    }

    #[test]
    fn test_gateway_errors() {
        assert_eq!(ProxyError::PageLimit(3).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ProxyError::InvalidPayload("expected a JSON array".to_string()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(ProxyError::InvalidCredential.status(), StatusCode::BAD_REQUEST);
    }
}
