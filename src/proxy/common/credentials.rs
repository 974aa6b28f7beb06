// Credential resolution policy

use crate::proxy::config::GitLabConfig;
use crate::proxy::error::ProxyError;

/// Pick the bearer token for an upstream request.
///
/// 1. client token + client tokens allowed: the client token
/// 2. client token + client tokens disallowed: rejected (403)
/// 3. server token configured: the server token
/// 4. otherwise anonymous
///
/// An empty client token counts as absent.
pub fn resolve_token<'a>(
    config: &'a GitLabConfig,
    client_token: Option<&'a str>,
) -> Result<Option<&'a str>, ProxyError> {
    match client_token.filter(|t| !t.is_empty()) {
        Some(token) if config.allow_client_side_access_token => Ok(Some(token)),
        Some(_) => Err(ProxyError::ClientTokenDisabled),
        None if config.has_server_token() => Ok(Some(config.access_token.as_str())),
        None => Ok(None),
    }
}
