use reqwest::{Client, Proxy};

use crate::error::{AppError, AppResult};
use crate::proxy::config::UpstreamProxyConfig;

/// User-Agent sent on every upstream request
pub const USER_AGENT: &str = concat!("gitlab-proxy/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP client with the given timeout, TLS policy and upstream proxy
pub fn create_client_with_proxy(
    timeout_secs: u64,
    validate_cert: bool,
    proxy_config: Option<&UpstreamProxyConfig>,
) -> AppResult<Client> {
    let mut builder = Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(!validate_cert);

    if let Some(config) = proxy_config {
        if config.enabled && !config.url.is_empty() {
            let proxy = Proxy::all(&config.url).map_err(|e| {
                AppError::Config(format!("Invalid proxy address {}: {}", config.url, e))
            })?;
            builder = builder.proxy(proxy);
            tracing::info!("HTTP client upstream proxy enabled: {}", config.url);
        }
    }

    Ok(builder.build()?)
}
