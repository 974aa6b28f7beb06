use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, AppResult};

/// Server (listener) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Allow LAN access
    /// - false: only 127.0.0.1 (default)
    /// - true: listen on 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Access key required from clients of the proxy route; empty disables the check
    #[serde(default)]
    pub api_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: default_port(),
            api_key: String::new(),
        }
    }
}

fn default_port() -> u16 {
    8045
}

impl ServerConfig {
    /// Get the actual bind address
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }
}

/// Access to the GitLab API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabConfig {
    /// The url for the GitLab instance
    #[serde(default = "default_url")]
    pub url: String,

    /// A personal access or OAuth2 token for GitLab
    #[serde(default)]
    pub access_token: String,

    /// Accept a token sent by the client in the `private_token` query parameter.
    /// Storing the access token in the client is a security risk, so this is off by default.
    #[serde(default)]
    pub allow_client_side_access_token: bool,

    /// Validate the upstream TLS certificate. Only disable if you know what you are doing!
    #[serde(default = "default_validate_cert")]
    pub validate_cert: bool,

    /// Timeout of a single upstream fetch (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Maximum number of pages collected for one request; unbounded when unset
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Upstream proxy configuration
    #[serde(default)]
    pub upstream_proxy: UpstreamProxyConfig,
}

/// Upstream proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamProxyConfig {
    /// Enabled
    pub enabled: bool,
    /// Proxy address (http://, https://, socks5://)
    pub url: String,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            access_token: String::new(),
            allow_client_side_access_token: false,
            validate_cert: default_validate_cert(),
            request_timeout: default_request_timeout(),
            max_pages: None,
            upstream_proxy: UpstreamProxyConfig::default(),
        }
    }
}

fn default_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_validate_cert() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    120
}

impl GitLabConfig {
    /// Reject settings the proxy cannot serve requests with
    pub fn validate(&self) -> AppResult<()> {
        let url = Url::parse(&self.url)
            .map_err(|e| AppError::Config(format!("Invalid GitLab url {:?}: {}", self.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "GitLab url must be http(s), got {:?}",
                self.url
            )));
        }
        if self.max_pages == Some(0) {
            return Err(AppError::Config("max_pages must be at least 1".to_string()));
        }
        if self.upstream_proxy.enabled && self.upstream_proxy.url.is_empty() {
            return Err(AppError::Config(
                "upstream_proxy is enabled but has no url".to_string(),
            ));
        }
        Ok(())
    }

    pub fn has_server_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: GitLabConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.url, "https://gitlab.com");
        assert_eq!(config.access_token, "");
        assert!(!config.allow_client_side_access_token);
        assert!(config.validate_cert);
        assert_eq!(config.request_timeout, 120);
        assert_eq!(config.max_pages, None);
        assert!(!config.upstream_proxy.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = GitLabConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        config.url = "ftp://gitlab.example.com".to_string();
        assert!(config.validate().is_err());

        config.url = "https://gitlab.example.com".to_string();
        config.max_pages = Some(0);
        assert!(config.validate().is_err());

        config.max_pages = Some(10);
        config.upstream_proxy.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let mut server = ServerConfig::default();
        assert_eq!(server.get_bind_address(), "127.0.0.1");
        server.allow_lan_access = true;
        assert_eq!(server.get_bind_address(), "0.0.0.0");
    }
}
