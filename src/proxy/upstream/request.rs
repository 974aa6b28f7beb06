// Upstream request construction

use reqwest::header::{self, HeaderMap, HeaderValue};
use url::Url;

use crate::proxy::common::params::QueryParams;
use crate::proxy::config::GitLabConfig;
use crate::proxy::error::ProxyError;

const API_PREFIX: &str = "api/v4";
const PER_PAGE_PARAM: &str = "per_page";
/// Largest page size GitLab accepts; keeps round trips to a minimum
pub const PER_PAGE: &str = "100";

/// A single upstream GET.
///
/// Immutable once built: following a continuation cursor yields a new value
/// through [`UpstreamRequest::with_url`].
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    url: Url,
    headers: HeaderMap,
    validate_cert: bool,
}

impl UpstreamRequest {
    /// `<base>/api/v4/<api_path>?<params>&per_page=100`, with a bearer token when one was resolved
    pub fn build(
        config: &GitLabConfig,
        api_path: &str,
        params: &QueryParams,
        token: Option<&str>,
    ) -> Result<Self, ProxyError> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}",
            config.url.trim_end_matches('/'),
            API_PREFIX,
            api_path.trim_start_matches('/')
        ))?;

        url.query_pairs_mut()
            .extend_pairs(params.iter().filter(|(k, _)| *k != PER_PAGE_PARAM))
            .append_pair(PER_PAGE_PARAM, PER_PAGE);

        let mut headers = HeaderMap::new();
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ProxyError::InvalidCredential)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        Ok(Self {
            url,
            headers,
            validate_cert: config.validate_cert,
        })
    }

    /// Same headers and TLS policy, different URL
    pub fn with_url(self, url: Url) -> Self {
        Self { url, ..self }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn validate_cert(&self) -> bool {
        self.validate_cert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GitLabConfig {
        GitLabConfig {
            url: "https://gitlab.example.com/".to_string(),
            ..Default::default()
        }
    }

    fn params(raw: &[(&str, &str)]) -> QueryParams {
        QueryParams::from_pairs(raw.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn test_build_url() {
        let request = UpstreamRequest::build(
            &config(),
            "projects/group%2Fproject/repository/tree",
            &params(&[("ref", "main"), ("path", "notebooks")]),
            None,
        )
        .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://gitlab.example.com/api/v4/projects/group%2Fproject/repository/tree?ref=main&path=notebooks&per_page=100"
        );
        assert!(request.headers().is_empty());
        assert!(request.validate_cert());
    }

    #[test]
    fn test_per_page_is_fixed() {
        let request = UpstreamRequest::build(
            &config(),
            "/projects",
            &params(&[("per_page", "5"), ("search", "lab")]),
            None,
        )
        .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://gitlab.example.com/api/v4/projects?search=lab&per_page=100"
        );
    }

    #[test]
    fn test_bearer_header_only_with_token() {
        let request =
            UpstreamRequest::build(&config(), "user", &QueryParams::default(), Some("s3cret"))
                .unwrap();
        let auth = request.headers().get(header::AUTHORIZATION).unwrap();
        assert_eq!(auth, "Bearer s3cret");
        assert!(auth.is_sensitive());

        let request =
            UpstreamRequest::build(&config(), "user", &QueryParams::default(), Some("")).unwrap();
        assert!(request.headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_unprintable_token_is_rejected() {
        let result =
            UpstreamRequest::build(&config(), "user", &QueryParams::default(), Some("a\nb"));
        assert!(matches!(result, Err(ProxyError::InvalidCredential)));
    }

    #[test]
    fn test_with_url_keeps_headers_and_tls() {
        let config = GitLabConfig {
            validate_cert: false,
            ..config()
        };
        let request =
            UpstreamRequest::build(&config, "projects", &QueryParams::default(), Some("t")).unwrap();
        let next = Url::parse("https://gitlab.example.com/api/v4/projects?page=2&per_page=100")
            .unwrap();

        let request = request.with_url(next.clone());
        assert_eq!(request.url(), &next);
        assert_eq!(request.headers().get(header::AUTHORIZATION).unwrap(), "Bearer t");
        assert!(!request.validate_cert());
    }
}
