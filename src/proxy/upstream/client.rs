// Upstream client: single fetch plus the pagination loop

use bytes::Bytes;
use reqwest::{header, Client};
use serde_json::Value;
use url::Url;

use super::link::next_page_url;
use super::request::UpstreamRequest;
use crate::error::AppResult;
use crate::proxy::config::GitLabConfig;
use crate::proxy::error::ProxyError;
use crate::utils::http::create_client_with_proxy;

/// One fetched page
#[derive(Debug)]
pub struct Page {
    pub body: Value,
    pub next: Option<Url>,
}

pub struct UpstreamClient {
    verified: Client,
    unverified: Client,
}

impl UpstreamClient {
    pub fn new(config: &GitLabConfig) -> AppResult<Self> {
        let proxy = Some(&config.upstream_proxy);
        Ok(Self {
            verified: create_client_with_proxy(config.request_timeout, true, proxy)?,
            unverified: create_client_with_proxy(config.request_timeout, false, proxy)?,
        })
    }

    fn client_for(&self, validate_cert: bool) -> &Client {
        if validate_cert {
            &self.verified
        } else {
            &self.unverified
        }
    }

    /// Issue one GET and parse its JSON body and continuation cursor
    pub async fn fetch_page(&self, request: &UpstreamRequest) -> Result<Page, ProxyError> {
        tracing::debug!("Upstream GET {}", request.url().path());

        let response = self
            .client_for(request.validate_cert())
            .get(request.url().clone())
            .headers(request.headers().clone())
            .send()
            .await
            .map_err(|e| ProxyError::transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    // No body received: report the status code as text
                    tracing::debug!("Failed to read upstream {} body: {}", status, e);
                    Bytes::from(status.as_u16().to_string())
                }
            };
            tracing::debug!("Upstream responded {} for {}", status, request.url().path());
            return Err(ProxyError::Upstream {
                status,
                body,
                content_type,
            });
        }

        let next = next_page_url(response.headers(), request.url());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProxyError::transport(&e))?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|e| ProxyError::InvalidPayload(format!("body is not JSON: {}", e)))?;

        Ok(Page { body, next })
    }

    /// Fetch the first page and follow `rel="next"` links until they run out,
    /// concatenating the JSON arrays in fetch order.
    ///
    /// A lone non-array page (single-object endpoints) is returned unchanged.
    /// Any failure fails the whole request; no partial result is returned.
    pub async fn fetch_all(
        &self,
        request: UpstreamRequest,
        max_pages: Option<usize>,
    ) -> Result<Value, ProxyError> {
        let mut items: Vec<Value> = Vec::new();
        let mut request = request;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(&request).await?;
            pages += 1;

            match page.body {
                Value::Array(elements) => items.extend(elements),
                other if pages == 1 && page.next.is_none() => return Ok(other),
                _ => {
                    return Err(ProxyError::InvalidPayload(format!(
                        "page {} of a paginated result is not a JSON array",
                        pages
                    )))
                }
            }

            let Some(next) = page.next else { break };
            if max_pages.is_some_and(|max| pages >= max) {
                tracing::warn!("Pagination of {} stopped at {} pages", request.url().path(), pages);
                return Err(ProxyError::PageLimit(pages));
            }
            request = request.with_url(next);
        }

        tracing::debug!("Collected {} items over {} pages", items.len(), pages);
        Ok(Value::Array(items))
    }
}
