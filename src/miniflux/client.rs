//! Miniflux REST client bound to one account.
//!
//! # Responsibilities
//! - Address normalization (`https://host/v1/` and `https://host` are the same instance)
//! - Token authentication on every call
//! - Mapping HTTP failures onto [`ApiError`]

use std::future::Future;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::articles::ArticleFilter;
use crate::miniflux::types::{
    ApiError, ApiResult, Category, EntriesStatusUpdate, EntryResultSet, EntryStatus, ErrorBody, Feed,
};

const AUTH_HEADER: &str = "X-Auth-Token";

/// Anything that can answer an entries query.
pub trait EntrySource {
    fn fetch_entries(&self, filter: &ArticleFilter) -> impl Future<Output = ApiResult<EntryResultSet>> + Send;
}

/// Build the HTTP client shared by every session.
///
/// The connection pool is shared; credentials are attached per call.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("gemflux/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ApiError::Transport)
}

/// Client for a single Miniflux account.
#[derive(Clone)]
pub struct MinifluxClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl MinifluxClient {
    /// Bind `http` to an instance address and API token. Performs no I/O.
    pub fn new(http: reqwest::Client, instance: &str, token: &str) -> Self {
        Self {
            http,
            base_url: normalize_instance(instance),
            token: token.to_string(),
        }
    }

    /// Instance address without the API prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.json(self.request(Method::GET, "/categories")).await
    }

    pub async fn feeds(&self) -> ApiResult<Vec<Feed>> {
        self.json(self.request(Method::GET, "/feeds")).await
    }

    pub async fn entries(&self, filter: &ArticleFilter) -> ApiResult<EntryResultSet> {
        let builder = self.request(Method::GET, "/entries").query(&filter.query_pairs());
        self.json(builder).await
    }

    /// Set the status of every listed entry.
    pub async fn update_entries(&self, entry_ids: &[i64], status: EntryStatus) -> ApiResult<()> {
        let body = EntriesStatusUpdate { entry_ids, status };
        self.send(self.request(Method::PUT, "/entries").json(&body)).await?;
        Ok(())
    }

    /// Ask the instance to refresh every feed in the background.
    pub async fn refresh_all_feeds(&self) -> ApiResult<()> {
        self.send(self.request(Method::PUT, "/feeds/refresh")).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/v1{}", self.base_url, path))
            .header(AUTH_HEADER, &self.token)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            _ => {
                let message = match response.json::<ErrorBody>().await {
                    Ok(body) if !body.error_message.is_empty() => body.error_message,
                    _ => status.canonical_reason().unwrap_or("unexpected status").to_string(),
                };
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

impl EntrySource for MinifluxClient {
    async fn fetch_entries(&self, filter: &ArticleFilter) -> ApiResult<EntryResultSet> {
        self.entries(filter).await
    }
}

impl std::fmt::Debug for MinifluxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinifluxClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn normalize_instance(instance: &str) -> String {
    let trimmed = instance.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/v1")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_instance() {
        assert_eq!(normalize_instance("https://rss.example.org"), "https://rss.example.org");
        assert_eq!(normalize_instance("https://rss.example.org/"), "https://rss.example.org");
        assert_eq!(normalize_instance("https://rss.example.org/v1/"), "https://rss.example.org");
        assert_eq!(normalize_instance("https://example.org/miniflux/v1"), "https://example.org/miniflux");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = MinifluxClient::new(reqwest::Client::new(), "https://rss.example.org", "secret-token");
        let debug = format!("{:?}", client);
        assert!(debug.contains("rss.example.org"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_request_url_and_header() {
        let client = MinifluxClient::new(reqwest::Client::new(), "https://rss.example.org/v1", "t");
        let request = client.request(Method::GET, "/feeds").build().unwrap();
        assert_eq!(request.url().as_str(), "https://rss.example.org/v1/feeds");
        assert_eq!(request.headers().get(AUTH_HEADER).unwrap(), "t");
    }
}
