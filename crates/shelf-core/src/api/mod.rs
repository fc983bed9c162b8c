//! Shared HTTP plumbing for the catalog and auth endpoints.

mod error;

use std::time::Duration;

pub use error::{ApiError, ApiErrorKind, ApiResult};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;

/// Thin wrapper over a `reqwest::Client` bound to one base URL.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::from_reqwest(&e, "build HTTP client"))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base}{path}` with URL-encoded query parameters.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path)).map_err(|e| {
            ApiError::invalid_request(format!("Invalid API URL {}{path}: {e}", self.base_url))
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url)
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.http.post(url)
    }

    /// Sends a request and decodes a JSON body, mapping every failure onto `ApiError`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> ApiResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e, action))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(&e, action))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::new(
                ApiErrorKind::Decode,
                format!("Failed to {action}: invalid response body: {e}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_url_encodes_query_pairs() {
        let client = ApiClient::new("https://example.com/", Duration::from_secs(1)).unwrap();
        let url = client
            .url(
                "/products/search",
                &[("q", "red phone&co".to_string()), ("limit", "20".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/products/search?q=red+phone%26co&limit=20"
        );
    }

    #[test]
    fn test_invalid_base_url_is_invalid_request() {
        let client = ApiClient::new("not a url", Duration::from_secs(1)).unwrap();
        let err = client.url("/products", &[]).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidRequest);
    }
}
