//! Remote product source: one page of products per call.

use tracing::debug;

use super::model::{FetchKey, ProductPage};
use crate::api::{ApiClient, ApiResult};

#[derive(Debug, Clone)]
pub struct ProductSource {
    api: ApiClient,
}

impl ProductSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches the page described by `key`.
    ///
    /// Uses `/products/search` when the key carries search text and
    /// `/products` otherwise.
    pub async fn fetch_page(&self, key: &FetchKey) -> ApiResult<ProductPage> {
        let mut query = Vec::with_capacity(3);
        let path = match &key.search {
            Some(q) => {
                query.push(("q", q.clone()));
                "/products/search"
            }
            None => "/products",
        };
        query.push(("limit", key.limit.to_string()));
        query.push(("skip", key.offset().to_string()));

        let url = self.api.url(path, &query)?;
        debug!(page = key.page, limit = key.limit, search = ?key.search, "fetching products");
        self.api
            .send_json(self.api.get(url), "fetch products")
            .await
    }

    /// Validates the request, then fetches it. Invalid input fails before any request.
    pub async fn fetch(&self, page: u32, limit: u32, search: &str) -> ApiResult<ProductPage> {
        let key = FetchKey::new(page, limit, search)?;
        self.fetch_page(&key).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiErrorKind;

    fn page_body(ids: &[u64], total: u32, skip: u32, limit: u32) -> serde_json::Value {
        let products: Vec<_> = ids
            .iter()
            .map(|id| json!({"id": id, "title": format!("Item {id}"), "rating": 4.0, "price": 10.0}))
            .collect();
        json!({"products": products, "total": total, "skip": skip, "limit": limit})
    }

    fn source_for(server: &MockServer) -> ProductSource {
        ProductSource::new(ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_list_uses_limit_and_skip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("limit", "20"))
            .and(query_param("skip", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[21, 22], 57, 20, 20)))
            .expect(1)
            .mount(&server)
            .await;

        let page = source_for(&server).fetch(2, 20, "").await.unwrap();
        assert_eq!(page.total, 57);
        assert_eq!(page.skip, 20);
        assert_eq!(page.products[0].id, 21);
    }

    #[tokio::test]
    async fn test_search_hits_search_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/search"))
            .and(query_param("q", "red phone"))
            .and(query_param("limit", "10"))
            .and(query_param("skip", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[3], 1, 0, 10)))
            .expect(1)
            .mount(&server)
            .await;

        let page = source_for(&server).fetch(1, 10, "red phone").await.unwrap();
        assert_eq!(page.products.len(), 1);
    }

    #[tokio::test]
    async fn test_non_success_carries_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"message": "maintenance"})),
            )
            .mount(&server)
            .await;

        let err = source_for(&server).fetch(1, 20, "").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.status, Some(503));
        assert_eq!(err.message, "maintenance");
    }

    #[tokio::test]
    async fn test_page_zero_fails_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = source_for(&server).fetch(0, 20, "").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"products\": 3}"))
            .mount(&server)
            .await;

        let err = source_for(&server).fetch(1, 20, "").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Decode);
    }
}
