//! HTTP client for the DummyJSON product API.

use super::error::{ApiError, ApiResult};
use super::models::{Product, ProductPage, SortOrder};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

/// Page size used when the caller has no preference.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Trait for catalog API calls - enables mocking for tests.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches one page of the unfiltered product list.
    async fn list_products(&self, page: u32, limit: u32) -> ApiResult<ProductPage>;

    /// Fetches the full list of category names.
    async fn list_categories(&self) -> ApiResult<Vec<String>>;

    /// Fetches every product in one category.
    async fn list_products_by_category(&self, category: &str) -> ApiResult<ProductPage>;

    /// Runs a free-text search.
    async fn search_products(&self, query: &str) -> ApiResult<ProductPage>;

    /// Fetches one page of products sorted by `sort_by`.
    async fn list_sorted_products(
        &self,
        sort_by: &str,
        order: SortOrder,
        page: u32,
        limit: u32,
    ) -> ApiResult<ProductPage>;

    /// Fetches a single product by id.
    async fn get_product(&self, id: u64) -> ApiResult<Product>;
}

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Catalog HTTP client with optional retry on transient failures.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    retries: u32,
    retry_delay_ms: u64,
    retry_jitter_ms: u64,
}

impl CatalogClient {
    /// Creates a new client from the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            retry_jitter_ms: config.retry_jitter_ms,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Updates the retry settings.
    pub fn set_retries(&mut self, retries: u32, delay_ms: u64, jitter_ms: u64) {
        self.retries = retries;
        self.retry_delay_ms = delay_ms;
        self.retry_jitter_ms = jitter_ms;
    }

    /// GETs `path` and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let body = self.get_with_retry(&url).await?;

        serde_json::from_str(&body).map_err(ApiError::from)
    }

    async fn get_with_retry(&self, url: &str) -> ApiResult<String> {
        let mut attempt = 0;

        loop {
            match self.get(url).await {
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!("Request failed: {}. Retrying ({}/{})", err, attempt, self.retries);
                    self.backoff().await;
                }
                result => return result,
            }
        }
    }

    async fn get(&self, url: &str) -> ApiResult<String> {
        debug!("GET {}", url);

        let response = self.client.get(url).header("Accept", "application/json").send().await?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Service {
                status: status.as_u16(),
                message: service_message(status.as_u16(), &body),
            });
        }

        Ok(body)
    }

    /// Sleeps between retry attempts.
    async fn backoff(&self) {
        let jitter = if self.retry_jitter_ms > 0 {
            rand::rng().random_range(0..=self.retry_jitter_ms)
        } else {
            0
        };

        let total_delay = self.retry_delay_ms + jitter;
        if total_delay == 0 {
            return;
        }

        debug!("Backing off {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

/// Extracts the service's own message from an error body, if it sent one.
fn service_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("API request failed with status {}", status))
}

/// Skip offset for a zero-based page number.
fn skip(page: u32, limit: u32) -> u64 {
    u64::from(page) * u64::from(limit)
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_products(&self, page: u32, limit: u32) -> ApiResult<ProductPage> {
        let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
        let path = format!("/products?limit={}&skip={}", limit, skip(page, limit));

        info!("Listing products (page {})", page);
        self.get_json(&path).await
    }

    async fn list_categories(&self) -> ApiResult<Vec<String>> {
        info!("Listing categories");
        self.get_json("/products/category-list").await
    }

    async fn list_products_by_category(&self, category: &str) -> ApiResult<ProductPage> {
        let path = format!("/products/category/{}", urlencoding::encode(category));

        info!("Listing category: {}", category);
        self.get_json(&path).await
    }

    async fn search_products(&self, query: &str) -> ApiResult<ProductPage> {
        let path = format!("/products/search?q={}", urlencoding::encode(query));

        info!("Searching: {}", query);
        self.get_json(&path).await
    }

    async fn list_sorted_products(
        &self,
        sort_by: &str,
        order: SortOrder,
        page: u32,
        limit: u32,
    ) -> ApiResult<ProductPage> {
        let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
        let path = format!(
            "/products?sortBy={}&order={}&limit={}&skip={}",
            urlencoding::encode(sort_by),
            order,
            limit,
            skip(page, limit)
        );

        info!("Listing products sorted by {} {} (page {})", sort_by, order, page);
        self.get_json(&path).await
    }

    async fn get_product(&self, id: u64) -> ApiResult<Product> {
        let path = format!("/products/{}", id);

        info!("Fetching product: {}", id);
        self.get_json(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::GENERIC_ERROR;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config(base_url: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            retries: 0,
            retry_delay_ms: 0,
            retry_jitter_ms: 0,
            ..Config::default()
        }
    }

    fn page_body(ids: &[u64], total: u32) -> serde_json::Value {
        let products: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({ "id": id, "title": format!("Product {}", id) }))
            .collect();
        serde_json::json!({ "products": products, "total": total, "skip": 0, "limit": ids.len() })
    }

    #[test]
    fn test_skip_offset() {
        assert_eq!(skip(0, 20), 0);
        assert_eq!(skip(3, 20), 60);
        assert_eq!(skip(u32::MAX, u32::MAX), u64::from(u32::MAX) * u64::from(u32::MAX));
    }

    #[test]
    fn test_service_message() {
        assert_eq!(service_message(404, r#"{"message":"Not here"}"#), "Not here");
        assert_eq!(service_message(500, "<html>oops</html>"), "API request failed with status 500");
        assert_eq!(service_message(400, r#"{"message":""}"#), "API request failed with status 400");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = CatalogClient::new(&make_test_config("http://localhost/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost");
    }

    #[tokio::test]
    async fn test_list_products_pagination() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("limit", "20"))
            .and(query_param("skip", "40"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[41, 42], 194)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let page = client.list_products(2, 20).await.unwrap();

        assert_eq!(page.products.len(), 2);
        assert_eq!(page.products[0].id, 41);
        assert_eq!(page.total, 194);
    }

    #[tokio::test]
    async fn test_list_products_zero_limit_uses_default() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("limit", "20"))
            .and(query_param("skip", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[21], 194)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        assert!(client.list_products(1, 0).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_categories() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/category-list"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!(["beauty", "fragrances", "furniture"])),
            )
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let categories = client.list_categories().await.unwrap();

        assert_eq!(categories, vec!["beauty", "fragrances", "furniture"]);
    }

    #[tokio::test]
    async fn test_list_products_by_category() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/category/mens-shirts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[86, 87, 88], 3)))
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let page = client.list_products_by_category("mens-shirts").await.unwrap();

        assert_eq!(page.products.len(), 3);
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/search"))
            .and(query_param("q", "essential oil & more"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[1, 2, 3], 3)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let page = client.search_products("essential oil & more").await.unwrap();

        assert_eq!(page.products.len(), 3);
    }

    #[tokio::test]
    async fn test_sorted_products_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("sortBy", "price"))
            .and(query_param("order", "desc"))
            .and(query_param("limit", "10"))
            .and(query_param("skip", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[9], 194)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let page = client.list_sorted_products("price", SortOrder::Desc, 1, 10).await.unwrap();

        assert_eq!(page.products[0].id, 9);
    }

    #[tokio::test]
    async fn test_get_product_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": 42, "title": "Answer" })),
            )
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let product = client.get_product(42).await.unwrap();

        assert_eq!(product.id, 42);
        assert_eq!(product.title, "Answer");
    }

    #[tokio::test]
    async fn test_get_product_not_found_uses_service_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/42"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(
                    serde_json::json!({ "message": "Product with id '42' not found" }),
                ),
            )
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let err = client.get_product(42).await.unwrap_err();

        assert!(matches!(err, ApiError::Service { status: 404, .. }));
        assert_eq!(err.message(), "Product with id '42' not found");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/category-list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let err = client.list_categories().await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
        assert!(err.message().starts_with("Malformed response"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = CatalogClient::new(&make_test_config("http://127.0.0.1:1")).unwrap();
        let err = client.list_categories().await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!err.message().is_empty());
        assert_ne!(err.message(), GENERIC_ERROR);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/1"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        let err = client.get_product(1).await.unwrap_err();

        assert!(err.message().contains("503"));
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/1"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let mut client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        client.set_retries(2, 0, 0);

        assert!(client.get_product(1).await.is_err());
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = CatalogClient::new(&make_test_config(&mock_server.uri())).unwrap();
        client.set_retries(3, 0, 0);

        assert!(client.get_product(1).await.is_err());
    }
}
