//! Remote catalog source.
//!
//! A single GET to the configured endpoint returns a JSON list of products.
//! A successful fetch replaces the session's catalog wholesale; it is never
//! merged with the static records. Responses are cached with `moka` so that
//! repeated fetches within the TTL do not hit the endpoint again.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use oud_cart_core::{ProductId, ProductRecord};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::markup::PriceText;
use super::{Catalog, CatalogError};

/// One product as returned by the remote endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRecord {
    /// Records without an id are numbered by position, starting at 1.
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: PriceText,
}

impl RemoteRecord {
    fn into_product(self, position: usize) -> ProductRecord {
        let fallback_id = i64::try_from(position + 1).unwrap_or(i64::MAX);
        ProductRecord {
            id: self.id.unwrap_or(ProductId::new(fallback_id)),
            name: self.name,
            unit_price: self.price.to_price(),
            image: self.image,
            description: self.description.unwrap_or_default(),
        }
    }
}

/// Build a catalog from a remote JSON document.
///
/// # Errors
///
/// Returns `CatalogError::Parse` if the document is not a list of records.
pub fn parse_remote(json: &str) -> Result<Catalog, CatalogError> {
    let records: Vec<RemoteRecord> = serde_json::from_str(json)?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(position, record)| record.into_product(position))
        .collect())
}

/// Client for the remote catalog endpoint.
#[derive(Clone)]
pub struct RemoteCatalogClient {
    inner: Arc<RemoteCatalogClientInner>,
}

struct RemoteCatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<String, Catalog>,
}

impl RemoteCatalogClient {
    /// Create a client for `endpoint`, caching results for `ttl`.
    #[must_use]
    pub fn new(endpoint: Url, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();

        Self {
            inner: Arc::new(RemoteCatalogClientInner {
                client: reqwest::Client::new(),
                endpoint,
                cache,
            }),
        }
    }

    /// The endpoint this client fetches from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails, the endpoint answers with
    /// a non-success status, or the body is not a list of products.
    #[instrument(skip(self), fields(endpoint = %self.endpoint()))]
    pub async fn fetch(&self) -> Result<Catalog, CatalogError> {
        let cache_key = self.endpoint().to_string();

        if let Some(catalog) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for remote catalog");
            return Ok(catalog);
        }

        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Catalog endpoint returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let catalog = parse_remote(&body)?;
        debug!(products = catalog.len(), "Remote catalog fetched");

        self.inner.cache.insert(cache_key, catalog.clone()).await;

        Ok(catalog)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use oud_cart_core::Price;

    use super::*;

    const BODY: &str = r#"[
        {"name": "Amber Oud", "image": "amber.jpg", "description": "Warm amber", "price": 500},
        {"name": "Fresh Lime", "image": "lime.jpg", "price": "275 ج.م"},
        {"id": 10, "name": "Velvet Rose", "image": "rose.jpg", "price": 640.5}
    ]"#;

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api.php")).unwrap()
    }

    #[test]
    fn test_parse_numbers_records_by_position() {
        let catalog = parse_remote(BODY).unwrap();
        let ids: Vec<i64> = catalog.iter().map(|r| r.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 10]);

        let lime = catalog.get(ProductId::new(2)).unwrap();
        assert_eq!(lime.unit_price, Price::from_units(275));
        assert_eq!(lime.description, "");
        assert_eq!(
            catalog.get(ProductId::new(10)).unwrap().unit_price,
            Price::from_text("640.5")
        );
    }

    #[test]
    fn test_parse_rejects_records_without_name() {
        assert!(matches!(
            parse_remote(r#"[{"price": 1}]"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_and_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/api.php",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    BODY
                }
            }),
        );
        let client = RemoteCatalogClient::new(serve(router).await, Duration::from_secs(60));
        assert_eq!(client.endpoint().path(), "/api.php");

        let first = client.fetch().await.unwrap();
        let second = client.fetch().await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let router = Router::new().route(
            "/api.php",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = RemoteCatalogClient::new(serve(router).await, Duration::from_secs(60));
        assert!(matches!(
            client.fetch().await,
            Err(CatalogError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let router = Router::new().route("/api.php", get(|| async { "<html>" }));
        let client = RemoteCatalogClient::new(serve(router).await, Duration::from_secs(60));
        assert!(matches!(client.fetch().await, Err(CatalogError::Parse(_))));
    }
}
