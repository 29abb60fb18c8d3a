use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn, Instrument};

use crate::models::{LookupError, LookupResult, Product, ProductId, Stock};
use crate::observability::Metrics;

/// Trait defining the read-only product and stock lookup
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch title, price and image for a product
    async fn find_product(&self, product_id: ProductId) -> LookupResult<Product>;

    /// Fetch the available quantity for a product
    async fn find_stock(&self, product_id: ProductId) -> LookupResult<Stock>;
}

/// REST implementation of the ProductLookup trait.
///
/// Talks to `GET {base}/products/{id}` and `GET {base}/stock/{id}`.
pub struct HttpProductLookup {
    client: Client,
    base_url: Url,
    metrics: Option<Arc<Metrics>>,
}

impl HttpProductLookup {
    /// Create a lookup client with its own reqwest client and request timeout
    pub fn new(base_url: &str, timeout: Duration) -> LookupResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create a lookup client around an existing reqwest client
    pub fn with_client(client: Client, base_url: &str) -> LookupResult<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, product_id: ProductId) -> LookupResult<Url> {
        self.base_url
            .join(&format!("{}/{}", resource, product_id))
            .map_err(|e| LookupError::InvalidUrl {
                message: e.to_string(),
            })
    }

    /// Create a client span for an outgoing lookup request
    fn create_http_span(&self, resource: &str, url: &Url) -> tracing::Span {
        tracing::info_span!(
            "ProductLookup",
            "otel.kind" = "client",
            "otel.name" = format!("GET /{}/{{id}}", resource),
            "http.method" = "GET",
            "http.url" = %url,
            "http.status_code" = tracing::field::Empty,
            "component" = "reqwest",
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        product_id: ProductId,
    ) -> LookupResult<T> {
        let url = self.endpoint(resource, product_id)?;
        let span = self.create_http_span(resource, &url);
        let started = Instant::now();

        let result = async {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());

            if status == StatusCode::NOT_FOUND {
                return Err(LookupError::NotFound {
                    path: url.path().to_string(),
                });
            }
            if !status.is_success() {
                return Err(LookupError::Status {
                    status: status.as_u16(),
                    path: url.path().to_string(),
                });
            }

            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|source| LookupError::Decode {
                path: url.path().to_string(),
                source,
            })
        }
        .instrument(span)
        .await;

        if let Some(metrics) = &self.metrics {
            metrics.record_lookup(resource, result.is_ok(), started.elapsed().as_secs_f64());
        }

        result
    }
}

#[async_trait]
impl ProductLookup for HttpProductLookup {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn find_product(&self, product_id: ProductId) -> LookupResult<Product> {
        debug!("Fetching product details");

        match self.get_json::<Product>("products", product_id).await {
            Ok(product) => {
                info!(title = %product.title, "Product details fetched");
                Ok(product)
            }
            Err(e) => {
                warn!("Product lookup failed: {}", e);
                Err(e)
            }
        }
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn find_stock(&self, product_id: ProductId) -> LookupResult<Stock> {
        debug!("Fetching stock");

        match self.get_json::<Stock>("stock", product_id).await {
            Ok(stock) => {
                info!(available = stock.amount, "Stock fetched");
                Ok(stock)
            }
            Err(e) => {
                warn!("Stock lookup failed: {}", e);
                Err(e)
            }
        }
    }
}

/// Parse the base URL and make sure relative joins append to its path
fn normalize_base_url(base_url: &str) -> LookupResult<Url> {
    let mut url = Url::parse(base_url).map_err(|e| LookupError::InvalidUrl {
        message: format!("{}: {}", base_url, e),
    })?;

    if url.cannot_be_a_base() {
        return Err(LookupError::InvalidUrl {
            message: format!("{}: cannot be used as a base URL", base_url),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
