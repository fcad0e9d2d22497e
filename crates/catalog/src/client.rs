use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use vitrine_core::{Product, ProductId};

use crate::error::CatalogError;

/// Request timeout for catalog calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only view of the remote catalog.
///
/// The production implementation is [`CatalogClient`]; the load
/// orchestration and tests accept `dyn CatalogApi` so fakes can stand in.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError>;
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError>;
    async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError>;
    async fn fetch_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogError>;
}

/// HTTP client for the catalog REST endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Build a client for the catalog at `base_url` (no trailing slash
    /// required; one is stripped if present).
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the JSON body.
    async fn get_json<T>(&self, path: &str) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let body = self.get_text(path).await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// GET `path` and return the raw body of a successful response.
    async fn get_text(&self, path: &str) -> Result<String, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "catalog request");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), body));
        }

        resp.text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.get_json("/products").await
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        // The catalog answers a missing id with 404 or with an empty 200
        // body, depending on deployment; both map to NotFound.
        match self.get_text(&format!("/products/{id}")).await {
            Ok(body) => {
                let body = body.trim();
                if body.is_empty() || body == "null" {
                    return Err(CatalogError::NotFound);
                }
                serde_json::from_str(body).map_err(|e| CatalogError::Parse(e.to_string()))
            }
            Err(CatalogError::Api(404, _)) => Err(CatalogError::NotFound),
            Err(err) => Err(err),
        }
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        self.get_json("/products/categories").await
    }

    async fn fetch_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        self.get_json(&format!("/products/category/{category}")).await
    }
}
