//! Product collaborator client.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{Money, ProductId};
use serde::Deserialize;

use crate::config::CollaboratorConfig;
use crate::error::{Collaborator, CollaboratorError, Result};

/// Authoritative product data at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductInfo {
    /// Current unit price.
    pub price: Money,
}

/// Trait for product catalog lookups.
#[async_trait]
pub trait ProductClient: Send + Sync {
    /// Fetches the current price for a product. A product the catalog does
    /// not know is `ProductNotFound`, not a default price.
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductInfo>;
}

#[derive(Deserialize)]
struct ProductPayload {
    price: i64,
}

/// HTTP client for the product service.
#[derive(Clone)]
pub struct HttpProductClient {
    http: reqwest::Client,
    base_url: String,
    timeout: std::time::Duration,
}

impl HttpProductClient {
    /// Creates a product client from the collaborator config.
    pub fn new(config: &CollaboratorConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.product_base_url.clone(),
            timeout: config.call_timeout,
        }
    }
}

#[async_trait]
impl ProductClient for HttpProductClient {
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductInfo> {
        let url = format!("{}/products/{}", self.base_url, product_id);
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CollaboratorError::from_transport(Collaborator::Product, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CollaboratorError::ProductNotFound { product_id });
        }
        if !response.status().is_success() {
            return Err(CollaboratorError::from_status(
                Collaborator::Product,
                response.status(),
            ));
        }

        let payload: ProductPayload = response
            .json()
            .await
            .map_err(|e| CollaboratorError::from_transport(Collaborator::Product, e))?;

        Ok(ProductInfo {
            price: Money::from_cents(payload.price),
        })
    }
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    prices: HashMap<ProductId, Money>,
    fail_on_fetch: bool,
}

/// In-memory product client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductClient {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductClient {
    /// Creates a new in-memory product client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or updates) a product's current price.
    pub fn set_price(&self, product_id: impl Into<ProductId>, price: Money) {
        self.state
            .write()
            .unwrap()
            .prices
            .insert(product_id.into(), price);
    }

    /// Configures fetch calls to fail as unavailable.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }
}

#[async_trait]
impl ProductClient for InMemoryProductClient {
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductInfo> {
        let state = self.state.read().unwrap();
        if state.fail_on_fetch {
            return Err(CollaboratorError::Unavailable {
                which: Collaborator::Product,
                cause: "injected failure".to_string(),
                uncertain: false,
            });
        }
        state
            .prices
            .get(&product_id)
            .map(|&price| ProductInfo { price })
            .ok_or(CollaboratorError::ProductNotFound { product_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_current_price() {
        let client = InMemoryProductClient::new();
        client.set_price(7, Money::from_cents(1000));

        let info = client.fetch_product(ProductId::new(7)).await.unwrap();
        assert_eq!(info.price, Money::from_cents(1000));
    }

    #[tokio::test]
    async fn test_price_update_is_visible() {
        let client = InMemoryProductClient::new();
        client.set_price(7, Money::from_cents(1000));
        client.set_price(7, Money::from_cents(1200));

        let info = client.fetch_product(ProductId::new(7)).await.unwrap();
        assert_eq!(info.price, Money::from_cents(1200));
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let client = InMemoryProductClient::new();
        let result = client.fetch_product(ProductId::new(99)).await;
        assert!(matches!(
            result,
            Err(CollaboratorError::ProductNotFound { .. })
        ));
    }
}
