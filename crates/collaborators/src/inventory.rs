//! Inventory collaborator client.
//!
//! Stock mutation is a signed delta-apply, never a set-absolute. That makes
//! the compensating call (equal and opposite delta) well-defined even when
//! the forward call's outcome is uncertain.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::ProductId;
use serde::{Deserialize, Serialize};

use crate::config::CollaboratorConfig;
use crate::error::{Collaborator, CollaboratorError, Result};

/// Current stock for a product at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    /// Units available.
    pub quantity: u32,
}

/// Trait for inventory operations.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Fetches the available stock for a product. A product the inventory
    /// does not track is `StockNotFound`, never "zero stock".
    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockLevel>;

    /// Applies a signed stock delta. Negative deltas reserve stock and may
    /// be rejected with `InsufficientStock`; positive deltas release it.
    async fn adjust_stock(&self, product_id: ProductId, delta: i64) -> Result<()>;
}

#[derive(Deserialize)]
struct StockPayload {
    quantity: u32,
}

#[derive(Serialize)]
struct AdjustPayload {
    product_id: i64,
    change_quantity: i64,
}

/// HTTP client for the inventory service.
#[derive(Clone)]
pub struct HttpInventoryClient {
    http: reqwest::Client,
    base_url: String,
    timeout: std::time::Duration,
}

impl HttpInventoryClient {
    /// Creates an inventory client from the collaborator config.
    pub fn new(config: &CollaboratorConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.inventory_base_url.clone(),
            timeout: config.call_timeout,
        }
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockLevel> {
        let url = format!("{}/inventory/{}", self.base_url, product_id);
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CollaboratorError::from_transport(Collaborator::Inventory, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CollaboratorError::StockNotFound { product_id });
        }
        if !response.status().is_success() {
            return Err(CollaboratorError::from_status(
                Collaborator::Inventory,
                response.status(),
            ));
        }

        let payload: StockPayload = response
            .json()
            .await
            .map_err(|e| CollaboratorError::from_transport(Collaborator::Inventory, e))?;

        Ok(StockLevel {
            quantity: payload.quantity,
        })
    }

    async fn adjust_stock(&self, product_id: ProductId, delta: i64) -> Result<()> {
        let url = format!("{}/inventory/update", self.base_url);
        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&AdjustPayload {
                product_id: product_id.as_i64(),
                change_quantity: delta,
            })
            .send()
            .await
            .map_err(|e| CollaboratorError::from_transport(Collaborator::Inventory, e))?;

        // The inventory service rejects reservations it cannot cover.
        if delta < 0
            && (response.status() == reqwest::StatusCode::BAD_REQUEST
                || response.status() == reqwest::StatusCode::CONFLICT)
        {
            return Err(CollaboratorError::InsufficientStock { product_id });
        }
        if !response.status().is_success() {
            return Err(CollaboratorError::from_status(
                Collaborator::Inventory,
                response.status(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    stock: HashMap<ProductId, i64>,
    applied: Vec<(ProductId, i64)>,
    fail_on_adjust: bool,
    fail_on_adjust_for: Option<ProductId>,
    fail_on_release: bool,
    fail_uncertain: bool,
}

/// In-memory inventory client for testing.
///
/// Failure injection mirrors the two ways a real adjust can go wrong:
/// a definitive rejection (nothing applied) and an uncertain transport
/// failure where the delta actually landed server-side.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryClient {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryClient {
    /// Creates a new in-memory inventory client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the absolute stock level for a product.
    pub fn set_stock(&self, product_id: impl Into<ProductId>, quantity: i64) {
        self.state
            .write()
            .unwrap()
            .stock
            .insert(product_id.into(), quantity);
    }

    /// Returns the current stock level for a product, if tracked.
    pub fn stock(&self, product_id: impl Into<ProductId>) -> Option<i64> {
        self.state
            .read()
            .unwrap()
            .stock
            .get(&product_id.into())
            .copied()
    }

    /// Returns every delta that actually landed, in call order.
    pub fn applied_adjustments(&self) -> Vec<(ProductId, i64)> {
        self.state.read().unwrap().applied.clone()
    }

    /// Configures every adjust call to fail.
    pub fn set_fail_on_adjust(&self, fail: bool) {
        self.state.write().unwrap().fail_on_adjust = fail;
    }

    /// Configures adjust calls for one product to fail, leaving others alone.
    pub fn set_fail_on_adjust_for(&self, product_id: Option<ProductId>) {
        self.state.write().unwrap().fail_on_adjust_for = product_id;
    }

    /// Configures positive-delta (release) calls to fail while reservations
    /// keep working, so a reversal can be broken independently of the
    /// forward call it undoes.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.state.write().unwrap().fail_on_release = fail;
    }

    /// When set, injected adjust failures apply the delta before reporting
    /// an uncertain `Unavailable`, simulating a timeout whose request landed.
    pub fn set_fail_uncertain(&self, uncertain: bool) {
        self.state.write().unwrap().fail_uncertain = uncertain;
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventoryClient {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockLevel> {
        let state = self.state.read().unwrap();
        match state.stock.get(&product_id) {
            Some(&quantity) => Ok(StockLevel {
                quantity: quantity.max(0) as u32,
            }),
            None => Err(CollaboratorError::StockNotFound { product_id }),
        }
    }

    async fn adjust_stock(&self, product_id: ProductId, delta: i64) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if delta > 0 && state.fail_on_release {
            return Err(CollaboratorError::Unavailable {
                which: Collaborator::Inventory,
                cause: "injected failure".to_string(),
                uncertain: false,
            });
        }

        let injected =
            state.fail_on_adjust || state.fail_on_adjust_for == Some(product_id);
        if injected && !state.fail_uncertain {
            return Err(CollaboratorError::Unavailable {
                which: Collaborator::Inventory,
                cause: "injected failure".to_string(),
                uncertain: false,
            });
        }

        let current = state.stock.get(&product_id).copied().unwrap_or(0);
        if delta < 0 && current + delta < 0 {
            return Err(CollaboratorError::InsufficientStock { product_id });
        }
        state.stock.insert(product_id, current + delta);
        state.applied.push((product_id, delta));

        if injected {
            // Delta landed, but the caller sees a transport failure.
            return Err(CollaboratorError::Unavailable {
                which: Collaborator::Inventory,
                cause: "injected timeout".to_string(),
                uncertain: true,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_stock() {
        let client = InMemoryInventoryClient::new();
        client.set_stock(7, 5);

        let level = client.fetch_stock(ProductId::new(7)).await.unwrap();
        assert_eq!(level.quantity, 5);
    }

    #[tokio::test]
    async fn test_untracked_product_is_not_found() {
        let client = InMemoryInventoryClient::new();
        let result = client.fetch_stock(ProductId::new(99)).await;
        assert!(matches!(
            result,
            Err(CollaboratorError::StockNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delta_apply_and_reverse() {
        let client = InMemoryInventoryClient::new();
        client.set_stock(7, 5);

        client.adjust_stock(ProductId::new(7), -2).await.unwrap();
        assert_eq!(client.stock(7), Some(3));

        client.adjust_stock(ProductId::new(7), 2).await.unwrap();
        assert_eq!(client.stock(7), Some(5));
    }

    #[tokio::test]
    async fn test_reservation_beyond_stock_rejected() {
        let client = InMemoryInventoryClient::new();
        client.set_stock(7, 1);

        let result = client.adjust_stock(ProductId::new(7), -2).await;
        assert!(matches!(
            result,
            Err(CollaboratorError::InsufficientStock { .. })
        ));
        // Rejection is definitive: nothing applied.
        assert_eq!(client.stock(7), Some(1));
        assert!(client.applied_adjustments().is_empty());
    }

    #[tokio::test]
    async fn test_release_failure_leaves_reservation_in_place() {
        let client = InMemoryInventoryClient::new();
        client.set_stock(7, 5);
        client.adjust_stock(ProductId::new(7), -2).await.unwrap();
        client.set_fail_on_release(true);

        let result = client.adjust_stock(ProductId::new(7), 2).await;
        assert!(matches!(result, Err(CollaboratorError::Unavailable { .. })));
        assert_eq!(client.stock(7), Some(3));

        // Reservations still work while releases are broken.
        client.adjust_stock(ProductId::new(7), -1).await.unwrap();
        assert_eq!(client.stock(7), Some(2));
    }

    #[tokio::test]
    async fn test_uncertain_failure_applies_delta() {
        let client = InMemoryInventoryClient::new();
        client.set_stock(7, 5);
        client.set_fail_on_adjust(true);
        client.set_fail_uncertain(true);

        let err = client.adjust_stock(ProductId::new(7), -2).await.unwrap_err();
        assert!(err.is_uncertain());
        assert_eq!(client.stock(7), Some(3));
    }
}
