//! Cart collaborator client.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OwnerId;
use domain::{CartLine, CartSnapshot};
use serde::Deserialize;

use crate::config::CollaboratorConfig;
use crate::error::{Collaborator, CollaboratorError, Result};

/// Trait for cart collaborator operations.
#[async_trait]
pub trait CartClient: Send + Sync {
    /// Fetches the owner's cart. An owner with no cart gets an empty
    /// snapshot; that is a valid state, distinct from the service being down.
    async fn fetch_cart(&self, owner_id: OwnerId) -> Result<CartSnapshot>;

    /// Deletes the owner's cart after a successful order.
    async fn clear_cart(&self, owner_id: OwnerId) -> Result<()>;
}

#[derive(Deserialize)]
struct CartPayload {
    #[serde(default)]
    items: Vec<CartItemPayload>,
}

#[derive(Deserialize)]
struct CartItemPayload {
    product_id: i64,
    quantity: u32,
}

/// HTTP client for the cart service.
#[derive(Clone)]
pub struct HttpCartClient {
    http: reqwest::Client,
    base_url: String,
    timeout: std::time::Duration,
}

impl HttpCartClient {
    /// Creates a cart client from the collaborator config.
    pub fn new(config: &CollaboratorConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.cart_base_url.clone(),
            timeout: config.call_timeout,
        }
    }
}

#[async_trait]
impl CartClient for HttpCartClient {
    async fn fetch_cart(&self, owner_id: OwnerId) -> Result<CartSnapshot> {
        let url = format!("{}/cart/{}", self.base_url, owner_id);
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CollaboratorError::from_transport(Collaborator::Cart, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(CartSnapshot::empty(owner_id));
        }
        if !response.status().is_success() {
            return Err(CollaboratorError::from_status(
                Collaborator::Cart,
                response.status(),
            ));
        }

        let payload: CartPayload = response
            .json()
            .await
            .map_err(|e| CollaboratorError::from_transport(Collaborator::Cart, e))?;

        let lines = payload
            .items
            .into_iter()
            .map(|item| CartLine::new(item.product_id, item.quantity))
            .collect();
        Ok(CartSnapshot::new(owner_id, lines))
    }

    async fn clear_cart(&self, owner_id: OwnerId) -> Result<()> {
        let url = format!("{}/cart/{}", self.base_url, owner_id);
        let response = self
            .http
            .delete(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CollaboratorError::from_transport(Collaborator::Cart, e))?;

        if !response.status().is_success() {
            return Err(CollaboratorError::from_status(
                Collaborator::Cart,
                response.status(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    carts: HashMap<OwnerId, Vec<CartLine>>,
    fail_on_fetch: bool,
    fail_on_clear: bool,
}

/// In-memory cart client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartClient {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartClient {
    /// Creates a new in-memory cart client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the owner's cart contents.
    pub fn set_cart(&self, owner_id: OwnerId, lines: Vec<CartLine>) {
        self.state.write().unwrap().carts.insert(owner_id, lines);
    }

    /// Returns the owner's current cart lines, if any.
    pub fn cart_lines(&self, owner_id: OwnerId) -> Option<Vec<CartLine>> {
        self.state.read().unwrap().carts.get(&owner_id).cloned()
    }

    /// Configures fetch calls to fail as unavailable.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Configures clear calls to fail as unavailable.
    pub fn set_fail_on_clear(&self, fail: bool) {
        self.state.write().unwrap().fail_on_clear = fail;
    }
}

#[async_trait]
impl CartClient for InMemoryCartClient {
    async fn fetch_cart(&self, owner_id: OwnerId) -> Result<CartSnapshot> {
        let state = self.state.read().unwrap();
        if state.fail_on_fetch {
            return Err(CollaboratorError::Unavailable {
                which: Collaborator::Cart,
                cause: "injected failure".to_string(),
                uncertain: false,
            });
        }
        match state.carts.get(&owner_id) {
            Some(lines) => Ok(CartSnapshot::new(owner_id, lines.clone())),
            None => Ok(CartSnapshot::empty(owner_id)),
        }
    }

    async fn clear_cart(&self, owner_id: OwnerId) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_clear {
            return Err(CollaboratorError::Unavailable {
                which: Collaborator::Cart,
                cause: "injected failure".to_string(),
                uncertain: false,
            });
        }
        state.carts.remove(&owner_id);
        Ok(())
    }
}
