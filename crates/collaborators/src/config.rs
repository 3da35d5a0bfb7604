//! Collaborator endpoint configuration.

use std::time::Duration;

/// Addresses and timeout for all collaborator calls.
///
/// Constructed explicitly by the composition root and threaded into each
/// client at construction. Business logic never reads the environment.
#[derive(Debug, Clone)]
pub struct CollaboratorConfig {
    /// Base URL of the cart service, e.g. `http://cart:8000`.
    pub cart_base_url: String,
    /// Base URL of the product service.
    pub product_base_url: String,
    /// Base URL of the inventory service.
    pub inventory_base_url: String,
    /// Timeout applied to every individual collaborator call.
    pub call_timeout: Duration,
}

impl CollaboratorConfig {
    /// Default per-call timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a config with the default timeout.
    pub fn new(
        cart_base_url: impl Into<String>,
        product_base_url: impl Into<String>,
        inventory_base_url: impl Into<String>,
    ) -> Self {
        Self {
            cart_base_url: cart_base_url.into(),
            product_base_url: product_base_url.into(),
            inventory_base_url: inventory_base_url.into(),
            call_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}
