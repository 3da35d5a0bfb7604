//! Collaborator error types.

use domain::ProductId;
use thiserror::Error;

/// Which collaborator an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    Cart,
    Product,
    Inventory,
    Payment,
}

impl Collaborator {
    /// Returns the collaborator name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collaborator::Cart => "cart",
            Collaborator::Product => "product",
            Collaborator::Inventory => "inventory",
            Collaborator::Payment => "payment",
        }
    }
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised by collaborator clients.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Transport failure or unexpected status from a collaborator.
    ///
    /// `uncertain` is true when the request may have taken effect on the
    /// server side (timeout, connection dropped mid-flight). The
    /// orchestrator uses it to decide whether a compensation needs a
    /// reconciliation log entry.
    #[error("{which} collaborator unavailable: {cause}")]
    Unavailable {
        which: Collaborator,
        cause: String,
        uncertain: bool,
    },

    /// The product does not exist in the catalog.
    #[error("product {product_id} not found")]
    ProductNotFound { product_id: ProductId },

    /// No stock record exists for the product.
    #[error("no stock record for product {product_id}")]
    StockNotFound { product_id: ProductId },

    /// A negative stock delta was rejected for lack of stock.
    #[error("insufficient stock for product {product_id}")]
    InsufficientStock { product_id: ProductId },
}

impl CollaboratorError {
    /// True if the call's server-side effect is unknown.
    pub fn is_uncertain(&self) -> bool {
        matches!(
            self,
            CollaboratorError::Unavailable {
                uncertain: true,
                ..
            }
        )
    }

    pub(crate) fn from_transport(which: Collaborator, err: reqwest::Error) -> Self {
        // A timeout or a mid-request failure leaves the server-side outcome
        // unknown; a connect error means the request never went out.
        let uncertain = err.is_timeout() || !err.is_connect();
        CollaboratorError::Unavailable {
            which,
            cause: err.to_string(),
            uncertain,
        }
    }

    pub(crate) fn from_status(which: Collaborator, status: reqwest::StatusCode) -> Self {
        CollaboratorError::Unavailable {
            which,
            cause: format!("unexpected status {status}"),
            uncertain: false,
        }
    }
}

/// Convenience type alias for collaborator call results.
pub type Result<T> = std::result::Result<T, CollaboratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncertain_flag() {
        let err = CollaboratorError::Unavailable {
            which: Collaborator::Inventory,
            cause: "timeout".to_string(),
            uncertain: true,
        };
        assert!(err.is_uncertain());

        let err = CollaboratorError::ProductNotFound {
            product_id: ProductId::new(7),
        };
        assert!(!err.is_uncertain());
    }

    #[test]
    fn test_display_names_collaborator() {
        let err = CollaboratorError::Unavailable {
            which: Collaborator::Cart,
            cause: "connection refused".to_string(),
            uncertain: false,
        };
        assert!(err.to_string().contains("cart"));
    }
}
