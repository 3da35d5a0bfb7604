//! Caller-visible order placement errors.

use collaborators::{Collaborator, CollaboratorError};
use common::OrderId;
use domain::{ProductId, RejectReason};
use ledger::LedgerError;
use thiserror::Error;

/// Everything a caller of `place_order` can observe besides a receipt.
///
/// Errors up to and including the ledger commit carry no durable trace;
/// `InventoryReservationFailed` is the one post-commit error, and the
/// persisted order's `Failed` status is its durable record.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The owner's cart had no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line failed validation; no partial orders are placed.
    #[error("line for product {product_id} rejected: {reason}")]
    LineRejected {
        product_id: ProductId,
        reason: RejectReason,
    },

    /// The payment collaborator declined the order total.
    #[error("payment declined")]
    PaymentDeclined,

    /// The local durable commit failed; no external state was touched.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Inventory could not be reserved after the order was committed.
    /// Applied deltas were compensated and the order marked failed.
    #[error("inventory reservation failed for order {order_id}")]
    InventoryReservationFailed { order_id: OrderId },

    /// A collaborator was unreachable or answered with an unexpected status.
    #[error("{which} collaborator unavailable")]
    CollaboratorUnavailable { which: Collaborator },
}

impl From<CollaboratorError> for OrderError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Unavailable { which, .. } => {
                OrderError::CollaboratorUnavailable { which }
            }
            CollaboratorError::ProductNotFound { product_id }
            | CollaboratorError::StockNotFound { product_id } => OrderError::LineRejected {
                product_id,
                reason: RejectReason::NotFound,
            },
            CollaboratorError::InsufficientStock { product_id } => OrderError::LineRejected {
                product_id,
                reason: RejectReason::InsufficientStock,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_keeps_collaborator_name() {
        let err: OrderError = CollaboratorError::Unavailable {
            which: Collaborator::Product,
            cause: "timeout".to_string(),
            uncertain: true,
        }
        .into();
        assert!(matches!(
            err,
            OrderError::CollaboratorUnavailable {
                which: Collaborator::Product
            }
        ));
    }

    #[test]
    fn test_not_found_becomes_line_rejection() {
        let err: OrderError = CollaboratorError::ProductNotFound {
            product_id: ProductId::new(7),
        }
        .into();
        assert!(matches!(
            err,
            OrderError::LineRejected {
                reason: RejectReason::NotFound,
                ..
            }
        ));
    }
}
