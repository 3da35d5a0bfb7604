//! Ledger error types.

use common::OrderId;
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No order exists with the given ID.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Domain invariant violation (empty lines, bad status transition).
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back to the domain model.
    #[error("corrupt ledger row for order {order_id}: {detail}")]
    CorruptRow { order_id: OrderId, detail: String },
}

/// Convenience type alias for ledger results.
pub type Result<T> = std::result::Result<T, LedgerError>;
