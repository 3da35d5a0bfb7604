//! Domain error types.

use thiserror::Error;

use crate::order::OrderStatus;

/// Errors raised by the domain model itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// An order must have at least one validated line.
    #[error("order must contain at least one line")]
    NoLines,

    /// A line quantity of zero is never valid.
    #[error("line for product {product_id} has zero quantity")]
    ZeroQuantity { product_id: i64 },

    /// Status transition not allowed from the current status.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
}
