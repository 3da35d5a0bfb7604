//! Per-line validation outcomes.

use serde::{Deserialize, Serialize};

use crate::money::{Money, ProductId};

/// Why a cart line was rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The product no longer exists in the catalog.
    NotFound,
    /// Requested quantity exceeds available stock.
    InsufficientStock,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NotFound => write!(f, "product not found"),
            RejectReason::InsufficientStock => write!(f, "insufficient stock"),
        }
    }
}

/// The outcome of validating a single cart line.
///
/// An accepted line carries the unit price observed at validation time,
/// which is the price the order will be placed at regardless of what the
/// cart saw earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    /// The line passed validation at the given current unit price.
    Accepted(Money),
    /// The line failed validation.
    Rejected {
        product_id: ProductId,
        reason: RejectReason,
    },
}

impl ValidationOutcome {
    /// Returns true if the line was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }
}
