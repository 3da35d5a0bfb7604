//! The Order aggregate persisted by the ledger.

use common::{OrderId, OwnerId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::money::{Money, ProductId};

/// A cart line that passed validation, priced at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedLine {
    /// The product ordered.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price observed during validation, not the price at cart-add time.
    pub unit_price: Money,
}

impl ValidatedLine {
    /// Creates a validated line.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Lifecycle status of a persisted order.
///
/// Transitions:
/// ```text
/// Pending ──► Completed   (saga finalized)
/// Pending ──► Failed      (inventory reservation compensated)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Persisted, inventory not yet reserved.
    #[default]
    Pending,

    /// Inventory reserved; the order is final (terminal state).
    Completed,

    /// Reservation failed and was compensated (terminal state).
    Failed,
}

impl OrderStatus {
    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Completed => "Completed",
            OrderStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Completed" => Ok(OrderStatus::Completed),
            "Failed" => Ok(OrderStatus::Failed),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// The order aggregate: header plus validated lines.
///
/// Constructed by the orchestrator after validation succeeds and handed to
/// the ledger for the durable commit. `total_price` is derived from the
/// lines at construction, so the sum invariant holds for every instance.
/// After persist, the ledger is the system of record and the only further
/// writes are explicit status transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Ledger-assigned identifier.
    pub id: OrderId,
    /// The identity the order belongs to.
    pub owner_id: OwnerId,
    /// Sum of unit_price * quantity over all lines.
    pub total_price: Money,
    /// Caller-supplied shipping address.
    pub shipping_address: String,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// The validated lines, in cart order.
    pub lines: Vec<ValidatedLine>,
}

impl Order {
    /// Builds a new pending order from validated lines.
    ///
    /// Fails if `lines` is empty or any line has zero quantity.
    pub fn new(
        id: OrderId,
        owner_id: OwnerId,
        shipping_address: impl Into<String>,
        lines: Vec<ValidatedLine>,
    ) -> Result<Self, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::NoLines);
        }
        if let Some(line) = lines.iter().find(|l| l.quantity == 0) {
            return Err(DomainError::ZeroQuantity {
                product_id: line.product_id.as_i64(),
            });
        }

        let total_price = lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.total_price());

        Ok(Self {
            id,
            owner_id,
            total_price,
            shipping_address: shipping_address.into(),
            status: OrderStatus::Pending,
            lines,
        })
    }

    /// Transitions the order to `Completed`. Only valid from `Pending`.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition(OrderStatus::Completed)
    }

    /// Transitions the order to `Failed`. Only valid from `Pending`.
    pub fn mark_failed(&mut self) -> Result<(), DomainError> {
        self.transition(OrderStatus::Failed)
    }

    fn transition(&mut self, to: OrderStatus) -> Result<(), DomainError> {
        if self.status != OrderStatus::Pending {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
