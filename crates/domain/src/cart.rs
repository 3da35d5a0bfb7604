//! Read-only cart view fetched from the cart collaborator.

use common::OwnerId;
use serde::{Deserialize, Serialize};

use crate::money::ProductId;

/// One line of a cart: a product and the quantity the owner wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product to order.
    pub product_id: ProductId,
    /// Quantity requested.
    pub quantity: u32,
}

impl CartLine {
    /// Creates a new cart line.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Snapshot of an owner's cart at saga start.
///
/// The cart collaborator owns this data; the snapshot is read-only input to
/// validation and is never mutated locally. Prices are deliberately absent:
/// the price that goes on the order is the one observed at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// The identity that owns the cart.
    pub owner_id: OwnerId,
    /// Cart lines in the order the collaborator returned them.
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Creates a snapshot for an owner with the given lines.
    pub fn new(owner_id: OwnerId, lines: Vec<CartLine>) -> Self {
        Self { owner_id, lines }
    }

    /// Creates an empty snapshot, the valid state for an owner with no cart.
    pub fn empty(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            lines: Vec::new(),
        }
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
