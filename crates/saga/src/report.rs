//! The caller-visible result of a successful order placement.

use common::OrderId;
use domain::{Money, Order, ValidatedLine};
use serde::{Deserialize, Serialize};

/// What a caller receives when `place_order` succeeds.
///
/// `cart_clear_warning` surfaces a failed cart clear without failing the
/// order: a stale cart is a nuisance, not a correctness problem, and is
/// deliberately not compensated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// The ledger-assigned order ID.
    pub order_id: OrderId,
    /// Total at validation-time prices.
    pub total_price: Money,
    /// The lines the order was placed with.
    pub lines: Vec<ValidatedLine>,
    /// True if the cart could not be cleared after the order completed.
    pub cart_clear_warning: bool,
}

impl OrderReceipt {
    /// Builds a receipt from a finalized order.
    pub fn from_order(order: &Order, cart_clear_warning: bool) -> Self {
        Self {
            order_id: order.id,
            total_price: order.total_price,
            lines: order.lines.clone(),
            cart_clear_warning,
        }
    }
}
