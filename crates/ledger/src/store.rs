//! The `OrderLedger` trait.

use async_trait::async_trait;
use common::{OrderId, OwnerId};
use domain::{Order, ValidatedLine};

use crate::error::Result;

/// Durable store for order aggregates.
///
/// `persist` must be atomic: the header and every line become visible in
/// one local commit, or nothing does. Status transitions are guarded — an
/// order leaves `Pending` exactly once, to `Completed` or `Failed`.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Durably commits a new pending order with its validated lines and
    /// returns the stored aggregate, ID assigned.
    async fn persist(
        &self,
        owner_id: OwnerId,
        shipping_address: &str,
        lines: Vec<ValidatedLine>,
    ) -> Result<Order>;

    /// Loads an order by ID.
    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Transitions a pending order to `Completed`.
    async fn complete(&self, order_id: OrderId) -> Result<()>;

    /// Transitions a pending order to `Failed`, the durable record of a
    /// compensated reservation.
    async fn mark_failed(&self, order_id: OrderId) -> Result<()>;
}
