//! In-memory ledger implementation for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, OwnerId};
use domain::{Order, OrderStatus, ValidatedLine};
use tokio::sync::RwLock;

use crate::error::{LedgerError, Result};
use crate::store::OrderLedger;

#[derive(Default)]
struct InMemoryLedgerState {
    orders: HashMap<OrderId, Order>,
    fail_on_persist: bool,
    fail_on_transition: bool,
}

/// In-memory ledger with the same interface as the PostgreSQL
/// implementation. A single write lock stands in for the local transaction.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<InMemoryLedgerState>>,
}

impl InMemoryLedger {
    /// Creates a new empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Configures persist calls to fail, simulating a constraint violation.
    pub async fn set_fail_on_persist(&self, fail: bool) {
        self.state.write().await.fail_on_persist = fail;
    }

    /// Configures status transitions to fail, simulating a store that went
    /// away between the commit and the final status write.
    pub async fn set_fail_on_transition(&self, fail: bool) {
        self.state.write().await.fail_on_transition = fail;
    }

    /// Returns every order with the given status.
    pub async fn orders_with_status(&self, status: OrderStatus) -> Vec<Order> {
        self.state
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl OrderLedger for InMemoryLedger {
    async fn persist(
        &self,
        owner_id: OwnerId,
        shipping_address: &str,
        lines: Vec<ValidatedLine>,
    ) -> Result<Order> {
        let mut state = self.state.write().await;
        if state.fail_on_persist {
            return Err(LedgerError::Database(sqlx::Error::PoolClosed));
        }

        let order = Order::new(OrderId::new(), owner_id, shipping_address, lines)?;
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(&order_id).cloned())
    }

    async fn complete(&self, order_id: OrderId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_transition {
            return Err(LedgerError::Database(sqlx::Error::PoolClosed));
        }
        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or(LedgerError::OrderNotFound(order_id))?;
        order.complete()?;
        Ok(())
    }

    async fn mark_failed(&self, order_id: OrderId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_transition {
            return Err(LedgerError::Database(sqlx::Error::PoolClosed));
        }
        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or(LedgerError::OrderNotFound(order_id))?;
        order.mark_failed()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Money;

    fn lines() -> Vec<ValidatedLine> {
        vec![
            ValidatedLine::new(1, 2, Money::from_cents(1000)),
            ValidatedLine::new(2, 1, Money::from_cents(2500)),
        ]
    }

    #[tokio::test]
    async fn test_persist_assigns_id_and_pending_status() {
        let ledger = InMemoryLedger::new();
        let order = ledger
            .persist(OwnerId::new(), "12 Main St", lines())
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, Money::from_cents(4500));
        assert_eq!(ledger.order_count().await, 1);

        let loaded = ledger.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn test_persist_rejects_empty_lines() {
        let ledger = InMemoryLedger::new();
        let result = ledger.persist(OwnerId::new(), "12 Main St", vec![]).await;
        assert!(matches!(result, Err(LedgerError::Domain(_))));
        assert_eq!(ledger.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_injected_persist_failure_writes_nothing() {
        let ledger = InMemoryLedger::new();
        ledger.set_fail_on_persist(true).await;

        let result = ledger.persist(OwnerId::new(), "12 Main St", lines()).await;
        assert!(matches!(result, Err(LedgerError::Database(_))));
        assert_eq!(ledger.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_status_transitions_are_guarded() {
        let ledger = InMemoryLedger::new();
        let order = ledger
            .persist(OwnerId::new(), "12 Main St", lines())
            .await
            .unwrap();

        ledger.complete(order.id).await.unwrap();
        let loaded = ledger.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Completed);

        // Completed is terminal.
        let result = ledger.mark_failed(order.id).await;
        assert!(matches!(result, Err(LedgerError::Domain(_))));
    }

    #[tokio::test]
    async fn test_mark_failed_is_durable() {
        let ledger = InMemoryLedger::new();
        let order = ledger
            .persist(OwnerId::new(), "12 Main St", lines())
            .await
            .unwrap();

        ledger.mark_failed(order.id).await.unwrap();
        let loaded = ledger.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Failed);
    }

    #[tokio::test]
    async fn test_injected_transition_failure_leaves_status_unchanged() {
        let ledger = InMemoryLedger::new();
        let order = ledger
            .persist(OwnerId::new(), "12 Main St", lines())
            .await
            .unwrap();

        ledger.set_fail_on_transition(true).await;
        let result = ledger.mark_failed(order.id).await;
        assert!(matches!(result, Err(LedgerError::Database(_))));

        let loaded = ledger.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_order_not_found() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.get_order(OrderId::new()).await.unwrap().is_none());
        assert!(matches!(
            ledger.complete(OrderId::new()).await,
            Err(LedgerError::OrderNotFound(_))
        ));
    }
}
