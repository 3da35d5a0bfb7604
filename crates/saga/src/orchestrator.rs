//! Saga orchestrator for order placement.

use collaborators::{
    CartClient, CollaboratorError, InventoryClient, PaymentClient, PaymentDecision, ProductClient,
};
use common::OwnerId;
use domain::{Money, Order, ValidatedLine};
use ledger::OrderLedger;

use crate::error::OrderError;
use crate::report::OrderReceipt;
use crate::state::SagaState;
use crate::validator::Validator;

/// Drives one order placement saga per call:
/// validate → persist → reserve inventory → clear cart → finalize,
/// with compensation for inventory deltas applied after the local commit.
///
/// Collaborator calls carry their own timeouts; ordering is strict within a
/// saga (persist never precedes validation, external mutation never
/// precedes persist), and concurrent sagas share nothing but the ledger's
/// own row-level isolation.
pub struct SagaOrchestrator<C, P, I, Pay, L>
where
    C: CartClient,
    P: ProductClient,
    I: InventoryClient,
    Pay: PaymentClient,
    L: OrderLedger,
{
    cart: C,
    inventory: I,
    payment: Pay,
    ledger: L,
    validator: Validator<P, I>,
}

impl<C, P, I, Pay, L> SagaOrchestrator<C, P, I, Pay, L>
where
    C: CartClient,
    P: ProductClient,
    I: InventoryClient + Clone,
    Pay: PaymentClient,
    L: OrderLedger,
{
    /// Creates a new orchestrator over the given clients and ledger.
    pub fn new(cart: C, products: P, inventory: I, payment: Pay, ledger: L) -> Self {
        let validator = Validator::new(products, inventory.clone());
        Self {
            cart,
            inventory,
            payment,
            ledger,
            validator,
        }
    }

    /// Places an order for everything in the owner's cart.
    ///
    /// Any failure before the ledger commit aborts with no durable trace.
    /// After the commit the saga always runs to a terminal state: either
    /// the order completes, or applied stock deltas are reversed and the
    /// order is durably marked failed.
    #[tracing::instrument(skip(self, shipping_address), fields(%owner_id))]
    pub async fn place_order(
        &self,
        owner_id: OwnerId,
        shipping_address: &str,
    ) -> Result<OrderReceipt, OrderError> {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = std::time::Instant::now();

        let mut state = SagaState::Validating;
        tracing::debug!(%state, "fetching cart");

        let cart = match self.cart.fetch_cart(owner_id).await {
            Ok(cart) => cart,
            Err(e) => return Err(self.abort(saga_start, e.into())),
        };
        if cart.is_empty() {
            return Err(self.abort(saga_start, OrderError::EmptyCart));
        }

        let lines = match self.validator.validate(&cart).await {
            Ok(lines) => lines,
            Err(e) => return Err(self.abort(saga_start, e)),
        };

        let total = lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.total_price());
        match self.payment.authorize(owner_id, total).await {
            Ok(PaymentDecision::Approved) => {}
            Ok(PaymentDecision::Declined) => {
                return Err(self.abort(saga_start, OrderError::PaymentDeclined));
            }
            Err(e) => return Err(self.abort(saga_start, e.into())),
        }

        state = SagaState::Persisting;
        tracing::debug!(%state, lines = lines.len(), total = %total, "committing order");

        // The one local transaction. External state is only touched after
        // this succeeds, so a ledger failure never strands a reservation.
        let order = match self.ledger.persist(owner_id, shipping_address, lines).await {
            Ok(order) => order,
            Err(e) => return Err(self.abort(saga_start, e.into())),
        };

        state = SagaState::Reserving;
        tracing::info!(%state, order_id = %order.id, "order committed, reserving inventory");

        let mut reserved: Vec<ValidatedLine> = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let delta = -i64::from(line.quantity);
            match self.inventory.adjust_stock(line.product_id, delta).await {
                Ok(()) => reserved.push(*line),
                Err(failure) => {
                    self.compensate(&order, &reserved, line, &failure).await;
                    metrics::counter!("saga_failed").increment(1);
                    metrics::histogram!("saga_duration_seconds")
                        .record(saga_start.elapsed().as_secs_f64());
                    return Err(OrderError::InventoryReservationFailed { order_id: order.id });
                }
            }
        }

        state = SagaState::Clearing;
        tracing::debug!(%state, order_id = %order.id, "clearing cart");

        // A failed clear is not compensated: a stale cart is a nuisance,
        // not an inventory correctness problem. It is surfaced instead.
        let cart_clear_warning = match self.cart.clear_cart(owner_id).await {
            Ok(()) => false,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "cart clear failed, order remains valid");
                true
            }
        };

        self.ledger.complete(order.id).await.map_err(|e| {
            tracing::error!(
                reconciliation = true,
                order_id = %order.id,
                error = %e,
                "finalize failed after inventory was reserved, manual repair required"
            );
            OrderError::from(e)
        })?;

        state = SagaState::Done;
        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);
        metrics::counter!("saga_completed").increment(1);
        tracing::info!(%state, order_id = %order.id, duration, cart_clear_warning, "order placed");

        Ok(OrderReceipt::from_order(&order, cart_clear_warning))
    }

    /// Records a pre-commit abort. Nothing durable exists at this point, so
    /// the error is simply handed back to the caller.
    fn abort(&self, saga_start: std::time::Instant, err: OrderError) -> OrderError {
        metrics::counter!("saga_aborted").increment(1);
        metrics::histogram!("saga_duration_seconds").record(saga_start.elapsed().as_secs_f64());
        tracing::info!(state = %SagaState::Aborted, error = %err, "saga aborted before any durable write");
        err
    }

    /// Reverses the stock deltas that actually landed and durably marks the
    /// order failed.
    ///
    /// Reversals are best-effort: a reversal that itself fails becomes an
    /// operator reconciliation entry, never a retry loop. When the forward
    /// call that broke the saga has an unknown outcome (timeout), its
    /// reverse delta is applied too — delta-apply makes the equal and
    /// opposite call well-defined either way — and a reconciliation entry
    /// records that the pair may not balance.
    async fn compensate(
        &self,
        order: &Order,
        reserved: &[ValidatedLine],
        failed_line: &ValidatedLine,
        failure: &CollaboratorError,
    ) {
        let state = SagaState::Compensating;
        tracing::warn!(
            %state,
            order_id = %order.id,
            reserved = reserved.len(),
            error = %failure,
            "inventory reservation failed, reversing applied deltas"
        );

        if failure.is_uncertain() {
            tracing::error!(
                reconciliation = true,
                order_id = %order.id,
                product_id = %failed_line.product_id,
                quantity = failed_line.quantity,
                "forward adjustment outcome unknown, applying reverse delta"
            );
            self.reverse_delta(order, failed_line).await;
        }

        for line in reserved.iter().rev() {
            self.reverse_delta(order, line).await;
        }

        if let Err(e) = self.ledger.mark_failed(order.id).await {
            tracing::error!(
                reconciliation = true,
                order_id = %order.id,
                error = %e,
                "could not mark order failed, manual repair required"
            );
        }

        tracing::warn!(state = %SagaState::Failed, order_id = %order.id, "saga failed after compensation");
    }

    async fn reverse_delta(&self, order: &Order, line: &ValidatedLine) {
        let delta = i64::from(line.quantity);
        if let Err(e) = self.inventory.adjust_stock(line.product_id, delta).await {
            tracing::error!(
                reconciliation = true,
                order_id = %order.id,
                product_id = %line.product_id,
                delta,
                error = %e,
                "compensating adjustment failed, manual repair required"
            );
        }
    }
}
