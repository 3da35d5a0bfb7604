//! End-to-end tests for the order placement saga over in-memory
//! collaborators and ledger.

use collaborators::{
    InMemoryCartClient, InMemoryInventoryClient, InMemoryProductClient, StubPaymentClient,
};
use common::OwnerId;
use domain::{CartLine, Money, OrderStatus, ProductId, RejectReason, ValidatedLine};
use ledger::{InMemoryLedger, OrderLedger};
use saga::{OrderError, SagaOrchestrator};

type TestOrchestrator = SagaOrchestrator<
    InMemoryCartClient,
    InMemoryProductClient,
    InMemoryInventoryClient,
    StubPaymentClient,
    InMemoryLedger,
>;

struct TestHarness {
    orchestrator: TestOrchestrator,
    cart: InMemoryCartClient,
    products: InMemoryProductClient,
    inventory: InMemoryInventoryClient,
    ledger: InMemoryLedger,
}

impl TestHarness {
    fn new() -> Self {
        let cart = InMemoryCartClient::new();
        let products = InMemoryProductClient::new();
        let inventory = InMemoryInventoryClient::new();
        let payment = StubPaymentClient::new();
        let ledger = InMemoryLedger::new();

        let orchestrator = SagaOrchestrator::new(
            cart.clone(),
            products.clone(),
            inventory.clone(),
            payment.clone(),
            ledger.clone(),
        );

        Self {
            orchestrator,
            cart,
            products,
            inventory,
            ledger,
        }
    }

    fn stock(&self, product_id: i64, price_cents: i64, quantity: i64) {
        self.products
            .set_price(product_id, Money::from_cents(price_cents));
        self.inventory.set_stock(product_id, quantity);
    }
}

// Cart [{product 7, qty 2}], price $10.00, stock 5: the order totals $20.00,
// stock drops to 3, and the cart is emptied.
#[tokio::test]
async fn test_successful_placement_scenario() {
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.stock(7, 1000, 5);
    h.cart.set_cart(owner, vec![CartLine::new(7, 2)]);

    let receipt = h
        .orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap();

    assert_eq!(receipt.total_price, Money::from_cents(2000));
    assert_eq!(
        receipt.lines,
        vec![ValidatedLine::new(7, 2, Money::from_cents(1000))]
    );
    assert!(!receipt.cart_clear_warning);

    let order = h
        .ledger
        .get_order(receipt.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.total_price, Money::from_cents(2000));

    assert_eq!(h.inventory.stock(7), Some(3));
    assert!(h.cart.cart_lines(owner).is_none());
}

// Same cart with stock 1: rejected, and nothing anywhere changes.
#[tokio::test]
async fn test_insufficient_stock_scenario() {
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.stock(7, 1000, 1);
    h.cart.set_cart(owner, vec![CartLine::new(7, 2)]);

    let err = h
        .orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap_err();

    match err {
        OrderError::LineRejected { product_id, reason } => {
            assert_eq!(product_id, ProductId::new(7));
            assert_eq!(reason, RejectReason::InsufficientStock);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(h.inventory.stock(7), Some(1));
    assert_eq!(h.ledger.order_count().await, 0);
    assert!(h.cart.cart_lines(owner).is_some());
}

// Validation passes and the commit lands, but the only line's stock delta
// fails: the order survives as Failed and inventory is untouched.
#[tokio::test]
async fn test_reservation_failure_scenario() {
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.stock(7, 1000, 5);
    h.cart.set_cart(owner, vec![CartLine::new(7, 2)]);
    h.inventory.set_fail_on_adjust(true);

    let err = h
        .orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap_err();

    let OrderError::InventoryReservationFailed { order_id } = err else {
        panic!("unexpected error: {err}");
    };

    let order = h.ledger.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Failed);
    assert_eq!(h.inventory.stock(7), Some(5));
}

// A cart where only the middle line is short on stock produces zero ledger
// writes and zero inventory mutations for any line.
#[tokio::test]
async fn test_all_or_nothing_validation() {
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.stock(1, 1000, 10);
    h.stock(2, 500, 0);
    h.stock(3, 250, 10);
    h.cart.set_cart(
        owner,
        vec![CartLine::new(1, 1), CartLine::new(2, 1), CartLine::new(3, 1)],
    );

    let err = h
        .orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap_err();

    match err {
        OrderError::LineRejected { product_id, reason } => {
            assert_eq!(product_id, ProductId::new(2));
            assert_eq!(reason, RejectReason::InsufficientStock);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(h.ledger.order_count().await, 0);
    assert!(h.inventory.applied_adjustments().is_empty());
    assert_eq!(h.inventory.stock(1), Some(10));
    assert_eq!(h.inventory.stock(3), Some(10));
}

// After any outcome, the world is in one of exactly three shapes: a
// Completed order with decremented stock, no order at all, or a Failed
// order with net-zero stock change.
#[tokio::test]
async fn test_atomicity_across_outcomes() {
    // Completed.
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.stock(7, 1000, 5);
    h.cart.set_cart(owner, vec![CartLine::new(7, 2)]);
    let receipt = h
        .orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap();
    let order = h
        .ledger
        .get_order(receipt.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(h.inventory.stock(7), Some(3));

    // No order at all (validation rejection).
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.stock(7, 1000, 1);
    h.cart.set_cart(owner, vec![CartLine::new(7, 2)]);
    h.orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap_err();
    assert_eq!(h.ledger.order_count().await, 0);
    assert_eq!(h.inventory.stock(7), Some(1));

    // Failed order with net-zero inventory change.
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.stock(7, 1000, 5);
    h.cart.set_cart(owner, vec![CartLine::new(7, 2)]);
    h.inventory.set_fail_on_adjust_for(Some(ProductId::new(7)));
    h.inventory.set_fail_uncertain(true);
    h.orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap_err();
    let failed = h.ledger.orders_with_status(OrderStatus::Failed).await;
    assert_eq!(failed.len(), 1);
    assert_eq!(h.inventory.stock(7), Some(5));
}

// The order captures the price observed at validation, not at cart-add time.
#[tokio::test]
async fn test_price_at_validation_time() {
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.stock(7, 1000, 5);
    h.cart.set_cart(owner, vec![CartLine::new(7, 2)]);

    // Price rises between cart-add and checkout.
    h.products.set_price(7, Money::from_cents(1500));

    let receipt = h
        .orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap();

    assert_eq!(receipt.lines[0].unit_price, Money::from_cents(1500));
    assert_eq!(receipt.total_price, Money::from_cents(3000));
}

// Two sagas for different owners share collaborators but nothing else.
#[tokio::test]
async fn test_concurrent_sagas_are_independent() {
    let h = TestHarness::new();
    let owner_a = OwnerId::new();
    let owner_b = OwnerId::new();
    h.stock(7, 1000, 10);
    h.cart.set_cart(owner_a, vec![CartLine::new(7, 2)]);
    h.cart.set_cart(owner_b, vec![CartLine::new(7, 3)]);

    let (a, b) = tokio::join!(
        h.orchestrator.place_order(owner_a, "12 Main St"),
        h.orchestrator.place_order(owner_b, "34 Side Ave"),
    );

    let a = a.unwrap();
    let b = b.unwrap();
    assert_ne!(a.order_id, b.order_id);
    assert_eq!(h.inventory.stock(7), Some(5));
    assert_eq!(h.ledger.order_count().await, 2);
}

// A cart collaborator outage is an error, never treated as an empty cart.
#[tokio::test]
async fn test_cart_outage_is_not_empty_cart() {
    let h = TestHarness::new();
    let owner = OwnerId::new();
    h.cart.set_fail_on_fetch(true);

    let err = h
        .orchestrator
        .place_order(owner, "12 Main St")
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::CollaboratorUnavailable { .. }));
    assert_eq!(h.ledger.order_count().await, 0);
}
