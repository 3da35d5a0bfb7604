//! Payment collaborator client.
//!
//! Payment processing is out of scope; the saga only consumes an
//! authorize/decline decision before committing anything durable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::OwnerId;
use domain::Money;

use crate::error::Result;

/// The payment collaborator's decision for an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDecision {
    Approved,
    Declined,
}

/// Trait for the payment authorization decision.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Asks the payment collaborator whether the owner may be charged the
    /// given amount.
    async fn authorize(&self, owner_id: OwnerId, amount: Money) -> Result<PaymentDecision>;
}

/// Stub payment client that approves everything unless told otherwise.
#[derive(Debug, Clone, Default)]
pub struct StubPaymentClient {
    decline: Arc<AtomicBool>,
}

impl StubPaymentClient {
    /// Creates a stub that approves every authorization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the stub to decline subsequent authorizations.
    pub fn set_decline(&self, decline: bool) {
        self.decline.store(decline, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentClient for StubPaymentClient {
    async fn authorize(&self, _owner_id: OwnerId, _amount: Money) -> Result<PaymentDecision> {
        if self.decline.load(Ordering::SeqCst) {
            Ok(PaymentDecision::Declined)
        } else {
            Ok(PaymentDecision::Approved)
        }
    }
}
