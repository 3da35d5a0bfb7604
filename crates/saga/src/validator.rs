//! Per-line cart validation against the product and inventory collaborators.

use collaborators::{CollaboratorError, InventoryClient, ProductClient};
use domain::{CartLine, CartSnapshot, RejectReason, ValidatedLine, ValidationOutcome};
use futures_util::future::join_all;

use crate::error::OrderError;

/// Re-validates a cart's lines against authoritative price and stock.
///
/// Price and stock for one line are fetched concurrently, and all lines fan
/// out together; the decision is made only after every check has returned.
/// The price that goes on the order is always the one observed here, never
/// a price cached in the cart.
pub struct Validator<P, I> {
    products: P,
    inventory: I,
}

impl<P, I> Validator<P, I>
where
    P: ProductClient,
    I: InventoryClient,
{
    /// Creates a validator over the given collaborator clients.
    pub fn new(products: P, inventory: I) -> Self {
        Self { products, inventory }
    }

    /// Validates every line of the cart.
    ///
    /// Returns the validated lines (in cart order, priced at validation
    /// time) only if every line is accepted. The first rejection in cart
    /// order wins; a collaborator outage aborts validation outright,
    /// distinct from any rejection.
    pub async fn validate(&self, cart: &CartSnapshot) -> Result<Vec<ValidatedLine>, OrderError> {
        let outcomes = join_all(cart.lines.iter().map(|line| self.check_line(line))).await;

        let mut validated = Vec::with_capacity(cart.lines.len());
        for (line, outcome) in cart.lines.iter().zip(outcomes) {
            match outcome? {
                ValidationOutcome::Accepted(price) => {
                    validated.push(ValidatedLine::new(line.product_id, line.quantity, price));
                }
                ValidationOutcome::Rejected { product_id, reason } => {
                    tracing::info!(%product_id, %reason, "cart line rejected");
                    return Err(OrderError::LineRejected { product_id, reason });
                }
            }
        }
        Ok(validated)
    }

    async fn check_line(&self, line: &CartLine) -> Result<ValidationOutcome, OrderError> {
        let (product, stock) = tokio::join!(
            self.products.fetch_product(line.product_id),
            self.inventory.fetch_stock(line.product_id),
        );

        // A missing catalog or stock record rejects the line; an unreachable
        // collaborator is not a rejection and aborts the whole validation.
        let price = match product {
            Ok(info) => Some(info.price),
            Err(CollaboratorError::ProductNotFound { .. }) => None,
            Err(e) => return Err(e.into()),
        };
        let available = match stock {
            Ok(level) => Some(level.quantity),
            Err(CollaboratorError::StockNotFound { .. }) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(match (price, available) {
            (None, _) | (_, None) => ValidationOutcome::Rejected {
                product_id: line.product_id,
                reason: RejectReason::NotFound,
            },
            (Some(_), Some(available)) if line.quantity > available => {
                ValidationOutcome::Rejected {
                    product_id: line.product_id,
                    reason: RejectReason::InsufficientStock,
                }
            }
            (Some(price), Some(_)) => ValidationOutcome::Accepted(price),
        })
    }
}
