//! Domain model for order placement.
//!
//! Value objects (`Money`, `ProductId`), the read-only `CartSnapshot`
//! fetched from the cart collaborator, per-line validation outcomes, and
//! the `Order` aggregate that the ledger persists.

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod validation;

pub use cart::{CartLine, CartSnapshot};
pub use error::DomainError;
pub use money::{Money, ProductId};
pub use order::{Order, OrderStatus, ValidatedLine};
pub use validation::{RejectReason, ValidationOutcome};
