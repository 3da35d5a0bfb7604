//! Typed clients for the services the order saga depends on but does not own.
//!
//! One trait per collaborator (cart, product, inventory, payment), each with
//! an HTTP implementation carrying an explicit per-call timeout and an
//! in-memory implementation for tests. Transport failures and non-success
//! statuses always surface as typed errors, never as empty defaults, so
//! "service down" stays distinguishable from "no data".

pub mod cart;
pub mod config;
pub mod error;
pub mod inventory;
pub mod payment;
pub mod product;

pub use cart::{CartClient, HttpCartClient, InMemoryCartClient};
pub use config::CollaboratorConfig;
pub use error::{Collaborator, CollaboratorError};
pub use inventory::{HttpInventoryClient, InMemoryInventoryClient, InventoryClient, StockLevel};
pub use payment::{PaymentClient, PaymentDecision, StubPaymentClient};
pub use product::{HttpProductClient, InMemoryProductClient, ProductClient, ProductInfo};
