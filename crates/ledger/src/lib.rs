//! The durable local store for orders.
//!
//! The ledger owns the only local-transactional step of the saga: an order
//! header and all of its lines become visible atomically or not at all.
//! After that commit the ledger is the system of record; the orchestrator
//! only ever issues explicit status transitions, never field mutation.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use postgres::PostgresLedger;
pub use store::OrderLedger;
