//! Order placement saga.
//!
//! Turns a cart into a durable order across services that share no
//! transaction boundary:
//! 1. Fetch the cart and re-validate price and stock per line.
//! 2. Consult the payment decision stub.
//! 3. Commit the order locally (the only real transaction).
//! 4. Reserve inventory line by line via signed stock deltas.
//! 5. Clear the cart (best-effort) and finalize.
//!
//! A failure before the local commit aborts with nothing to clean up. A
//! failure after it triggers compensation: reverse deltas for exactly the
//! adjustments that landed, and a durable `Failed` status on the order.

pub mod error;
pub mod orchestrator;
pub mod report;
pub mod state;
pub mod validator;

pub use error::OrderError;
pub use orchestrator::SagaOrchestrator;
pub use report::OrderReceipt;
pub use state::SagaState;
pub use validator::Validator;
