//! Saga state machine.

use serde::{Deserialize, Serialize};

/// The state of an order placement saga.
///
/// State transitions:
/// ```text
/// Start ──► Validating ──► Persisting ──► Reserving ──► Clearing ──► Done
///               │               │             │
///               └──► Aborted ◄──┘             └──► Compensating ──► Failed
/// ```
///
/// `Aborted` is only reachable before the local commit (nothing durable
/// exists); `Compensating`/`Failed` only after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaState {
    /// Saga created, cart not yet fetched.
    #[default]
    Start,

    /// Cart fetched, per-line price/stock checks running.
    Validating,

    /// Validation passed, local ledger commit in progress.
    Persisting,

    /// Order committed, inventory deltas being applied.
    Reserving,

    /// Inventory reserved, cart clear in progress.
    Clearing,

    /// Order finalized (terminal state).
    Done,

    /// Failed before any durable write (terminal state).
    Aborted,

    /// Reverse deltas being applied after a reservation failure.
    Compensating,

    /// Compensation finished, order durably marked failed (terminal state).
    Failed,
}

impl SagaState {
    /// Returns true if a durable order exists for this state.
    pub fn past_persist(&self) -> bool {
        matches!(
            self,
            SagaState::Reserving
                | SagaState::Clearing
                | SagaState::Done
                | SagaState::Compensating
                | SagaState::Failed
        )
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::Done | SagaState::Aborted | SagaState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::Start => "Start",
            SagaState::Validating => "Validating",
            SagaState::Persisting => "Persisting",
            SagaState::Reserving => "Reserving",
            SagaState::Clearing => "Clearing",
            SagaState::Done => "Done",
            SagaState::Aborted => "Aborted",
            SagaState::Compensating => "Compensating",
            SagaState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_start() {
        assert_eq!(SagaState::default(), SagaState::Start);
    }

    #[test]
    fn test_terminal_states() {
        assert!(SagaState::Done.is_terminal());
        assert!(SagaState::Aborted.is_terminal());
        assert!(SagaState::Failed.is_terminal());

        assert!(!SagaState::Start.is_terminal());
        assert!(!SagaState::Validating.is_terminal());
        assert!(!SagaState::Persisting.is_terminal());
        assert!(!SagaState::Reserving.is_terminal());
        assert!(!SagaState::Clearing.is_terminal());
        assert!(!SagaState::Compensating.is_terminal());
    }

    #[test]
    fn test_past_persist() {
        assert!(!SagaState::Start.past_persist());
        assert!(!SagaState::Validating.past_persist());
        assert!(!SagaState::Persisting.past_persist());
        assert!(!SagaState::Aborted.past_persist());

        assert!(SagaState::Reserving.past_persist());
        assert!(SagaState::Clearing.past_persist());
        assert!(SagaState::Compensating.past_persist());
        assert!(SagaState::Done.past_persist());
        assert!(SagaState::Failed.past_persist());
    }

    #[test]
    fn test_display() {
        assert_eq!(SagaState::Validating.to_string(), "Validating");
        assert_eq!(SagaState::Compensating.to_string(), "Compensating");
    }
}
