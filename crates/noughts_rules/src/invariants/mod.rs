//! First-class invariants over boards and snapshots.
//!
//! Each invariant is a named logical property that can be tested on its own.
//! Online clients check inbound snapshots against them and log violations.

mod monotonic_board;
mod turn_parity;

pub use monotonic_board::{BoardTransition, MonotonicBoardInvariant};
pub use turn_parity::{TurnParityInvariant, TurnState};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invariant violated: {}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Checks one invariant, naming it in the violation.
///
/// # Errors
///
/// Returns the violation when `I` does not hold for `state`.
pub fn check<S, I: Invariant<S>>(state: &S) -> Result<(), InvariantViolation> {
    if I::holds(state) {
        Ok(())
    } else {
        Err(InvariantViolation::new(I::description()))
    }
}
