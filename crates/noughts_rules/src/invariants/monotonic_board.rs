//! Monotonic board invariant: marks are never overwritten or removed.

use super::Invariant;
use crate::{Board, Cell};

/// A board before and after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTransition {
    /// Board as last seen.
    pub previous: Board,
    /// Board as just received.
    pub next: Board,
}

/// Invariant: every occupied cell keeps its mark, unless the whole board was cleared.
pub struct MonotonicBoardInvariant;

impl Invariant<BoardTransition> for MonotonicBoardInvariant {
    fn holds(state: &BoardTransition) -> bool {
        if state.next.is_blank() {
            return true;
        }
        state
            .previous
            .cells()
            .iter()
            .zip(state.next.cells())
            .all(|(before, after)| *before == Cell::Empty || before == after)
    }

    fn description() -> &'static str {
        "Board cells are monotonic (never overwritten)"
    }
}
