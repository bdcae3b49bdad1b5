//! Turn parity invariant: the side to move matches the mark counts.

use super::Invariant;
use crate::{Board, Mark};

/// A board together with the mark recorded as next to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    /// The board.
    pub board: Board,
    /// Whose turn the record says it is.
    pub turn: Mark,
}

/// Invariant: X moves first and the marks alternate.
///
/// Equal counts mean X to move; one extra X means O to move.
pub struct TurnParityInvariant;

impl Invariant<TurnState> for TurnParityInvariant {
    fn holds(state: &TurnState) -> bool {
        let xs = state.board.count(Mark::X);
        let os = state.board.count(Mark::O);
        match state.turn {
            Mark::X => xs == os,
            Mark::O => xs == os + 1,
        }
    }

    fn description() -> &'static str {
        "Marks alternate starting with X"
    }
}
