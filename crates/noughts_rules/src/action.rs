//! First-class action types.
//!
//! A move is the player's intent. It can be validated before it is applied,
//! logged, and replayed.

use super::{Mark, Position};
use serde::{Deserialize, Serialize};

/// A player placing their mark at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark being placed.
    pub mark: Mark,
    /// Where it goes.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position.label())
    }
}

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Position),

    /// The game already has a result.
    #[display("Game is already over")]
    GameOver,

    /// The mover does not own the mark whose turn it is. Carries the mark to move.
    #[display("Not your turn, waiting for {}", _0)]
    NotYourTurn(Mark),

    /// The index does not name a cell.
    #[display("Cell index {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),
}

impl std::error::Error for MoveError {}

impl MoveError {
    /// Short message shown to the player.
    pub fn status_line(&self) -> &'static str {
        match self {
            MoveError::CellOccupied(_) => "That cell is taken.",
            MoveError::GameOver => "The game is over.",
            MoveError::NotYourTurn(_) => "Not your turn.",
            MoveError::OutOfBounds(_) => "No such cell.",
        }
    }
}
