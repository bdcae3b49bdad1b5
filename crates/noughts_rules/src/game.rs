//! Local game engine: one board, alternating marks, X first.

use super::rules::{Outcome, evaluate};
use super::{Board, Mark, Move, MoveError, Position};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A single local game.
///
/// The outcome is recomputed from the board after every placement and never
/// set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    to_move: Mark,
    history: Vec<Move>,
}

impl Game {
    /// Creates a new game with X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            history: Vec::new(),
        }
    }

    /// Rebuilds a game from a board, inferring the side to move from mark counts.
    ///
    /// History is not recoverable from a board and starts empty.
    pub fn from_board(board: Board) -> Self {
        let to_move = if board.count(Mark::X) > board.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        };
        Self {
            board,
            to_move,
            history: Vec::new(),
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The mark whose turn it is.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Moves played since the last clear.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        evaluate(&self.board)
    }

    /// Returns true once the game has a result.
    pub fn is_over(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// Places the current mark at `pos`.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] once the game has a result,
    /// [`MoveError::CellOccupied`] if the cell is taken.
    #[instrument(skip(self), fields(mark = %self.to_move))]
    pub fn place(&mut self, pos: Position) -> Result<Outcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        self.board.place(pos, self.to_move)?;
        self.history.push(Move::new(self.to_move, pos));
        self.to_move = self.to_move.opponent();

        let outcome = self.outcome();
        debug!(%outcome, "Move applied");
        Ok(outcome)
    }

    /// Places a move, checking it is made by the side to move.
    ///
    /// # Errors
    ///
    /// [`MoveError::NotYourTurn`] when `action.mark` is not the side to move,
    /// otherwise as [`Game::place`].
    pub fn apply(&mut self, action: Move) -> Result<Outcome, MoveError> {
        if action.mark != self.to_move {
            return Err(MoveError::NotYourTurn(self.to_move));
        }
        self.place(action.position)
    }

    /// Places the current mark at a raw cell index.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfBounds`] for indexes past 8, otherwise as [`Game::place`].
    pub fn place_index(&mut self, index: usize) -> Result<Outcome, MoveError> {
        let pos = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        self.place(pos)
    }

    /// Empties the board and gives X the move.
    pub fn clear(&mut self) {
        self.board.clear();
        self.to_move = Mark::X;
        self.history.clear();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_alternate_from_x() {
        let mut game = Game::new();
        game.place(Position::Center).unwrap();
        assert_eq!(game.to_move(), Mark::O);
        game.place(Position::TopLeft).unwrap();
        assert_eq!(game.to_move(), Mark::X);
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_no_moves_after_win() {
        let mut game = Game::new();
        for pos in [0, 3, 1, 4, 2] {
            game.place_index(pos).unwrap();
        }
        assert_eq!(game.outcome(), Outcome::HumanWin);
        assert_eq!(game.place_index(8), Err(MoveError::GameOver));
    }

    #[test]
    fn test_wrong_mark_rejected() {
        let mut game = Game::new();
        let result = game.apply(Move::new(Mark::O, Position::Center));
        assert_eq!(result, Err(MoveError::NotYourTurn(Mark::X)));
        assert!(game.board().is_blank());
    }

    #[test]
    fn test_out_of_bounds_index() {
        let mut game = Game::new();
        assert_eq!(game.place_index(9), Err(MoveError::OutOfBounds(9)));
    }

    #[test]
    fn test_from_board_infers_side_to_move() {
        let game = Game::from_board("X........".parse().unwrap());
        assert_eq!(game.to_move(), Mark::O);
        let game = Game::from_board("XO.......".parse().unwrap());
        assert_eq!(game.to_move(), Mark::X);
    }

    #[test]
    fn test_clear_resets() {
        let mut game = Game::new();
        game.place(Position::Center).unwrap();
        game.clear();
        assert!(game.board().is_blank());
        assert_eq!(game.to_move(), Mark::X);
        assert!(game.history().is_empty());
    }
}
