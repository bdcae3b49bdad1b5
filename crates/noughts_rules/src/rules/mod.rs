//! Game rules.
//!
//! Pure functions over a [`Board`]. Rules are kept apart from board storage
//! so the offline engine, the planner and the online arbiter share them.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner};

use super::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Terminal state of a board, always derived from the board itself.
///
/// `HumanWin` and `ComputerWin` name the marks [`Mark::HUMAN`] (X) and
/// [`Mark::COMPUTER`] (O); online play reads them as "X won" and "O won".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves remain and nobody has three in a row.
    InProgress,
    /// Board is full with no winning line.
    Tie,
    /// X holds a winning line.
    HumanWin,
    /// O holds a winning line.
    ComputerWin,
}

impl Outcome {
    /// The win outcome for `mark`.
    pub fn win_for(mark: Mark) -> Self {
        match mark {
            Mark::X => Outcome::HumanWin,
            Mark::O => Outcome::ComputerWin,
        }
    }

    /// The winning mark, if the game was won.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::HumanWin => Some(Mark::X),
            Outcome::ComputerWin => Some(Mark::O),
            Outcome::InProgress | Outcome::Tie => None,
        }
    }

    /// Returns true once the game has a result.
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Tie => write!(f, "Tie"),
            Outcome::HumanWin => write!(f, "X wins"),
            Outcome::ComputerWin => write!(f, "O wins"),
        }
    }
}

/// Evaluates a board.
///
/// A completed line wins even when the board is also full.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some(mark) = check_winner(board) {
        return Outcome::win_for(mark);
    }
    if is_full(board) {
        return Outcome::Tie;
    }
    Outcome::InProgress
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), Outcome::InProgress);
    }

    #[test]
    fn test_full_board_without_line_is_tie() {
        let board: Board = "XOX/XOO/OXX".parse().unwrap();
        assert_eq!(evaluate(&board), Outcome::Tie);
    }

    #[test]
    fn test_full_board_with_main_diagonal_is_not_tie() {
        // X X O / O X O / X O X holds X on 0, 4 and 8.
        let board: Board = "XXO/OXO/XOX".parse().unwrap();
        assert_eq!(evaluate(&board), Outcome::HumanWin);
    }

    #[test]
    fn test_win_beats_tie_on_full_board() {
        // X completes the left column on the last empty cell.
        let board: Board = "XOX/XOO/XXO".parse().unwrap();
        assert_eq!(evaluate(&board), Outcome::HumanWin);
    }

    #[test]
    fn test_computer_win() {
        let board: Board = "XX./OOO/X..".parse().unwrap();
        assert_eq!(evaluate(&board), Outcome::ComputerWin);
        assert_eq!(Outcome::ComputerWin.winner(), Some(Mark::O));
    }
}
