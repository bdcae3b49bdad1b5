//! Tiered move selection for the computer opponent.
//!
//! Win and block detection simulate a placement on a scratch board, evaluate
//! it, and revert the cell before trying the next one. The caller's board is
//! never touched; the chosen move is applied separately.

use super::rules::{Outcome, evaluate};
use super::{Board, Difficulty, Mark, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Picks a cell for [`Mark::COMPUTER`].
///
/// Returns `None` only when the board has no empty cell.
pub fn select_move<R: Rng + ?Sized>(
    board: &Board,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Position> {
    select_move_for(board, Mark::COMPUTER, difficulty, rng)
}

/// Picks a cell for `mark` at the given difficulty.
///
/// - `Easy`: uniform over empty cells.
/// - `Harder`: first winning cell in index order, else `Easy`.
/// - `Expert`: first winning cell, else first cell blocking the opponent,
///   else `Easy`. One departure from `Easy`: when the opponent's only mark
///   sits on the center, the reply is a random free corner. An edge reply
///   there loses to a forced fork.
#[instrument(skip(board, rng), fields(board = %board.symbols()))]
pub fn select_move_for<R: Rng + ?Sized>(
    board: &Board,
    mark: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Position> {
    if board.empty_positions().is_empty() {
        debug!("No legal move, board is full");
        return None;
    }

    let choice = match difficulty {
        Difficulty::Easy => random_move(board, rng),
        Difficulty::Harder => winning_move(board, mark).or_else(|| random_move(board, rng)),
        Difficulty::Expert => winning_move(board, mark)
            .or_else(|| blocking_move(board, mark))
            .or_else(|| center_reply(board, mark, rng))
            .or_else(|| random_move(board, rng)),
    };

    debug!(?choice, "Planner chose move");
    choice
}

/// First empty cell (ascending) where `mark` completes a line.
pub fn winning_move(board: &Board, mark: Mark) -> Option<Position> {
    first_completing(board, mark)
}

/// First empty cell (ascending) where the opponent of `mark` would complete a line.
pub fn blocking_move(board: &Board, mark: Mark) -> Option<Position> {
    first_completing(board, mark.opponent())
}

/// Uniformly random empty cell.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    board.empty_positions().choose(rng).copied()
}

fn first_completing(board: &Board, mark: Mark) -> Option<Position> {
    let target = Outcome::win_for(mark);
    let mut scratch = *board;

    for pos in Position::ALL {
        if !scratch.is_empty(pos) {
            continue;
        }
        if scratch.place(pos, mark).is_err() {
            continue;
        }
        let outcome = evaluate(&scratch);
        scratch.revert(pos);
        if outcome == target {
            return Some(pos);
        }
    }

    None
}

/// A random corner when the opponent has opened on the center and nothing else.
fn center_reply<R: Rng + ?Sized>(board: &Board, mark: Mark, rng: &mut R) -> Option<Position> {
    let opened_center = board.get(Position::Center).mark() == Some(mark.opponent())
        && board.count(mark.opponent()) == 1
        && board.count(mark) == 0;
    if !opened_center {
        return None;
    }
    Position::CORNERS.choose(rng).copied()
}
