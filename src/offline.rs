//! Offline play against the computer.
//!
//! The human is always [`Mark::HUMAN`] and moves first. Each accepted human
//! move is evaluated, and if the game is still open the planner answers for
//! [`Mark::COMPUTER`] before control returns.

use crate::scores::{PersistError, ScoreBoard};
use derive_getters::Getters;
use derive_new::new;
use noughts_rules::{
    Board, Difficulty, Game, Mark, Move, MoveError, Outcome, Position, select_move,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// What one human turn produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct TurnReport {
    human: Position,
    computer: Option<Position>,
    outcome: Outcome,
}

/// A running offline match: the current game, AI strength and tally.
#[derive(Debug)]
pub struct LocalMatch<R = StdRng> {
    game: Game,
    difficulty: Difficulty,
    scores: ScoreBoard,
    rng: R,
}

impl LocalMatch<StdRng> {
    /// Starts a match with an entropy-seeded planner.
    pub fn new(difficulty: Difficulty, scores: ScoreBoard) -> Self {
        Self::with_rng(difficulty, scores, StdRng::from_entropy())
    }

    /// Resumes from a saved snapshot, tally included.
    pub fn restore(snapshot: MatchSnapshot) -> Self {
        let scores = snapshot.scores;
        Self::restore_with_scores(snapshot, scores)
    }

    /// Resumes the board and difficulty of a snapshot on top of `scores`.
    ///
    /// The snapshot's own tally is ignored. The result, if any, is re-derived
    /// from the board. If the snapshot was taken with the computer to move, it
    /// moves now and a finish it causes is counted in `scores`.
    #[instrument(skip(snapshot, scores), fields(board = %snapshot.board.symbols()))]
    pub fn restore_with_scores(snapshot: MatchSnapshot, scores: ScoreBoard) -> Self {
        if snapshot.scores != scores {
            debug!(saved = %snapshot.scores, kept = %scores, "Snapshot tally replaced");
        }
        let mut local = Self::new(snapshot.difficulty, scores);
        local.game = Game::from_board(snapshot.board);
        if !local.game.is_over() && local.game.to_move() == Mark::COMPUTER {
            debug!("Computer owed a reply, playing it");
            local.computer_turn();
        }
        info!(outcome = %local.outcome(), "Match restored");
        local
    }
}

impl<R: rand::Rng> LocalMatch<R> {
    /// Starts a match with a caller-supplied random source.
    pub fn with_rng(difficulty: Difficulty, scores: ScoreBoard, rng: R) -> Self {
        Self {
            game: Game::new(),
            difficulty,
            scores,
            rng,
        }
    }

    /// Plays the human's mark at `index`, then the computer's reply.
    ///
    /// The tally is updated once, on the move that ends the game.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] once the game has a result,
    /// [`MoveError::OutOfBounds`] for indexes past 8,
    /// [`MoveError::CellOccupied`] for a taken cell. The board is unchanged.
    #[instrument(skip(self), fields(difficulty = %self.difficulty))]
    pub fn human_move(&mut self, index: usize) -> Result<TurnReport, MoveError> {
        if self.game.is_over() {
            debug!("Game over, ignoring input");
            return Err(MoveError::GameOver);
        }
        let position = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        let outcome = self
            .game
            .apply(Move::new(Mark::HUMAN, position))
            .inspect_err(|e| warn!(%position, error = %e, "Move rejected"))?;

        if outcome.is_terminal() {
            self.finish(outcome);
            return Ok(TurnReport::new(position, None, outcome));
        }

        let reply = self.computer_turn();
        Ok(TurnReport::new(position, reply, self.outcome()))
    }

    fn computer_turn(&mut self) -> Option<Position> {
        let choice = select_move(self.game.board(), self.difficulty, &mut self.rng)?;
        match self.game.place(choice) {
            Ok(outcome) => {
                debug!(%choice, %outcome, "Computer moved");
                if outcome.is_terminal() {
                    self.finish(outcome);
                }
                Some(choice)
            }
            Err(e) => {
                warn!(%choice, error = %e, "Planner picked an illegal cell");
                None
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.scores.record(outcome);
        info!(%outcome, scores = %self.scores, "Game finished");
    }

    /// Clears the board for another game. The tally carries over.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) {
        self.game.clear();
        info!("New game");
    }

    /// Changes AI strength. Takes effect from the computer's next move.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        info!(%difficulty, "Difficulty set");
    }

    /// Current AI strength.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Tally so far.
    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// The board.
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        self.game.outcome()
    }

    /// Status text for display.
    pub fn status_line(&self) -> &'static str {
        match self.outcome() {
            Outcome::InProgress => "Your turn.",
            Outcome::HumanWin => "You won!",
            Outcome::ComputerWin => "Computer won!",
            Outcome::Tie => "It's a tie!",
        }
    }

    /// Captures what is needed to resume after a restart.
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            board: *self.game.board(),
            difficulty: self.difficulty,
            scores: self.scores,
        }
    }
}

/// Saved offline state. The result is not stored; it follows from the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchSnapshot {
    board: Board,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    scores: ScoreBoard,
}

impl MatchSnapshot {
    /// Encodes as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PersistError::new(format!("Failed to encode snapshot: {}", e)))
    }

    /// Decodes from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the text is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        serde_json::from_str(json)
            .map_err(|e| PersistError::new(format!("Failed to decode snapshot: {}", e)))
    }

    /// Writes the snapshot to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the file cannot be written.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        std::fs::write(path.as_ref(), self.to_json()?)
            .map_err(|e| PersistError::new(format!("Failed to write snapshot: {}", e)))?;
        debug!("Snapshot saved");
        Ok(())
    }

    /// Reads a snapshot, or `None` if there is no file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the file exists but cannot be read or decoded.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, PersistError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)
            .map_err(|e| PersistError::new(format!("Failed to read snapshot: {}", e)))?;
        Self::from_json(&json).map(Some)
    }
}
