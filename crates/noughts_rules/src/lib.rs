//! Pure tic-tac-toe rules and tiered move selection.
//!
//! # Architecture
//!
//! - **Types**: [`Mark`], [`Cell`], [`Board`], [`Position`]
//! - **Rules**: [`evaluate`] derives an [`Outcome`] from a board
//! - **Planner**: [`select_move`] picks a cell for the computer by [`Difficulty`]
//! - **Game**: [`Game`] plays one local game, X first
//! - **Invariants**: properties checked on inbound snapshots
//!
//! # Example
//!
//! ```
//! use noughts_rules::{Board, Difficulty, Outcome, Position, evaluate, select_move};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let board: Board = "XX./OO./X..".parse()?;
//! assert_eq!(evaluate(&board), Outcome::InProgress);
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! assert_eq!(select_move(&board, Difficulty::Expert, &mut rng), Some(Position::MiddleRight));
//! # Ok::<(), noughts_rules::BoardParseError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod difficulty;
mod game;
pub mod invariants;
mod planner;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use difficulty::Difficulty;
pub use game::Game;
pub use planner::{blocking_move, random_move, select_move, select_move_for, winning_move};
pub use position::Position;
pub use rules::{Outcome, evaluate};
pub use types::{Board, BoardParseError, Cell, CellParseError, Mark};
