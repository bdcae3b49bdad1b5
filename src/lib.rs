//! Noughts - tic-tac-toe against a tiered AI or a remote player
//!
//! Game rules and the AI planner live in `noughts_rules`; this crate adds
//! everything with state: offline matches, the score tally, and online
//! sessions kept in sync through a shared store.
//!
//! # Architecture
//!
//! - **Offline**: [`LocalMatch`] drives human-vs-computer games
//! - **Scores**: [`ScoreBoard`] tally persisted by [`ScoreStore`]
//! - **Session**: [`SessionRecord`] wire shape, [`SyncChannel`] store contract,
//!   [`MemoryStore`], lifecycle operations and the [`SessionClient`] view
//! - **Config**: [`AppConfig`] read from TOML
//!
//! # Example
//!
//! ```
//! use noughts::{Difficulty, LocalMatch, ScoreBoard};
//!
//! let mut local = LocalMatch::new(Difficulty::Expert, ScoreBoard::default());
//! let report = local.human_move(0).unwrap();
//! assert!(report.computer().is_some());
//! assert_eq!(local.status_line(), "Your turn.");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod offline;
mod scores;
mod session;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError};

// Crate-level exports - Offline play
pub use offline::{LocalMatch, MatchSnapshot, TurnReport};

// Crate-level exports - Scores
pub use scores::{PersistError, ScoreBoard, ScoreStore};

// Crate-level exports - Online sessions
pub use session::{
    MemoryStore, MoveRequest, PlayerId, RecordPatch, RecordUpdate, SUBSCRIPTION_CLOSED,
    SessionClient, SessionError, SessionErrorKind, SessionId, SessionRecord, Status, Subscription,
    SyncChannel, SyncEvent, Winner, abandon_update, create_session, join_session, list_waiting,
    try_move,
};

// Crate-level exports - Game types
pub use noughts_rules::{
    Board, Cell, Difficulty, Game, Mark, Move, MoveError, Outcome, Position, evaluate,
    select_move,
};
