//! Session error types.

use super::record::{PlayerId, SessionId};
use derive_more::{Display, Error};
use noughts_rules::MoveError;
use tracing::instrument;

/// What went wrong with a session operation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionErrorKind {
    /// The arbiter refused the move.
    #[display("Illegal move: {}", _0)]
    IllegalMove(MoveError),

    /// The session already has an O player.
    #[display("Session is full")]
    SessionFull,

    /// No record exists under this id.
    #[display("Session {} not found", _0)]
    SessionNotFound(SessionId),

    /// The local mark assignment has not arrived yet.
    #[display("Player identity not resolved yet")]
    IdentityUnresolved,

    /// The identity plays neither X nor O in this session.
    #[display("{} is not a player in this session", _0)]
    NotAParticipant(PlayerId),

    /// The subscription delivered an error instead of a snapshot.
    #[display("Unable to sync: {}", _0)]
    SyncFailure(String),

    /// A write was computed from an outdated record.
    #[display("Stale write: based on version {}, store is at {}", expected, found)]
    StaleWrite {
        /// Version the writer observed.
        expected: u64,
        /// Version the store holds.
        found: u64,
    },
}

/// Session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", kind, file, line)]
pub struct SessionError {
    /// What went wrong.
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: SessionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The kind of failure.
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }

    /// The rejected move's reason, when this is an illegal move.
    pub fn move_error(&self) -> Option<MoveError> {
        match self.kind {
            SessionErrorKind::IllegalMove(err) => Some(err),
            _ => None,
        }
    }

    /// Short message for the status display.
    pub fn status_line(&self) -> String {
        match &self.kind {
            SessionErrorKind::IllegalMove(err) => err.status_line().to_string(),
            SessionErrorKind::SessionFull => "Game is full!".to_string(),
            SessionErrorKind::SessionNotFound(_) => "Game not found.".to_string(),
            SessionErrorKind::IdentityUnresolved => "Waiting for player assignment".to_string(),
            SessionErrorKind::NotAParticipant(_) => "You are not in this game.".to_string(),
            SessionErrorKind::SyncFailure(_) => "Unable to sync".to_string(),
            SessionErrorKind::StaleWrite { .. } => "Game changed, try again.".to_string(),
        }
    }
}

impl From<MoveError> for SessionError {
    #[track_caller]
    fn from(err: MoveError) -> Self {
        Self::new(SessionErrorKind::IllegalMove(err))
    }
}
