//! The shared record of one online match.

use derive_getters::Getters;
use noughts_rules::{Board, Mark, Outcome, evaluate};
use serde::{Deserialize, Serialize};

/// Unique identifier for a session.
pub type SessionId = String;

/// Opaque identity of a participant.
pub type PlayerId = String;

/// Result recorded on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Winner {
    /// No result yet.
    #[default]
    #[serde(rename = "none")]
    None,
    /// X completed a line.
    X,
    /// O completed a line.
    O,
    /// Full board, no line.
    #[serde(rename = "tie")]
    Tie,
}

impl From<Outcome> for Winner {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::InProgress => Winner::None,
            Outcome::Tie => Winner::Tie,
            Outcome::HumanWin => Winner::X,
            Outcome::ComputerWin => Winner::O,
        }
    }
}

/// Lifecycle status of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// Created, no move accepted yet.
    #[default]
    Waiting,
    /// At least one move accepted, no result.
    Playing,
    /// A winner or tie is recorded.
    Finished,
}

/// One online match as stored in the shared store.
///
/// Wire shape (JSON):
///
/// ```text
/// { "board": ["X","O"," ", ...9], "playerX": "uid"|null, "playerO": "uid"|null,
///   "turn": "X"|"O", "winner": "none"|"X"|"O"|"tie",
///   "status": "waiting"|"playing"|"finished", "version": 3 }
/// ```
///
/// The id is the store key and is not part of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(skip)]
    id: SessionId,
    board: Board,
    player_x: Option<PlayerId>,
    player_o: Option<PlayerId>,
    turn: Mark,
    winner: Winner,
    status: Status,
    #[serde(default)]
    version: u64,
}

impl SessionRecord {
    /// A fresh session waiting for an opponent: empty board, X to move.
    pub fn new(id: SessionId, player_x: PlayerId) -> Self {
        Self {
            id,
            board: Board::new(),
            player_x: Some(player_x),
            player_o: None,
            turn: Mark::X,
            winner: Winner::None,
            status: Status::Waiting,
            version: 0,
        }
    }

    /// Attaches the store key after deserialization.
    pub fn with_id(mut self, id: impl Into<SessionId>) -> Self {
        self.id = id.into();
        self
    }

    /// The mark owned by `identity`, if it plays in this session.
    pub fn mark_of(&self, identity: &str) -> Option<Mark> {
        if self.player_x.as_deref() == Some(identity) {
            Some(Mark::X)
        } else if self.player_o.as_deref() == Some(identity) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Outcome derived from the board.
    pub fn outcome(&self) -> Outcome {
        evaluate(&self.board)
    }

    /// Returns true while the O seat is free.
    pub fn is_joinable(&self) -> bool {
        self.player_o.is_none()
    }

    /// Serializes to the wire shape.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which does not occur for well-formed records.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses the wire shape and attaches the store key.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed documents, including boards that are not 9 cells.
    pub fn from_json(id: impl Into<SessionId>, json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(|record| record.with_id(id))
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Next record after a move accepted by the arbiter.
    pub(crate) fn advanced(&self, board: Board) -> Self {
        let outcome = evaluate(&board);
        let status = if outcome.is_terminal() {
            Status::Finished
        } else {
            Status::Playing
        };
        Self {
            board,
            turn: self.turn.opponent(),
            winner: Winner::from(outcome),
            status,
            ..self.clone()
        }
    }

    pub(crate) fn apply_patch(&mut self, patch: &RecordPatch) {
        if let Some(player_o) = &patch.player_o {
            self.player_o = player_o.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// A partial update: only the fields set here are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordPatch {
    /// New O seat; `Some(None)` clears it.
    pub player_o: Option<Option<PlayerId>>,
    /// New status.
    pub status: Option<Status>,
    /// Version of the record this patch was computed from.
    pub base_version: u64,
}

/// A write to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdate {
    /// Replace the whole record; its `version` is the base it was computed from.
    Full(SessionRecord),
    /// Change some fields.
    Partial(RecordPatch),
}

impl RecordUpdate {
    /// Version the writer observed before computing this update.
    pub fn base_version(&self) -> u64 {
        match self {
            RecordUpdate::Full(record) => record.version,
            RecordUpdate::Partial(patch) => patch.base_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_wire_shape() {
        let record = SessionRecord::new("g1".to_string(), "alice".to_string());
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["playerX"], "alice");
        assert_eq!(value["playerO"], serde_json::Value::Null);
        assert_eq!(value["turn"], "X");
        assert_eq!(value["winner"], "none");
        assert_eq!(value["status"], "waiting");
        assert_eq!(value["board"].as_array().unwrap().len(), 9);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_parse_without_version_defaults_to_zero() {
        let json = r#"{"board":["X"," "," "," ","O"," "," "," "," "],
            "playerX":"a","playerO":"b","turn":"X","winner":"none","status":"playing"}"#;
        let record = SessionRecord::from_json("g7", json).unwrap();
        assert_eq!(record.id(), "g7");
        assert_eq!(*record.version(), 0);
        assert_eq!(*record.status(), Status::Playing);
    }

    #[test]
    fn test_tie_winner_wire_value() {
        assert_eq!(serde_json::to_string(&Winner::Tie).unwrap(), "\"tie\"");
        assert_eq!(serde_json::to_string(&Winner::O).unwrap(), "\"O\"");
    }

    #[test]
    fn test_mark_of() {
        let mut record = SessionRecord::new("g1".to_string(), "alice".to_string());
        record.player_o = Some("bob".to_string());
        assert_eq!(record.mark_of("alice"), Some(Mark::X));
        assert_eq!(record.mark_of("bob"), Some(Mark::O));
        assert_eq!(record.mark_of("carol"), None);
    }

    #[test]
    fn test_patch_clears_o_seat() {
        let mut record = SessionRecord::new("g1".to_string(), "alice".to_string());
        record.player_o = Some("bob".to_string());
        record.apply_patch(&RecordPatch {
            player_o: Some(None),
            status: Some(Status::Waiting),
            base_version: 0,
        });
        assert!(record.is_joinable());
    }
}
