//! Turn arbiter: decides whether a requested move may be written.

use super::error::{SessionError, SessionErrorKind};
use super::record::{SessionRecord, Winner};
use noughts_rules::{MoveError, Position};
use tracing::{debug, instrument, warn};

/// Checks a move against the latest known record and computes the record to write.
///
/// Accepts when the game has no result, the cell is empty, and it is the
/// requester's mark to move. The returned record keeps the base `version`;
/// the store bumps it when the write lands. The input record is never changed.
///
/// # Errors
///
/// - [`SessionErrorKind::NotAParticipant`] if `identity` holds neither seat
/// - [`SessionErrorKind::IllegalMove`] with [`MoveError::GameOver`],
///   [`MoveError::OutOfBounds`], [`MoveError::NotYourTurn`] or
///   [`MoveError::CellOccupied`]
#[instrument(skip(record), fields(session_id = %record.id(), turn = %record.turn()))]
pub fn try_move(
    record: &SessionRecord,
    identity: &str,
    index: usize,
) -> Result<SessionRecord, SessionError> {
    let Some(mark) = record.mark_of(identity) else {
        warn!("Move from identity outside the session");
        return Err(SessionError::new(SessionErrorKind::NotAParticipant(
            identity.to_string(),
        )));
    };

    if *record.winner() != Winner::None {
        warn!(winner = ?record.winner(), "Move after game over");
        return Err(MoveError::GameOver.into());
    }

    let pos = Position::from_index(index).ok_or_else(|| {
        warn!("Cell index out of bounds");
        SessionError::from(MoveError::OutOfBounds(index))
    })?;

    if *record.turn() != mark {
        warn!(%mark, "Player tried to move out of turn");
        return Err(MoveError::NotYourTurn(*record.turn()).into());
    }

    let board = record.board().with_mark(pos, mark).map_err(|e| {
        warn!(position = %pos, "Cell already occupied");
        SessionError::from(e)
    })?;

    let next = record.advanced(board);
    debug!(
        position = %pos,
        %mark,
        winner = ?next.winner(),
        status = %next.status(),
        "Move accepted"
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Status;
    use noughts_rules::Mark;

    fn seated(board: &str, turn: Mark) -> SessionRecord {
        let json = format!(
            r#"{{"board":{},"playerX":"xavier","playerO":"olga","turn":"{}","winner":"none","status":"playing"}}"#,
            serde_json::to_string(&board.parse::<noughts_rules::Board>().unwrap()).unwrap(),
            turn
        );
        SessionRecord::from_json("g1", &json).unwrap()
    }

    #[test]
    fn test_o_cannot_open_the_game() {
        let mut record = SessionRecord::new("g1".to_string(), "xavier".to_string());
        record.apply_patch(&crate::session::RecordPatch {
            player_o: Some(Some("olga".to_string())),
            ..Default::default()
        });
        let before = record.clone();

        let err = try_move(&record, "olga", 0).unwrap_err();
        assert_eq!(err.move_error(), Some(MoveError::NotYourTurn(Mark::X)));
        assert_eq!(record, before);
    }

    #[test]
    fn test_first_move_starts_play() {
        let record = seated(".........", Mark::X);
        let next = try_move(&record, "xavier", 4).unwrap();
        assert_eq!(*next.turn(), Mark::O);
        assert_eq!(*next.status(), Status::Playing);
        assert_eq!(*next.winner(), Winner::None);
        assert_eq!(next.board().symbols(), "    X    ");
        assert_eq!(next.version(), record.version());
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let record = seated("....X....", Mark::O);
        let err = try_move(&record, "olga", 4).unwrap_err();
        assert_eq!(
            err.move_error(),
            Some(MoveError::CellOccupied(Position::Center))
        );
    }

    #[test]
    fn test_winning_move_finishes() {
        let record = seated("XX./OO./...", Mark::X);
        let next = try_move(&record, "xavier", 2).unwrap();
        assert_eq!(*next.winner(), Winner::X);
        assert_eq!(*next.status(), Status::Finished);
    }

    #[test]
    fn test_last_cell_tie_finishes() {
        let record = seated("XOX/XOO/OX.", Mark::X);
        let next = try_move(&record, "xavier", 8).unwrap();
        assert_eq!(*next.winner(), Winner::Tie);
        assert_eq!(*next.status(), Status::Finished);
    }

    #[test]
    fn test_no_moves_after_result() {
        let record = seated("XX./OO./...", Mark::X);
        let finished = try_move(&record, "xavier", 2).unwrap();
        let err = try_move(&finished, "olga", 5).unwrap_err();
        assert_eq!(err.move_error(), Some(MoveError::GameOver));
    }

    #[test]
    fn test_stranger_rejected() {
        let record = seated(".........", Mark::X);
        let err = try_move(&record, "mallory", 0).unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::NotAParticipant(_)));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let record = seated(".........", Mark::X);
        let err = try_move(&record, "xavier", 9).unwrap_err();
        assert_eq!(err.move_error(), Some(MoveError::OutOfBounds(9)));
    }
}
