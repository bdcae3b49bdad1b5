//! Creating, joining and abandoning sessions.

use super::error::{SessionError, SessionErrorKind};
use super::record::{RecordPatch, RecordUpdate, SessionRecord, Status};
use super::sync::SyncChannel;
use noughts_rules::Mark;
use tracing::{debug, info, instrument, warn};

/// Creates a session with `identity` as X and publishes it.
///
/// The record starts `waiting` with an empty board and X to move.
#[instrument(skip(store))]
pub fn create_session(store: &dyn SyncChannel, identity: &str) -> SessionRecord {
    let id = store.allocate_id();
    let record = SessionRecord::new(id.clone(), identity.to_string());
    store.write(&id, RecordUpdate::Full(record.clone()));
    info!(session_id = %id, player_x = identity, "Created session");
    record
}

/// Takes the O seat of a session.
///
/// Status stays `waiting` until the first move. Joining a session you already
/// sit in writes nothing.
///
/// Returns the record as this join would leave it, O seat filled, still at
/// the version the write was based on. The store bumps the version when the
/// write lands; subscribers see that echo.
///
/// # Errors
///
/// - [`SessionErrorKind::SessionNotFound`] if the id is unknown
/// - [`SessionErrorKind::SessionFull`] if another identity holds O
#[instrument(skip(store))]
pub async fn join_session(
    store: &dyn SyncChannel,
    id: &str,
    identity: &str,
) -> Result<SessionRecord, SessionError> {
    let record = store.read(id).await?.ok_or_else(|| {
        warn!(session_id = id, "Join on unknown session");
        SessionError::new(SessionErrorKind::SessionNotFound(id.to_string()))
    })?;

    if record.mark_of(identity).is_some() {
        debug!(session_id = id, "Already seated, nothing to write");
        return Ok(record);
    }

    if !record.is_joinable() {
        warn!(session_id = id, player_o = ?record.player_o(), "Session already has 2 players");
        return Err(SessionError::new(SessionErrorKind::SessionFull));
    }

    let patch = RecordPatch {
        player_o: Some(Some(identity.to_string())),
        status: None,
        base_version: *record.version(),
    };
    let mut joined = record;
    joined.apply_patch(&patch);
    store.write(id, RecordUpdate::Partial(patch));
    info!(session_id = id, player_o = identity, "Joined session");
    Ok(joined)
}

/// The cleanup write for a departing player, if one is due.
///
/// Due only when O leaves without having moved while the board is still
/// empty: the O seat is cleared and the session goes back to `waiting` so
/// someone else can join. X leaving, or leaving after any move, writes nothing.
#[instrument(skip(record), fields(session_id = %record.id()))]
pub fn abandon_update(
    record: &SessionRecord,
    departing: Mark,
    moved: bool,
) -> Option<RecordUpdate> {
    if departing != Mark::O || moved || !record.board().is_blank() || record.is_joinable() {
        debug!(%departing, moved, "No abandon cleanup");
        return None;
    }

    info!("O left before the first move, reopening session");
    Some(RecordUpdate::Partial(RecordPatch {
        player_o: Some(None),
        status: Some(Status::Waiting),
        base_version: *record.version(),
    }))
}

/// Sessions waiting for a second player, ordered by id.
///
/// # Errors
///
/// Propagates store read failures.
#[instrument(skip(store))]
pub async fn list_waiting(store: &dyn SyncChannel) -> Result<Vec<SessionRecord>, SessionError> {
    let mut waiting: Vec<SessionRecord> = store
        .list()
        .await?
        .into_iter()
        .filter(|record| *record.status() == Status::Waiting && record.is_joinable())
        .collect();
    waiting.sort_by(|a, b| a.id().cmp(b.id()));
    debug!(count = waiting.len(), "Listed waiting sessions");
    Ok(waiting)
}
