//! One participant's view of an online session.
//!
//! The client owns the only mutable copy of the session it displays. That
//! copy changes in exactly one place, [`SessionClient::handle`], which
//! consumes store events in arrival order and overwrites the cache with each
//! snapshot. A move request is checked by the arbiter and written, but the
//! cache is not touched until the store echoes the write back.

use super::arbiter::try_move;
use super::error::{SessionError, SessionErrorKind};
use super::lifecycle::abandon_update;
use super::record::{PlayerId, RecordUpdate, SessionId, SessionRecord, Winner};
use super::sync::{SUBSCRIPTION_CLOSED, Subscription, SyncChannel, SyncEvent};
use noughts_rules::Mark;
use noughts_rules::invariants::{
    BoardTransition, MonotonicBoardInvariant, TurnParityInvariant, TurnState, check,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// What became of a move request that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    /// The move was written; the echo will update the view.
    Sent,
    /// Identity or first snapshot not known yet; the tap was ignored.
    NotReady,
}

/// A participant's live connection to one session.
///
/// Entering subscribes; leaving (explicitly or by drop) unsubscribes and, when
/// O departs before anyone moved, reopens the session.
pub struct SessionClient {
    store: Arc<dyn SyncChannel>,
    session_id: SessionId,
    identity: PlayerId,
    mark: Option<Mark>,
    cached: Option<SessionRecord>,
    subscription: Option<Subscription>,
    sync_error: Option<String>,
    moved: bool,
    departed: bool,
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("session_id", &self.session_id)
            .field("identity", &self.identity)
            .field("mark", &self.mark)
            .field("cached", &self.cached)
            .field("sync_error", &self.sync_error)
            .field("moved", &self.moved)
            .finish_non_exhaustive()
    }
}

impl SessionClient {
    /// Enters a session screen: subscribes and waits for nothing.
    ///
    /// The mark is unknown until [`SessionClient::resolve_identity`] completes.
    #[instrument(skip(store))]
    pub fn enter(store: Arc<dyn SyncChannel>, session_id: &str, identity: &str) -> Self {
        let subscription = store.subscribe(session_id);
        info!(session_id, identity, "Entered session");
        Self {
            store,
            session_id: session_id.to_string(),
            identity: identity.to_string(),
            mark: None,
            cached: None,
            subscription: Some(subscription),
            sync_error: None,
            moved: false,
            departed: false,
        }
    }

    /// Looks up which seat this identity holds.
    ///
    /// # Errors
    ///
    /// - [`SessionErrorKind::SessionNotFound`] if the record is gone
    /// - [`SessionErrorKind::NotAParticipant`] if the identity holds no seat
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn resolve_identity(&mut self) -> Result<Mark, SessionError> {
        let record = self.store.read(&self.session_id).await?.ok_or_else(|| {
            SessionError::new(SessionErrorKind::SessionNotFound(self.session_id.clone()))
        })?;
        let mark = record.mark_of(&self.identity).ok_or_else(|| {
            warn!(identity = %self.identity, "Identity holds no seat");
            SessionError::new(SessionErrorKind::NotAParticipant(self.identity.clone()))
        })?;
        info!(%mark, "Player assigned");
        self.mark = Some(mark);
        Ok(mark)
    }

    /// Applies one store event to the local view.
    ///
    /// Snapshots overwrite the cache as-is. A failure is terminal: the
    /// subscription is released and later events are ignored.
    #[instrument(skip(self, event), fields(session_id = %self.session_id))]
    pub fn handle(&mut self, event: SyncEvent) {
        if self.sync_error.is_some() {
            debug!("Ignoring event after sync failure");
            return;
        }
        match event {
            SyncEvent::Snapshot(record) => {
                self.check_snapshot(&record);
                debug!(
                    version = record.version(),
                    turn = %record.turn(),
                    status = %record.status(),
                    "Cache overwritten"
                );
                self.cached = Some(record);
            }
            SyncEvent::Failed(reason) => {
                warn!(%reason, "Subscription failed");
                self.sync_error = Some(reason);
                self.subscription = None;
            }
        }
    }

    /// Handles every event already queued. Returns how many were handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.subscription.as_mut().and_then(Subscription::try_next) {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Waits for the next event and handles it.
    ///
    /// Returns `false` once no more events can arrive. A channel closed by the
    /// store without a failure event is handled as a sync failure.
    pub async fn pump(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => {
                warn!(session_id = %self.session_id, "Store closed the subscription");
                self.handle(SyncEvent::Failed(SUBSCRIPTION_CLOSED.to_string()));
                false
            }
        }
    }

    /// Asks to place this player's mark at `index`.
    ///
    /// # Errors
    ///
    /// - [`SessionErrorKind::SyncFailure`] after the subscription failed
    /// - anything [`try_move`] rejects; nothing is written then
    #[instrument(skip(self), fields(session_id = %self.session_id, mark = ?self.mark))]
    pub fn request_move(&mut self, index: usize) -> Result<MoveRequest, SessionError> {
        if let Some(reason) = &self.sync_error {
            return Err(SessionError::new(SessionErrorKind::SyncFailure(
                reason.clone(),
            )));
        }
        let record = match self.ready_record() {
            Ok(record) => record,
            Err(e) => {
                debug!(reason = %e.kind(), "Not ready, ignoring move");
                return Ok(MoveRequest::NotReady);
            }
        };

        let next = try_move(record, &self.identity, index)?;
        self.moved = true;
        self.store.write(&self.session_id, RecordUpdate::Full(next));
        debug!(index, "Move written, awaiting echo");
        Ok(MoveRequest::Sent)
    }

    /// The cached record, once both the seat and a first snapshot are known.
    ///
    /// # Errors
    ///
    /// [`SessionErrorKind::IdentityUnresolved`] until [`SessionClient::resolve_identity`]
    /// has succeeded and a snapshot has arrived.
    pub fn ready_record(&self) -> Result<&SessionRecord, SessionError> {
        match (self.mark, self.cached.as_ref()) {
            (Some(_), Some(record)) => Ok(record),
            _ => Err(SessionError::new(SessionErrorKind::IdentityUnresolved)),
        }
    }

    /// Status text for display.
    pub fn status_line(&self) -> String {
        if self.sync_error.is_some() {
            return "Unable to sync".to_string();
        }
        let record = match self.ready_record() {
            Ok(record) => record,
            Err(e) => return e.status_line(),
        };
        match record.winner() {
            Winner::X => "Winner: Player X!".to_string(),
            Winner::O => "Winner: Player O!".to_string(),
            Winner::Tie => "It's a tie!".to_string(),
            Winner::None => format!("Turn: {}", record.turn()),
        }
    }

    /// Leaves the session screen.
    pub fn leave(mut self) {
        self.depart();
    }

    /// Latest snapshot received.
    pub fn record(&self) -> Option<&SessionRecord> {
        self.cached.as_ref()
    }

    /// This player's mark, once resolved.
    pub fn mark(&self) -> Option<Mark> {
        self.mark
    }

    /// Session id.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Local identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns true once the subscription has failed.
    pub fn is_sync_failed(&self) -> bool {
        self.sync_error.is_some()
    }

    fn check_snapshot(&self, next: &SessionRecord) {
        let turn = TurnState {
            board: *next.board(),
            turn: *next.turn(),
        };
        if let Err(violation) = check::<_, TurnParityInvariant>(&turn) {
            warn!(%violation, "Inbound snapshot breaks turn order");
        }
        if let Some(previous) = &self.cached {
            let transition = BoardTransition {
                previous: *previous.board(),
                next: *next.board(),
            };
            if let Err(violation) = check::<_, MonotonicBoardInvariant>(&transition) {
                warn!(%violation, "Inbound snapshot rewrites the board");
            }
        }
    }

    fn depart(&mut self) {
        if self.departed {
            return;
        }
        self.departed = true;
        self.subscription = None;

        if let (Some(mark), Some(record)) = (self.mark, self.cached.as_ref())
            && let Some(update) = abandon_update(record, mark, self.moved)
        {
            self.store.write(&self.session_id, update);
        }
        info!(session_id = %self.session_id, identity = %self.identity, "Left session");
    }
}

impl Drop for SessionClient {
    fn drop(&mut self) {
        self.depart();
    }
}
