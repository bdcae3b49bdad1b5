//! Contract of the shared remote store.
//!
//! The store is eventually consistent: writes are fire-and-forget and every
//! mutation, including the writer's own, comes back through the subscription.
//! Only writes from one writer are delivered in order.

use super::error::SessionError;
use super::record::{RecordUpdate, SessionId, SessionRecord};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Reason reported when the store drops a subscription without a failure event.
pub const SUBSCRIPTION_CLOSED: &str = "subscription closed";

/// What a subscription delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The record as the store now holds it.
    Snapshot(SessionRecord),
    /// The subscription was cancelled or errored. Nothing follows.
    Failed(String),
}

/// A live subscription to one session.
///
/// Dropping it unsubscribes; the store stops delivering to it.
#[derive(Debug)]
pub struct Subscription {
    session_id: SessionId,
    receiver: mpsc::UnboundedReceiver<SyncEvent>,
}

impl Subscription {
    /// Wraps the receiving end of a store's delivery channel.
    pub fn new(session_id: SessionId, receiver: mpsc::UnboundedReceiver<SyncEvent>) -> Self {
        Self {
            session_id,
            receiver,
        }
    }

    /// Session this subscription follows.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Waits for the next event. `None` once the store has dropped the channel.
    pub async fn next(&mut self) -> Option<SyncEvent> {
        self.receiver.recv().await
    }

    /// Takes the next event if one is already queued.
    ///
    /// Once the store has dropped the channel and the queue is drained, this
    /// yields [`SyncEvent::Failed`] with [`SUBSCRIPTION_CLOSED`], so a silent
    /// close reads the same as a cancellation.
    pub fn try_next(&mut self) -> Option<SyncEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(SyncEvent::Failed(SUBSCRIPTION_CLOSED.to_string()))
            }
        }
    }
}

/// Read, write and subscribe on the shared session store.
#[async_trait]
pub trait SyncChannel: Send + Sync {
    /// Reserves a fresh session id.
    fn allocate_id(&self) -> SessionId;

    /// Reads one record.
    async fn read(&self, id: &str) -> Result<Option<SessionRecord>, SessionError>;

    /// Reads every record.
    async fn list(&self) -> Result<Vec<SessionRecord>, SessionError>;

    /// Issues a write and returns without waiting for it to land.
    ///
    /// The outcome is only observable through [`SyncChannel::subscribe`].
    fn write(&self, id: &str, update: RecordUpdate);

    /// Starts receiving snapshots of one record, beginning with its current value.
    fn subscribe(&self, id: &str) -> Subscription;
}
