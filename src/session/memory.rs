//! In-process session store.

use super::error::{SessionError, SessionErrorKind};
use super::record::{RecordUpdate, SessionId, SessionRecord};
use super::sync::{Subscription, SyncChannel, SyncEvent};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<SessionId, SessionRecord>,
    subscribers: HashMap<SessionId, Vec<mpsc::UnboundedSender<SyncEvent>>>,
    next_id: u64,
}

impl Inner {
    /// Sends `event` to every live subscriber of `id`, dropping closed ones.
    fn notify(&mut self, id: &str, event: &SyncEvent) {
        if let Some(senders) = self.subscribers.get_mut(id) {
            senders.retain(|tx| tx.send(event.clone()).is_ok());
            debug!(session_id = id, subscribers = senders.len(), "Delivered update");
            if senders.is_empty() {
                self.subscribers.remove(id);
            }
        }
    }

    fn apply(&mut self, id: &str, update: RecordUpdate) -> Result<SessionRecord, SessionError> {
        let base = update.base_version();
        let current = self.records.get(id);

        let next = match (current, update) {
            (None, RecordUpdate::Full(record)) => record.with_id(id),
            (None, RecordUpdate::Partial(_)) => {
                return Err(SessionError::new(SessionErrorKind::SessionNotFound(
                    id.to_string(),
                )));
            }
            (Some(current), _) if *current.version() != base => {
                return Err(SessionError::new(SessionErrorKind::StaleWrite {
                    expected: base,
                    found: *current.version(),
                }));
            }
            (Some(current), RecordUpdate::Full(record)) => {
                let mut next = record.with_id(id);
                next.set_version(current.version() + 1);
                next
            }
            (Some(current), RecordUpdate::Partial(patch)) => {
                let mut next = current.clone();
                next.apply_patch(&patch);
                next.set_version(current.version() + 1);
                next
            }
        };

        self.records.insert(id.to_string(), next.clone());
        Ok(next)
    }
}

/// Session store held in memory and shared by every client in the process.
///
/// Writes carry the version they were computed from and are accepted only
/// when it matches the stored version. A stale write is dropped and the
/// current snapshot is re-delivered so the stale writer's cache catches up.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory session store");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of live subscriptions on a session.
    pub fn subscriber_count(&self, id: &str) -> usize {
        self.lock()
            .subscribers
            .get(id)
            .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    /// Applies a write and reports whether it landed.
    ///
    /// Subscribers see the same thing as with [`SyncChannel::write`]: the new
    /// snapshot, or the current one again when the write is dropped.
    ///
    /// # Errors
    ///
    /// - [`SessionErrorKind::StaleWrite`] if the base version is outdated
    /// - [`SessionErrorKind::SessionNotFound`] for a patch on a missing record
    #[instrument(skip(self, update), fields(base_version = update.base_version()))]
    pub fn try_write(&self, id: &str, update: RecordUpdate) -> Result<SessionRecord, SessionError> {
        let mut inner = self.lock();
        match inner.apply(id, update) {
            Ok(record) => {
                debug!(
                    session_id = id,
                    version = record.version(),
                    status = %record.status(),
                    "Write accepted"
                );
                inner.notify(id, &SyncEvent::Snapshot(record.clone()));
                Ok(record)
            }
            Err(e) => {
                warn!(session_id = id, error = %e, "Write dropped");
                if let Some(current) = inner.records.get(id).cloned() {
                    inner.notify(id, &SyncEvent::Snapshot(current));
                }
                Err(e)
            }
        }
    }

    /// Cancels every subscription on a session with an error.
    #[instrument(skip(self))]
    pub fn fail_session(&self, id: &str, reason: &str) {
        warn!(session_id = id, reason, "Failing subscriptions");
        let mut inner = self.lock();
        inner.notify(id, &SyncEvent::Failed(reason.to_string()));
        inner.subscribers.remove(id);
    }
}

#[async_trait]
impl SyncChannel for MemoryStore {
    fn allocate_id(&self) -> SessionId {
        let mut inner = self.lock();
        inner.next_id += 1;
        format!("game-{:04}", inner.next_id)
    }

    async fn read(&self, id: &str) -> Result<Option<SessionRecord>, SessionError> {
        Ok(self.lock().records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<SessionRecord>, SessionError> {
        Ok(self.lock().records.values().cloned().collect())
    }

    fn write(&self, id: &str, update: RecordUpdate) {
        // Outcome reaches subscribers; the error is already logged.
        let _ = self.try_write(id, update);
    }

    #[instrument(skip(self))]
    fn subscribe(&self, id: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        if let Some(current) = inner.records.get(id).cloned() {
            // Receiver is alive, the send cannot fail.
            let _ = tx.send(SyncEvent::Snapshot(current));
        }
        let senders = inner.subscribers.entry(id.to_string()).or_default();
        senders.retain(|tx| !tx.is_closed());
        senders.push(tx);
        debug!(session_id = id, "Subscribed");
        Subscription::new(id.to_string(), rx)
    }
}
