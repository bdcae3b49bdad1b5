//! Online sessions: the shared record, the store contract, and the rules
//! for moving, joining and leaving.

mod arbiter;
mod client;
mod error;
mod lifecycle;
mod memory;
mod record;
mod sync;

pub use arbiter::try_move;
pub use client::{MoveRequest, SessionClient};
pub use error::{SessionError, SessionErrorKind};
pub use lifecycle::{abandon_update, create_session, join_session, list_waiting};
pub use memory::MemoryStore;
pub use record::{
    PlayerId, RecordPatch, RecordUpdate, SessionId, SessionRecord, Status, Winner,
};
pub use sync::{SUBSCRIPTION_CLOSED, Subscription, SyncChannel, SyncEvent};
