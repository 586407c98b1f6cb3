//! Domain layer: identifiers, session state, presence, and history.
//!
//! This module contains the server-side model of a collaborative
//! session: typed identifiers, the member roster, the replayable event
//! log, and the registry that stores one session per id with
//! per-session locking.

pub mod event;
pub mod event_log;
pub mod ids;
pub mod presence;
pub mod registry;
pub mod session;
pub mod user;

pub use event::{EventPayload, SessionEvent, UndoRedoAction};
pub use event_log::{BoundedEventLog, EventLog, InMemoryEventLog};
pub use ids::{ConnectionId, SessionId, UserId};
pub use presence::PresenceTracker;
pub use registry::{SessionRegistry, SessionSummary};
pub use session::Session;
pub use user::User;
