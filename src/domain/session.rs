//! A single collaborative session: roster plus event history.

use chrono::{DateTime, Utc};

use super::event_log::EventLog;
use super::ids::SessionId;
use super::presence::PresenceTracker;

/// One active session.
///
/// Owned by the [`super::SessionRegistry`] behind a per-session mutex;
/// every mutation of `presence` or `log` happens with that mutex held,
/// which serializes joins, leaves, and dispatches targeting the same
/// session.
#[derive(Debug)]
pub struct Session {
    /// The session's name.
    pub id: SessionId,
    /// Ordered membership roster with outbound channels.
    pub presence: PresenceTracker,
    /// Replayable history of non-ephemeral events.
    pub log: Box<dyn EventLog>,
    /// When the first member joined.
    pub created_at: DateTime<Utc>,
    /// Set by the registry when it unmaps this session. A caller that
    /// fetched the entry before removal and locks it afterwards must
    /// treat it as gone and repeat its lookup instead of mutating an
    /// orphan.
    pub closed: bool,
}

impl Session {
    /// Creates an empty session with the given history implementation.
    #[must_use]
    pub fn new(id: SessionId, log: Box<dyn EventLog>) -> Self {
        Self {
            id,
            presence: PresenceTracker::new(),
            log,
            created_at: Utc::now(),
            closed: false,
        }
    }
}
