//! Concurrent session storage with per-session locking.
//!
//! [`SessionRegistry`] stores all active sessions in a `HashMap` where
//! each entry is individually protected by a [`tokio::sync::Mutex`].
//! The outer map lock is only ever held for insert/lookup/remove; all
//! session work happens under the inner per-session lock, so different
//! sessions proceed fully in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use super::event_log::{BoundedEventLog, EventLog, InMemoryEventLog};
use super::ids::SessionId;
use super::session::Session;

/// Point-in-time description of one active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// The session's name.
    pub id: SessionId,
    /// Current number of members.
    pub member_count: usize,
    /// Number of retained history events.
    pub history_len: usize,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// Central store for all active sessions.
///
/// Sessions are created lazily on first join and removed as soon as
/// their roster empties. The registry never holds two sessions with
/// the same id: creation and removal both happen under the outer write
/// lock.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
    /// History cap applied to newly created sessions; 0 = unbounded.
    history_capacity: usize,
}

impl SessionRegistry {
    /// Creates an empty registry. `history_capacity` selects the event
    /// log implementation for new sessions: 0 keeps full history,
    /// anything else retains only the newest `history_capacity` events.
    #[must_use]
    pub fn new(history_capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_capacity,
        }
    }

    fn make_log(&self) -> Box<dyn EventLog> {
        if self.history_capacity == 0 {
            Box::new(InMemoryEventLog::new())
        } else {
            Box::new(BoundedEventLog::new(self.history_capacity))
        }
    }

    /// Returns the session with the given id, creating an empty one if
    /// it does not exist. Never fails.
    pub async fn get_or_create(&self, id: &SessionId) -> Arc<Mutex<Session>> {
        if let Some(session) = self.sessions.read().await.get(id) {
            return Arc::clone(session);
        }
        let mut map = self.sessions.write().await;
        // Re-check under the write lock: another join may have raced us.
        if let Some(session) = map.get(id) {
            return Arc::clone(session);
        }
        tracing::info!(session_id = %id, "session created");
        let session = Arc::new(Mutex::new(Session::new(id.clone(), self.make_log())));
        map.insert(id.clone(), Arc::clone(&session));
        session
    }

    /// Non-creating lookup. Callers that get `None` are holding a stale
    /// reference (the session vanished between message arrival and
    /// processing) and should drop the triggering message silently.
    pub async fn find(&self, id: &SessionId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(id).map(Arc::clone)
    }

    /// Removes the session only if its roster is empty at call time.
    ///
    /// No-op when members remain: this guards the race where a join
    /// lands just as the last member is leaving. The emptiness check
    /// happens under the outer write lock, so no join can slip in
    /// between the check and the removal. The session is marked
    /// [`Session::closed`] under its own lock before it is unmapped:
    /// a joiner that fetched the entry before removal and only locks
    /// it afterwards sees the marker and retries its lookup rather
    /// than entering an orphan the dispatcher can no longer resolve.
    pub async fn remove_if_empty(&self, id: &SessionId) -> bool {
        let mut map = self.sessions.write().await;
        let Some(session) = map.get(id).map(Arc::clone) else {
            return false;
        };
        let mut session = session.lock().await;
        if !session.presence.is_empty() {
            return false;
        }
        session.closed = true;
        drop(session);
        map.remove(id);
        tracing::info!(session_id = %id, "session destroyed");
        true
    }

    /// Returns summaries of all active sessions.
    pub async fn summaries(&self) -> Vec<SessionSummary> {
        let map = self.sessions.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for session in map.values() {
            let session = session.lock().await;
            summaries.push(SessionSummary {
                id: session.id.clone(),
                member_count: session.presence.len(),
                history_len: session.log.len(),
                created_at: session.created_at,
            });
        }
        summaries
    }

    /// Number of active sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no sessions are active.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::{EventPayload, SessionEvent};
    use crate::domain::ids::{ConnectionId, UserId};
    use crate::domain::user::User;
    use tokio::sync::mpsc;

    fn make_event(n: u64) -> SessionEvent {
        SessionEvent {
            session_id: SessionId::from("42"),
            origin_user_id: UserId::from("u"),
            payload: EventPayload::CanvasUpdate {
                data: serde_json::json!(n),
            },
        }
    }

    fn join_someone(session: &mut Session, name: &str) -> ConnectionId {
        let (tx, rx) = mpsc::unbounded_channel();
        // Keep the receiver alive for the duration of the test body.
        std::mem::forget(rx);
        let user = User::new(UserId::from(name), name, ConnectionId::new());
        let conn = user.connection_id;
        session.presence.join(user, tx);
        conn
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let registry = SessionRegistry::new(0);
        let id = SessionId::from("42");

        let first = registry.get_or_create(&id).await;
        let second = registry.get_or_create(&id).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn find_does_not_create() {
        let registry = SessionRegistry::new(0);
        assert!(registry.find(&SessionId::from("ghost")).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn remove_if_empty_removes_empty_session() {
        let registry = SessionRegistry::new(0);
        let id = SessionId::from("42");
        let _ = registry.get_or_create(&id).await;

        assert!(registry.remove_if_empty(&id).await);
        assert!(registry.find(&id).await.is_none());
    }

    #[tokio::test]
    async fn remove_if_empty_is_a_noop_with_members() {
        let registry = SessionRegistry::new(0);
        let id = SessionId::from("42");
        let session = registry.get_or_create(&id).await;
        join_someone(&mut *session.lock().await, "alice");

        assert!(!registry.remove_if_empty(&id).await);
        assert!(registry.find(&id).await.is_some());
    }

    #[tokio::test]
    async fn remove_unknown_session_is_a_noop() {
        let registry = SessionRegistry::new(0);
        assert!(!registry.remove_if_empty(&SessionId::from("ghost")).await);
    }

    #[tokio::test]
    async fn summaries_report_membership() {
        let registry = SessionRegistry::new(0);
        let id = SessionId::from("42");
        let session = registry.get_or_create(&id).await;
        join_someone(&mut *session.lock().await, "alice");
        join_someone(&mut *session.lock().await, "bob");

        let summaries = registry.summaries().await;
        assert_eq!(summaries.len(), 1);
        let Some(summary) = summaries.first() else {
            panic!("summary missing");
        };
        assert_eq!(summary.id, id);
        assert_eq!(summary.member_count, 2);
        assert_eq!(summary.history_len, 0);
    }

    #[tokio::test]
    async fn bounded_history_capacity_is_applied() {
        let registry = SessionRegistry::new(2);
        let id = SessionId::from("42");
        let session = registry.get_or_create(&id).await;
        let mut session = session.lock().await;

        session.log.append(make_event(1));
        session.log.append(make_event(2));
        session.log.append(make_event(3));

        // Only the newest two survive: the capacity selected the
        // bounded implementation.
        assert_eq!(session.log.len(), 2);
        assert_eq!(session.log.snapshot(), vec![make_event(2), make_event(3)]);
    }

    #[tokio::test]
    async fn unbounded_sessions_keep_full_history() {
        let registry = SessionRegistry::new(0);
        let id = SessionId::from("42");
        let session = registry.get_or_create(&id).await;
        let mut session = session.lock().await;

        for n in 0..64 {
            session.log.append(make_event(n));
        }
        assert_eq!(session.log.len(), 64);
    }

    #[tokio::test]
    async fn removal_marks_the_session_closed() {
        let registry = SessionRegistry::new(0);
        let id = SessionId::from("42");

        // A joiner's lookup completes, then the last member's leave
        // removes the session before the joiner can lock it.
        let stale = registry.get_or_create(&id).await;
        assert!(registry.remove_if_empty(&id).await);

        // The joiner locks the unmapped entry and must be able to see
        // it is dead.
        assert!(stale.lock().await.closed);

        // Retrying the lookup yields a fresh, live, registered session.
        let live = registry.get_or_create(&id).await;
        assert!(!Arc::ptr_eq(&stale, &live));
        assert!(!live.lock().await.closed);
        assert!(registry.find(&id).await.is_some());
    }
}
