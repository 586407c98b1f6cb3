//! Connection lifecycle: binding sockets to sessions and tearing them
//! down again.
//!
//! Every connection moves through `Unbound → Bound(session, user) →
//! Closed`. The binding table here is the process-wide record of the
//! `Bound` state; the socket task owns the transitions. `Closed` is
//! terminal — a reconnecting client performs a fresh join with a new
//! connection id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::{ConnectionId, Session, SessionId, SessionRegistry, User, UserId};
use crate::error::GatewayError;
use crate::ws::messages::{Outbox, ServerMessage};

/// Binds connections to sessions and drives presence reconciliation.
#[derive(Debug)]
pub struct ConnectionManager {
    registry: Arc<SessionRegistry>,
    bindings: RwLock<HashMap<ConnectionId, SessionId>>,
}

impl ConnectionManager {
    /// Creates a manager over the given registry.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a reference to the inner [`SessionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Binds `connection_id` to `session_id`, creating the session if
    /// needed, and announces the new member.
    ///
    /// Under the session lock this delivers `room-state` (roster plus
    /// history snapshot) to the joiner's outbox and `user-joined` to
    /// everyone else, so no live event can interleave between the
    /// snapshot and the first fan-out the joiner sees.
    ///
    /// `verified_user_id` is the identity supplied by the upstream
    /// authenticator; when absent the connection id doubles as the
    /// user id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AlreadyJoined`] if the connection is
    /// already bound to a session. The existing binding is unaffected.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        verified_user_id: Option<UserId>,
        session_id: SessionId,
        display_name: String,
        outbox: Outbox,
    ) -> Result<User, GatewayError> {
        {
            let mut bindings = self.bindings.write().await;
            if let Some(existing) = bindings.get(&connection_id) {
                return Err(GatewayError::AlreadyJoined(existing.clone()));
            }
            bindings.insert(connection_id, session_id.clone());
        }

        let user_id = verified_user_id.unwrap_or_else(|| UserId::from(connection_id));
        let user = User::new(user_id, display_name, connection_id);

        loop {
            let session = self.registry.get_or_create(&session_id).await;
            if Self::enter_session(&session, connection_id, &user, &outbox).await {
                break;
            }
            // The session was destroyed between the lookup and the
            // lock (its last member left in that window); look it up
            // again so the roster entry lands in a registered session.
            tracing::debug!(session_id = %session_id, "joined a closing session, retrying lookup");
        }

        tracing::info!(
            session_id = %session_id,
            connection_id = %connection_id,
            user_id = %user.id,
            "user joined session"
        );
        Ok(user)
    }

    /// Adds `user` to the roster of `session` and announces the join,
    /// all under the session lock. Returns `false` without touching
    /// anything when the session was closed by the registry after the
    /// caller's lookup — the caller must repeat the lookup.
    async fn enter_session(
        session: &Mutex<Session>,
        connection_id: ConnectionId,
        user: &User,
        outbox: &Outbox,
    ) -> bool {
        let mut session = session.lock().await;
        if session.closed {
            return false;
        }

        let members = session.presence.join(user.clone(), outbox.clone());
        let history = session.log.snapshot();

        // The joiner's socket may already be gone; the pending
        // disconnect will clean up the roster entry.
        let _ = outbox.send(ServerMessage::RoomState { members, history });
        session.presence.send_to_others(
            connection_id,
            &ServerMessage::UserJoined { user: user.clone() },
        );
        true
    }

    /// Tears down a connection's binding after the transport reported
    /// a disconnect. Idempotent: unbound connections are ignored.
    ///
    /// Removes the member from the roster, announces `user-left` to the
    /// remaining members, and destroys the session if the roster is now
    /// empty.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        let Some(session_id) = self.bindings.write().await.remove(&connection_id) else {
            tracing::debug!(connection_id = %connection_id, "disconnect for unbound connection");
            return;
        };

        let Some(session) = self.registry.find(&session_id).await else {
            tracing::debug!(session_id = %session_id, "disconnect for vanished session");
            return;
        };

        let roster_empty = {
            let mut session = session.lock().await;
            let Some(user) = session.presence.leave(connection_id) else {
                tracing::debug!(
                    session_id = %session_id,
                    connection_id = %connection_id,
                    "disconnect for connection not in roster"
                );
                return;
            };
            session
                .presence
                .send_to_others(connection_id, &ServerMessage::UserLeft { user: user.clone() });
            tracing::info!(
                session_id = %session_id,
                connection_id = %connection_id,
                user_id = %user.id,
                "user left session"
            );
            session.presence.is_empty()
        };

        if roster_empty {
            self.registry.remove_if_empty(&session_id).await;
        }
    }

    /// Resolves the session a connection is bound to, if any.
    pub async fn session_for(&self, connection_id: ConnectionId) -> Option<SessionId> {
        self.bindings.read().await.get(&connection_id).cloned()
    }

    /// Number of currently bound connections.
    pub async fn binding_count(&self) -> usize {
        self.bindings.read().await.len()
    }
}
