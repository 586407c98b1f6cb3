//! Broadcast dispatcher: routes one member's event to everyone else.
//!
//! All log mutation and fan-out for a given event happens under that
//! session's lock, which yields the per-session total order: every
//! member observes non-ephemeral events in exactly the order the
//! dispatcher received them. Cursor moves ride the same path but are
//! never logged and carry no cross-kind ordering promise.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventPayload, SessionEvent, SessionRegistry};
use crate::ws::messages::ServerMessage;

use super::lifecycle::ConnectionManager;

/// Fans inbound events out to the other members of the sender's session.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<SessionRegistry>,
    connections: Arc<ConnectionManager>,
}

impl Dispatcher {
    /// Creates a dispatcher over the shared registry and binding table.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, connections: Arc<ConnectionManager>) -> Self {
        Self {
            registry,
            connections,
        }
    }

    /// Relays `payload` from `connection_id` to the rest of its session.
    ///
    /// Returns the number of members the event was delivered to. Stale
    /// references (connection not bound, session vanished, sender no
    /// longer in the roster) drop the event silently — expected churn,
    /// not an error.
    ///
    /// The wire identity of the event is always overwritten from the
    /// sender's binding; a client cannot speak as someone else.
    pub async fn dispatch(&self, connection_id: ConnectionId, payload: EventPayload) -> usize {
        let Some(session_id) = self.connections.session_for(connection_id).await else {
            tracing::debug!(connection_id = %connection_id, "event from unbound connection, dropped");
            return 0;
        };
        let Some(session) = self.registry.find(&session_id).await else {
            tracing::debug!(session_id = %session_id, "event for vanished session, dropped");
            return 0;
        };
        let mut session = session.lock().await;

        let Some(origin) = session.presence.user_for(connection_id).cloned() else {
            tracing::debug!(
                session_id = %session_id,
                connection_id = %connection_id,
                "event from connection not in roster, dropped"
            );
            return 0;
        };

        let event = SessionEvent {
            session_id: session_id.clone(),
            origin_user_id: origin.id,
            payload,
        };

        match &event.payload {
            EventPayload::CursorMove { .. } => {
                // Ephemeral: replaying a moving pointer is meaningless.
            }
            EventPayload::UndoRedo { history, .. } => {
                // The carried history becomes the authoritative log; the
                // undo-redo itself is not appended on top of it, so a
                // fresh joiner's replay equals the new state exactly.
                let history = history
                    .iter()
                    .cloned()
                    .map(|mut entry| {
                        entry.session_id = session_id.clone();
                        entry
                    })
                    .collect();
                session.log.replace(history);
            }
            _ => session.log.append(event.clone()),
        }

        let message = ServerMessage::Event {
            origin_display_name: origin.display_name,
            event,
        };
        let delivered = session.presence.send_to_others(connection_id, &message);
        tracing::debug!(
            session_id = %session_id,
            kind = message_kind(&message),
            delivered,
            "event dispatched"
        );
        delivered
    }
}

fn message_kind(message: &ServerMessage) -> &'static str {
    match message {
        ServerMessage::Event { event, .. } => event.payload.kind(),
        _ => "",
    }
}
