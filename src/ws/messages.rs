//! WebSocket message types: inbound commands and outbound broadcasts.
//!
//! Both directions use an internally tagged envelope (`type`
//! discriminator, kebab-case). Event kinds are a closed enum; anything
//! outside it fails deserialization and is answered with an `error`
//! message rather than relayed opaquely.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::domain::{EventPayload, SessionEvent, SessionId, User};

/// Channel handle that reaches one connection's write half.
///
/// Fan-out pushes into these while the session lock is held; the
/// socket task drains them outside any lock, so no lock is ever held
/// across network I/O.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Client → server messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Join a session. A connection may join exactly once; the stable
    /// user id comes from the upgrade request, not from this message.
    Join {
        /// Session to join; created lazily if unknown.
        session_id: SessionId,
        /// Name shown to other members.
        display_name: String,
    },
    /// A session event to relay to the other members. The session is
    /// resolved from the connection's binding, never from the wire.
    Event {
        /// Kind-tagged payload.
        #[serde(flatten)]
        payload: EventPayload,
    },
}

/// Server → client messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Sent to a joiner: current roster plus the replayable history.
    RoomState {
        /// All members in join order, including the joiner.
        members: Vec<User>,
        /// Retained events in arrival order.
        history: Vec<SessionEvent>,
    },
    /// A new member joined; sent to everyone else.
    UserJoined {
        /// The member that joined.
        user: User,
    },
    /// A member left; sent to everyone remaining.
    UserLeft {
        /// The member that left.
        user: User,
    },
    /// A relayed session event, stamped with the originator's identity.
    Event {
        /// Display name of the originator, resolved server-side.
        origin_display_name: String,
        /// The event, with `origin_user_id` overwritten from the
        /// originator's binding.
        #[serde(flatten)]
        event: SessionEvent,
    },
    /// Protocol error, sent only to the offending connection.
    Error {
        /// Numeric error code (see [`crate::error::GatewayError`]).
        code: u32,
        /// Human-readable message.
        message: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, UserId};

    #[test]
    fn join_parses_from_wire_shape() {
        let Ok(msg) = serde_json::from_str::<ClientMessage>(
            r#"{"type":"join","session_id":"42","display_name":"alice"}"#,
        ) else {
            panic!("join should parse");
        };
        let ClientMessage::Join {
            session_id,
            display_name,
        } = msg
        else {
            panic!("expected join variant");
        };
        assert_eq!(session_id, SessionId::from("42"));
        assert_eq!(display_name, "alice");
    }

    #[test]
    fn event_flattens_kind_into_envelope() {
        let Ok(msg) = serde_json::from_str::<ClientMessage>(
            r#"{"type":"event","kind":"cursor-move","x":3.5,"y":-1.0}"#,
        ) else {
            panic!("event should parse");
        };
        let ClientMessage::Event { payload } = msg else {
            panic!("expected event variant");
        };
        assert_eq!(payload, EventPayload::CursorMove { x: 3.5, y: -1.0 });
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn server_event_carries_origin_identity() {
        let msg = ServerMessage::Event {
            origin_display_name: "alice".to_string(),
            event: SessionEvent {
                session_id: SessionId::from("42"),
                origin_user_id: UserId::from("u-1"),
                payload: EventPayload::ClearCanvas,
            },
        };
        let Ok(json) = serde_json::to_value(&msg) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("event"));
        assert_eq!(json.get("kind").and_then(|v| v.as_str()), Some("clear-canvas"));
        assert_eq!(
            json.get("origin_user_id").and_then(|v| v.as_str()),
            Some("u-1")
        );
    }

    #[test]
    fn room_state_round_trips() {
        let user = User::new(UserId::from("u-1"), "alice", ConnectionId::new());
        let msg = ServerMessage::RoomState {
            members: vec![user],
            history: Vec::new(),
        };
        let Ok(json) = serde_json::to_string(&msg) else {
            panic!("serialization failed");
        };
        let Ok(back) = serde_json::from_str::<ServerMessage>(&json) else {
            panic!("deserialization failed");
        };
        let ServerMessage::RoomState { members, history } = back else {
            panic!("expected room-state");
        };
        assert_eq!(members.len(), 1);
        assert!(history.is_empty());
    }
}
