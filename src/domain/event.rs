//! Session events: the closed set of things clients broadcast to a room.
//!
//! [`EventPayload`] is an internally tagged enum (`kind` discriminator).
//! Unknown kinds fail deserialization and are rejected as protocol
//! misuse rather than passed through opaquely.

use serde::{Deserialize, Serialize};

use super::ids::{SessionId, UserId};

/// A single event inside a session, attributed to its originator.
///
/// The `origin_user_id` on the wire is never trusted for live events;
/// the dispatcher overwrites it from the bound [`super::User`] before
/// fan-out. History entries carried by an undo/redo keep the historical
/// attribution they were broadcast with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Session this event belongs to.
    pub session_id: SessionId,
    /// Stable identity of the member that produced the event.
    pub origin_user_id: UserId,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub payload: EventPayload,
}

/// Closed set of event kinds a client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EventPayload {
    /// A drawing mutation (path created, object modified/removed).
    /// The inner data is opaque to the gateway.
    CanvasUpdate {
        /// Serialized drawing operation, produced and consumed by the
        /// rendering collaborator.
        data: serde_json::Value,
    },
    /// Wipe the whole canvas.
    ClearCanvas,
    /// Pointer position of a member. Ephemeral: relayed but never
    /// replayed, and carries no ordering guarantee.
    CursorMove {
        /// Horizontal position in canvas coordinates.
        x: f64,
        /// Vertical position in canvas coordinates.
        y: f64,
    },
    /// Undo or redo, carrying the authoritative history that replaces
    /// the session's event log.
    UndoRedo {
        /// Whether this was an undo or a redo.
        action: UndoRedoAction,
        /// The full corrected history. A joiner replaying exactly this
        /// sequence reaches the same canvas as every current member.
        history: Vec<SessionEvent>,
    },
}

impl EventPayload {
    /// Returns `true` for events that are never appended to the log.
    #[must_use]
    pub const fn is_ephemeral(&self) -> bool {
        matches!(self, Self::CursorMove { .. })
    }

    /// Returns the wire discriminator for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CanvasUpdate { .. } => "canvas-update",
            Self::ClearCanvas => "clear-canvas",
            Self::CursorMove { .. } => "cursor-move",
            Self::UndoRedo { .. } => "undo-redo",
        }
    }
}

/// Direction of an [`EventPayload::UndoRedo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoRedoAction {
    /// Step backwards in the originator's local history.
    Undo,
    /// Step forwards again.
    Redo,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn canvas_update_round_trips_with_kind_tag() {
        let payload = EventPayload::CanvasUpdate {
            data: serde_json::json!({"type": "path:created", "path": [1, 2, 3]}),
        };
        let Ok(json) = serde_json::to_value(&payload) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("kind").and_then(|v| v.as_str()), Some("canvas-update"));

        let Ok(back) = serde_json::from_value::<EventPayload>(json) else {
            panic!("deserialization failed");
        };
        assert_eq!(back, payload);
    }

    #[test]
    fn clear_canvas_is_a_bare_tag() {
        let Ok(json) = serde_json::to_value(&EventPayload::ClearCanvas) else {
            panic!("serialization failed");
        };
        assert_eq!(json, serde_json::json!({"kind": "clear-canvas"}));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = serde_json::from_value::<EventPayload>(
            serde_json::json!({"kind": "sparkle-brush", "data": {}}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn cursor_move_is_ephemeral() {
        assert!(EventPayload::CursorMove { x: 1.0, y: 2.0 }.is_ephemeral());
        assert!(!EventPayload::ClearCanvas.is_ephemeral());
    }

    #[test]
    fn session_event_flattens_payload() {
        let event = SessionEvent {
            session_id: SessionId::from("42"),
            origin_user_id: UserId::from("alice"),
            payload: EventPayload::ClearCanvas,
        };
        let Ok(json) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("kind").and_then(|v| v.as_str()), Some("clear-canvas"));
        assert_eq!(json.get("session_id").and_then(|v| v.as_str()), Some("42"));
    }
}
