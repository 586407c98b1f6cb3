//! Session member identity.

use serde::{Deserialize, Serialize};

use super::ids::{ConnectionId, UserId};

/// A participant in a session.
///
/// Created when a connection joins a session and destroyed on
/// disconnect. `id` is stable across reconnects when the identity
/// collaborator supplies it; `connection_id` changes on every
/// connection. A `User` belongs to at most one session at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identity, verified upstream.
    pub id: UserId,
    /// Human-readable name shown to other members.
    pub display_name: String,
    /// The connection currently carrying this user.
    pub connection_id: ConnectionId,
}

impl User {
    /// Creates a new `User` bound to the given connection.
    #[must_use]
    pub fn new(id: UserId, display_name: impl Into<String>, connection_id: ConnectionId) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            connection_id,
        }
    }
}
