//! Type-safe identifiers for sessions, users, and connections.
//!
//! [`ConnectionId`] is a newtype wrapper around [`uuid::Uuid`] (v4),
//! minted once per WebSocket connection. [`SessionId`] and [`UserId`]
//! wrap the opaque strings supplied by clients and the identity
//! collaborator so the three cannot be confused with each other.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a single WebSocket connection.
///
/// Wraps a UUID v4. Generated at upgrade time and immutable for the
/// lifetime of the socket. A reconnecting client always receives a new
/// `ConnectionId`; only [`UserId`] is stable across reconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque name of a collaborative session (the "room" a client joins).
///
/// Sessions are created lazily on first join of an unknown id, so any
/// non-empty string is a valid `SessionId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a user, as verified by the identity collaborator.
///
/// The gateway never verifies this value itself; it trusts whatever the
/// authenticating front proxy placed on the upgrade request. When no
/// verified identity is present, the connection id doubles as the user
/// id for the lifetime of that connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<ConnectionId> for UserId {
    fn from(id: ConnectionId) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
