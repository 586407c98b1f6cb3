//! Per-session membership roster and fan-out primitive.
//!
//! [`PresenceTracker`] owns the ordered member list of one session
//! (insertion order = join order) together with each member's outbound
//! message channel. Fan-out pushes into those channels while the
//! session lock is held, which is what gives the per-session total
//! order its teeth: two dispatches cannot interleave their sends.

use crate::ws::messages::{Outbox, ServerMessage};

use super::ids::ConnectionId;
use super::user::User;

/// One roster entry: a user plus the channel that reaches their socket.
#[derive(Debug)]
struct Member {
    user: User,
    outbox: Outbox,
}

/// Ordered set of a session's members, keyed by connection.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    members: Vec<Member>,
}

impl PresenceTracker {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `user` to the roster and returns a snapshot of all
    /// members including the new one, for delivery to the joiner.
    pub fn join(&mut self, user: User, outbox: Outbox) -> Vec<User> {
        self.members.push(Member { user, outbox });
        self.snapshot()
    }

    /// Removes the member with the given connection, returning the
    /// removed user for the departure broadcast. Idempotent: a second
    /// call for the same connection returns `None`.
    pub fn leave(&mut self, connection_id: ConnectionId) -> Option<User> {
        let index = self
            .members
            .iter()
            .position(|m| m.user.connection_id == connection_id)?;
        Some(self.members.remove(index).user)
    }

    /// Returns all members in join order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<User> {
        self.members.iter().map(|m| m.user.clone()).collect()
    }

    /// Returns the member bound to `connection_id`, if any.
    #[must_use]
    pub fn user_for(&self, connection_id: ConnectionId) -> Option<&User> {
        self.members
            .iter()
            .map(|m| &m.user)
            .find(|u| u.connection_id == connection_id)
    }

    /// Delivers `message` to every member except `origin`.
    ///
    /// Returns the number of members the message was handed to. Send
    /// failures mean the receiving socket is already tearing down; the
    /// pending disconnect will reconcile the roster, so they are only
    /// counted out, never treated as errors.
    pub fn send_to_others(&self, origin: ConnectionId, message: &ServerMessage) -> usize {
        let mut delivered = 0;
        for member in &self.members {
            if member.user.connection_id == origin {
                continue;
            }
            if member.outbox.send(message.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of members currently in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
