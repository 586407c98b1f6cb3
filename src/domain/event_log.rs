//! Append-only event history with point-in-time replay snapshots.
//!
//! [`EventLog`] is a trait so the host can swap in a bounded
//! implementation without touching any caller: the dispatcher and the
//! lifecycle manager only ever see the trait. Snapshot consistency is
//! guaranteed by the per-session lock — all log access happens while
//! the owning [`super::Session`] is held exclusively.

use std::collections::VecDeque;
use std::fmt;

use super::event::SessionEvent;

/// Ordered history of a session's non-ephemeral events.
pub trait EventLog: fmt::Debug + Send {
    /// Appends an event at the tail. O(1) amortized.
    fn append(&mut self, event: SessionEvent);

    /// Returns a point-in-time copy of all retained events in arrival
    /// order, for replay to a late joiner.
    fn snapshot(&self) -> Vec<SessionEvent>;

    /// Discards the current history and substitutes `history` wholesale.
    /// Afterwards the log is indistinguishable from one that had always
    /// contained exactly `history`.
    fn replace(&mut self, history: Vec<SessionEvent>);

    /// Number of retained events.
    fn len(&self) -> usize;

    /// Returns `true` if no events are retained.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory log. The default; capacity is an open question
/// for the host (see `HISTORY_CAPACITY`).
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: Vec<SessionEvent>,
}

impl InMemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    fn snapshot(&self) -> Vec<SessionEvent> {
        self.events.clone()
    }

    fn replace(&mut self, history: Vec<SessionEvent>) {
        self.events = history;
    }

    fn len(&self) -> usize {
        self.events.len()
    }
}

/// Log bounded to the most recent `capacity` events.
///
/// When full, appends evict the oldest entry. Replays from a saturated
/// bounded log reconstruct only the retained suffix; the host opts into
/// this trade-off via configuration.
#[derive(Debug)]
pub struct BoundedEventLog {
    events: VecDeque<SessionEvent>,
    capacity: usize,
}

impl BoundedEventLog {
    /// Creates an empty log retaining at most `capacity` events.
    /// A capacity of zero retains nothing.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// The configured maximum number of retained events.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl EventLog for BoundedEventLog {
    fn append(&mut self, event: SessionEvent) {
        if self.capacity == 0 {
            return;
        }
        while self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn snapshot(&self) -> Vec<SessionEvent> {
        self.events.iter().cloned().collect()
    }

    fn replace(&mut self, history: Vec<SessionEvent>) {
        let skip = history.len().saturating_sub(self.capacity);
        self.events = history.into_iter().skip(skip).collect();
    }

    fn len(&self) -> usize {
        self.events.len()
    }
}
