//! WebSocket layer: connection handling, message shapes, upgrade.
//!
//! The WebSocket endpoint at `/ws` carries all session traffic: joins,
//! event fan-out, presence notifications, and protocol errors.

pub mod connection;
pub mod handler;
pub mod messages;
