//! Service layer: connection lifecycle and event broadcast.

pub mod dispatcher;
pub mod lifecycle;

pub use dispatcher::Dispatcher;
pub use lifecycle::ConnectionManager;
