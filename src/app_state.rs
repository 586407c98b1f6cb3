//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::domain::SessionRegistry;
use crate::service::{ConnectionManager, Dispatcher};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Owns the process-wide session registry and the components built on
/// it. Created once at startup and torn down at shutdown; nothing here
/// is ambient global state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session store, one entry per active session.
    pub registry: Arc<SessionRegistry>,
    /// Connection lifecycle manager and binding table.
    pub connections: Arc<ConnectionManager>,
    /// Event fan-out.
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Builds the full component graph from configuration.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        let registry = Arc::new(SessionRegistry::new(config.history_capacity));
        let connections = Arc::new(ConnectionManager::new(Arc::clone(&registry)));
        let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::clone(&connections));
        Self {
            registry,
            connections,
            dispatcher,
        }
    }
}
