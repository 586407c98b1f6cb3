//! # canvas-gateway
//!
//! WebSocket session broadcast and presence gateway for collaborative
//! whiteboards.
//!
//! Clients join named sessions over a single WebSocket endpoint; the
//! gateway relays drawing, cursor, and undo/redo events between the
//! members of a session, replays accumulated history to late joiners,
//! and reconciles presence on disconnect. Identity verification, canvas
//! rendering, and transport keep-alives are external collaborators —
//! this service is a coordination layer.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ConnectionManager (service/)
//!     ├── Dispatcher (service/)
//!     │
//!     ├── SessionRegistry (domain/)
//!     └── Session = PresenceTracker + EventLog (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete router: REST surface plus the `/ws` endpoint.
pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
