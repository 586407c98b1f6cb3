//! REST API layer: the small host-process surface next to `/ws`.

pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the REST surface.
///
/// Served at `/api-docs/openapi.json` (and browsable under
/// `/swagger-ui`) when the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "canvas-gateway",
        description = "Session broadcast and presence gateway REST surface"
    ),
    paths(handlers::system::health_handler, handlers::system::sessions_handler),
    components(schemas(handlers::system::HealthResponse, handlers::system::SessionDto))
)]
pub struct ApiDoc;

/// Builds the REST router.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(handlers::system::routes())
}
