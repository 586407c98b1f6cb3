//! Axum WebSocket upgrade handler.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::{ClientIdentity, run_connection};
use crate::app_state::AppState;
use crate::domain::UserId;

/// Query parameters placed on the upgrade request by the authenticating
/// front proxy.
#[derive(Debug, Deserialize)]
pub struct IdentityParams {
    /// Verified stable user id. Absent for anonymous connections.
    pub user_id: Option<String>,
}

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<IdentityParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let identity = ClientIdentity {
        user_id: params.user_id.map(UserId::from),
    };

    ws.on_upgrade(move |socket| run_connection(socket, state, identity))
}
