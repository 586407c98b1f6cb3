//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single connection: inbound text
//! frames are parsed and routed to the lifecycle manager or the
//! dispatcher, outbound messages are drained from the connection's
//! mailbox. When the stream ends — clean close or abrupt drop — the
//! loop exits and the disconnect path reconciles presence.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::{ClientMessage, Outbox, ServerMessage};
use crate::app_state::AppState;
use crate::domain::{ConnectionId, UserId};
use crate::error::GatewayError;

/// Identity extracted from the upgrade request by the authenticating
/// front proxy. The gateway trusts it as-is.
#[derive(Debug, Clone, Default)]
pub struct ClientIdentity {
    /// Verified stable user id, when the proxy supplied one.
    pub user_id: Option<UserId>,
}

/// Runs the read/write loop for a single WebSocket connection.
///
/// The connection starts unbound; a `join` message binds it to a
/// session, and the loop exiting is its disconnect. A connection never
/// rebinds — reconnecting clients come back through a fresh upgrade.
pub async fn run_connection(socket: WebSocket, state: AppState, identity: ClientIdentity) {
    let connection_id = ConnectionId::new();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    tracing::debug!(connection_id = %connection_id, "ws connection opened");

    loop {
        tokio::select! {
            // Incoming frame from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(&text, connection_id, &identity, &state, &out_tx).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Outbound message from the session fan-out
            out = out_rx.recv() => {
                // `out_tx` lives in this scope, so the channel cannot
                // close from the sender side.
                let Some(message) = out else { break };
                let Ok(json) = serde_json::to_string(&message) else {
                    tracing::warn!(connection_id = %connection_id, "unserializable outbound message");
                    continue;
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    state.connections.disconnect(connection_id).await;
    tracing::debug!(connection_id = %connection_id, "ws connection closed");
}

/// Parses and routes one inbound text frame. Errors go back to this
/// connection only; session state is never touched on a rejected frame.
async fn handle_text_message(
    text: &str,
    connection_id: ConnectionId,
    identity: &ClientIdentity,
    state: &AppState,
    out_tx: &Outbox,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(err) => {
            let _ = out_tx.send(GatewayError::MalformedMessage(err.to_string()).to_ws_message());
            return;
        }
    };

    match message {
        ClientMessage::Join {
            session_id,
            display_name,
        } => {
            let result = state
                .connections
                .join(
                    connection_id,
                    identity.user_id.clone(),
                    session_id,
                    display_name,
                    out_tx.clone(),
                )
                .await;
            if let Err(err) = result {
                tracing::warn!(connection_id = %connection_id, error = %err, "join rejected");
                let _ = out_tx.send(err.to_ws_message());
            }
        }
        ClientMessage::Event { payload } => {
            state.dispatcher.dispatch(connection_id, payload).await;
        }
    }
}
