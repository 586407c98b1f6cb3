//! Shared helpers for integration tests: an in-process server on an
//! ephemeral port and thin JSON-over-WebSocket client utilities.
#![allow(clippy::panic, dead_code)]

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use canvas_gateway::app_state::AppState;
use canvas_gateway::config::GatewayConfig;
use canvas_gateway::router;

/// A connected test WebSocket client.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Spawns the gateway on an ephemeral local port and returns its address.
pub async fn spawn_server() -> SocketAddr {
    spawn_server_with(GatewayConfig::default()).await
}

/// Spawns the gateway with the given configuration.
pub async fn spawn_server_with(config: GatewayConfig) -> SocketAddr {
    let state = AppState::new(&config);
    let app = router(state);
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("failed to read listener address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Opens a WebSocket connection, optionally with a verified user id on
/// the query string (as the authenticating proxy would place it).
pub async fn connect(addr: SocketAddr, user_id: Option<&str>) -> WsClient {
    let url = match user_id {
        Some(id) => format!("ws://{addr}/ws?user_id={id}"),
        None => format!("ws://{addr}/ws"),
    };
    let Ok((ws, _)) = connect_async(url).await else {
        panic!("websocket connect failed");
    };
    ws
}

/// Sends one JSON message.
pub async fn send_json(ws: &mut WsClient, value: serde_json::Value) {
    let Ok(()) = ws.send(Message::text(value.to_string())).await else {
        panic!("websocket send failed");
    };
}

/// Receives the next text frame as JSON, skipping control frames.
pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let Some(Ok(msg)) = ws.next().await else {
            panic!("websocket closed while waiting for a message");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("server sent invalid JSON: {text}");
            };
            return value;
        }
    }
}

/// Joins a session and returns the `room-state` message.
pub async fn join(ws: &mut WsClient, session_id: &str, display_name: &str) -> serde_json::Value {
    send_json(
        ws,
        serde_json::json!({
            "type": "join",
            "session_id": session_id,
            "display_name": display_name,
        }),
    )
    .await;
    let state = recv_json(ws).await;
    assert_eq!(msg_type(&state), "room-state");
    state
}

/// Returns the `type` discriminator of a server message.
pub fn msg_type(value: &serde_json::Value) -> &str {
    value.get("type").and_then(|v| v.as_str()).unwrap_or("")
}

/// Returns a string field of a JSON object.
pub fn str_field<'a>(value: &'a serde_json::Value, field: &str) -> &'a str {
    value.get(field).and_then(|v| v.as_str()).unwrap_or("")
}
