//! Gateway error types with HTTP and WebSocket error mapping.
//!
//! [`GatewayError`] is the central error type. Protocol misuse over the
//! WebSocket is answered with an `error` message to the offending
//! connection only; the REST surface maps variants to HTTP status codes
//! and a structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::SessionId;
use crate::ws::messages::ServerMessage;

/// Structured JSON error response body.
///
/// All REST error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "connection already joined session 42",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status     |
/// |-----------|-----------------|-----------------|
/// | 1000–1999 | Malformed input | 400 Bad Request |
/// | 2000–2999 | Protocol misuse | 409 Conflict    |
///
/// Stale references (events from connections no longer in a roster,
/// sessions that vanished mid-flight) are not errors: they are dropped
/// silently at `debug` level.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The inbound message could not be parsed into a known shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A `join` arrived on a connection that is already bound to a
    /// session. A connection belongs to exactly one session for its
    /// lifetime; reconnects must open a fresh connection.
    #[error("connection already joined session {0}")]
    AlreadyJoined(SessionId),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedMessage(_) => 1001,
            Self::AlreadyJoined(_) => 2001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedMessage(_) => StatusCode::BAD_REQUEST,
            Self::AlreadyJoined(_) => StatusCode::CONFLICT,
        }
    }

    /// Renders this error as a WebSocket `error` message for the
    /// offending connection.
    #[must_use]
    pub fn to_ws_message(&self) -> ServerMessage {
        ServerMessage::Error {
            code: self.error_code(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn already_joined_maps_to_conflict() {
        let err = GatewayError::AlreadyJoined(SessionId::from("42"));
        assert_eq!(err.error_code(), 2001);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn ws_message_carries_code_and_text() {
        let err = GatewayError::MalformedMessage("bad json".to_string());
        let ServerMessage::Error { code, message } = err.to_ws_message() else {
            panic!("expected error message");
        };
        assert_eq!(code, 1001);
        assert!(message.contains("bad json"));
    }
}
