//! Mapping roster errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::RosterError;

/// JSON body carrying a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Build a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `(status, {"message": ...})` response.
pub fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(MessageResponse::new(text))).into_response()
}

/// A failed request.
///
/// Client errors carry their own message. Server errors are logged in full
/// and answered with `internal_message` only.
#[derive(Debug)]
pub struct ApiError {
    error: RosterError,
    internal_message: &'static str,
}

impl ApiError {
    /// Wrap `error`, answering server-side failures with `internal_message`.
    pub fn new(error: RosterError, internal_message: &'static str) -> Self {
        Self {
            error,
            internal_message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.error {
            RosterError::Validation(e) => message(StatusCode::BAD_REQUEST, e.to_string()),
            RosterError::NotFound(text) => message(StatusCode::NOT_FOUND, text),
            other => {
                error!("{}: {}", self.internal_message, other);
                message(StatusCode::INTERNAL_SERVER_ERROR, self.internal_message)
            }
        }
    }
}
