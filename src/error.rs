//! Broker error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("External account not found")]
    ExternalAccountNotFound,

    #[error("Account lookup unavailable: {0}")]
    ResolverUnavailable(String),

    #[error("Verification not yet confirmed")]
    NotYetConfirmed,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("No such link")]
    NoSuchLink,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            LinkError::ExternalAccountNotFound => {
                (StatusCode::NOT_FOUND, "External account not found")
            }
            LinkError::ResolverUnavailable(msg) => {
                tracing::warn!("Account lookup unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, "Account lookup unavailable")
            }
            LinkError::NotYetConfirmed => {
                // Normal, retryable: the user has not entered the code in-game yet
                (StatusCode::CONFLICT, "Verification not yet confirmed")
            }
            LinkError::PermissionDenied => (StatusCode::FORBIDDEN, "Permission denied"),
            LinkError::NoSuchLink => (StatusCode::NOT_FOUND, "No such link"),
            LinkError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "success": false, "reason": message });
        (status, axum::Json(body)).into_response()
    }
}
