//! HTTP routes for the broker

mod admin;
mod intake;
mod verify;

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::Router;

use crate::error::LinkError;
use crate::resolver::AccountResolver;
use crate::state::{AppState, IntakeState};
use crate::store::{LinkStore, VerificationStore};

/// Build the command/admin router
pub fn command_router<R, L, V>(state: Arc<AppState<R, L, V>>) -> Router
where
    R: AccountResolver + 'static,
    L: LinkStore + 'static,
    V: VerificationStore + 'static,
{
    Router::new()
        .route("/api/request_verification", post(verify::request_verification))
        .route("/api/complete_verification", post(verify::complete_verification))
        .route("/api/status", get(verify::status))
        .route("/api/admin/lookup", get(admin::lookup_by_username))
        .route("/api/admin/unlink", post(admin::unlink))
        .route("/api/admin/links", get(admin::list_links))
        .with_state(state)
}

/// Build the confirmation intake router
pub fn intake_router<V>(state: Arc<IntakeState<V>>) -> Router
where
    V: VerificationStore + 'static,
{
    Router::new()
        .route("/intake/confirmation", post(intake::put_confirmation))
        .with_state(state)
}

/// Check a bearer token before anything else runs. An empty expected
/// token rejects every request (fail closed).
fn require_bearer(headers: &HeaderMap, expected: &str) -> Result<(), LinkError> {
    if expected.is_empty() {
        return Err(LinkError::PermissionDenied);
    }

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(LinkError::PermissionDenied),
    }
}
