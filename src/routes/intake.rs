//! Confirmation oracle intake
//!
//! The in-game oracle posts here once it has observed the correct code
//! entered by the claimed account. Authenticity of the payload is this
//! boundary's job; the coordinator trusts whatever this surface has
//! accepted into the store.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::require_bearer;
use crate::error::LinkError;
use crate::state::IntakeState;
use crate::store::{ConfirmationRecord, ExternalId, LocalId, VerificationStore};

#[derive(Deserialize)]
pub struct ConfirmationRequest {
    pub local_id: String,
    pub external_id: u64,
    pub external_username: String,
}

#[derive(Serialize)]
pub struct ConfirmationResponse {
    pub success: bool,
}

/// POST /intake/confirmation
pub async fn put_confirmation<V>(
    State(state): State<Arc<IntakeState<V>>>,
    headers: HeaderMap,
    Json(req): Json<ConfirmationRequest>,
) -> Result<Json<ConfirmationResponse>, LinkError>
where
    V: VerificationStore,
{
    require_bearer(&headers, &state.intake_token)?;

    let confirmation = ConfirmationRecord {
        local_id: LocalId(req.local_id),
        external_id: ExternalId(req.external_id),
        external_username: req.external_username,
        confirmed_at: Utc::now(),
    };

    tracing::info!(
        local_id = %confirmation.local_id.0,
        external_id = confirmation.external_id.0,
        "Confirmation received"
    );

    state.verifications.put_confirmation(confirmation)?;

    Ok(Json(ConfirmationResponse { success: true }))
}
