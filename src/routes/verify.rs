//! Verification command endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::resolver::AccountResolver;
use crate::state::AppState;
use crate::store::{LinkStatus, LinkStore, LocalId, VerificationStore};

#[derive(Deserialize)]
pub struct RequestVerificationRequest {
    pub local_id: String,
    pub username: String,
}

#[derive(Serialize)]
pub struct RequestVerificationResponse {
    pub success: bool,
    /// One-time code the user must enter in-game
    pub code: String,
    pub claimed_username: String,
}

/// POST /api/request_verification
pub async fn request_verification<R, L, V>(
    State(state): State<Arc<AppState<R, L, V>>>,
    Json(req): Json<RequestVerificationRequest>,
) -> Result<Json<RequestVerificationResponse>, LinkError>
where
    R: AccountResolver,
    L: LinkStore,
    V: VerificationStore,
{
    let pending = state
        .coordinator
        .request_verification(LocalId(req.local_id), &req.username)
        .await?;

    Ok(Json(RequestVerificationResponse {
        success: true,
        code: pending.code,
        claimed_username: pending.claimed_username,
    }))
}

#[derive(Deserialize)]
pub struct CompleteVerificationRequest {
    pub local_id: String,
}

#[derive(Serialize)]
pub struct CompleteVerificationResponse {
    pub success: bool,
    pub external_id: u64,
    pub external_username: String,
}

/// POST /api/complete_verification
pub async fn complete_verification<R, L, V>(
    State(state): State<Arc<AppState<R, L, V>>>,
    Json(req): Json<CompleteVerificationRequest>,
) -> Result<Json<CompleteVerificationResponse>, LinkError>
where
    R: AccountResolver,
    L: LinkStore,
    V: VerificationStore,
{
    let link = state
        .coordinator
        .complete_verification(&LocalId(req.local_id))?;

    Ok(Json(CompleteVerificationResponse {
        success: true,
        external_id: link.external_id.0,
        external_username: link.external_username,
    }))
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub local_id: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_username: Option<String>,
}

/// GET /api/status
pub async fn status<R, L, V>(
    State(state): State<Arc<AppState<R, L, V>>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, LinkError>
where
    R: AccountResolver,
    L: LinkStore,
    V: VerificationStore,
{
    let response = match state.coordinator.status(&LocalId(query.local_id))? {
        LinkStatus::Linked(link) => StatusResponse {
            status: "linked".to_string(),
            external_id: Some(link.external_id.0),
            external_username: Some(link.external_username),
        },
        LinkStatus::Pending => StatusResponse {
            status: "pending".to_string(),
            external_id: None,
            external_username: None,
        },
        LinkStatus::Unlinked => StatusResponse {
            status: "unlinked".to_string(),
            external_id: None,
            external_username: None,
        },
    };

    Ok(Json(response))
}
