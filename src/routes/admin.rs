//! Admin endpoints, gated by the admin bearer token

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::require_bearer;
use crate::error::LinkError;
use crate::resolver::AccountResolver;
use crate::state::AppState;
use crate::store::{LinkRecord, LinkStore, LocalId, VerificationStore};

#[derive(Serialize)]
pub struct LinkInfo {
    pub local_id: String,
    pub external_id: u64,
    pub external_username: String,
    pub linked_at: String,
}

impl From<LinkRecord> for LinkInfo {
    fn from(link: LinkRecord) -> Self {
        Self {
            local_id: link.local_id.0,
            external_id: link.external_id.0,
            external_username: link.external_username,
            linked_at: link.linked_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub username: String,
}

#[derive(Serialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(flatten)]
    pub link: LinkInfo,
}

/// GET /api/admin/lookup
/// Find the chat user linked to an external username (exact match)
pub async fn lookup_by_username<R, L, V>(
    State(state): State<Arc<AppState<R, L, V>>>,
    headers: HeaderMap,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, LinkError>
where
    R: AccountResolver,
    L: LinkStore,
    V: VerificationStore,
{
    require_bearer(&headers, &state.admin_token)?;

    let link = state
        .coordinator
        .lookup_by_username(&query.username)?
        .ok_or(LinkError::NoSuchLink)?;

    Ok(Json(LookupResponse {
        success: true,
        link: link.into(),
    }))
}

#[derive(Deserialize)]
pub struct UnlinkRequest {
    pub local_id: String,
}

#[derive(Serialize)]
pub struct UnlinkResponse {
    pub success: bool,
    /// False when there was nothing to delete
    pub deleted: bool,
}

/// POST /api/admin/unlink
pub async fn unlink<R, L, V>(
    State(state): State<Arc<AppState<R, L, V>>>,
    headers: HeaderMap,
    Json(req): Json<UnlinkRequest>,
) -> Result<Json<UnlinkResponse>, LinkError>
where
    R: AccountResolver,
    L: LinkStore,
    V: VerificationStore,
{
    // Authorization is checked before any state-mutating call
    require_bearer(&headers, &state.admin_token)?;

    let deleted = state.coordinator.unlink(&LocalId(req.local_id))?;

    Ok(Json(UnlinkResponse {
        success: true,
        deleted,
    }))
}

#[derive(Serialize)]
pub struct ListLinksResponse {
    pub success: bool,
    pub links: Vec<LinkInfo>,
}

/// GET /api/admin/links
pub async fn list_links<R, L, V>(
    State(state): State<Arc<AppState<R, L, V>>>,
    headers: HeaderMap,
) -> Result<Json<ListLinksResponse>, LinkError>
where
    R: AccountResolver,
    L: LinkStore,
    V: VerificationStore,
{
    require_bearer(&headers, &state.admin_token)?;

    let links = state.coordinator.list_all()?;

    Ok(Json(ListLinksResponse {
        success: true,
        links: links.into_iter().map(LinkInfo::from).collect(),
    }))
}
