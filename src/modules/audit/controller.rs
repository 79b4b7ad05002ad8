use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use edugate_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::audit::model::{DenialListResponse, DenialQuery};
use crate::state::AppState;

fn tenant_scope(auth_user: &edugate_auth::Principal) -> Result<Uuid, AppError> {
    auth_user
        .tenant_id
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("No tenant in request context")))
}

#[utoipa::path(
    get,
    path = "/api/audit/denials",
    params(DenialQuery),
    responses(
        (status = 200, description = "Most recent denials in the caller's tenant", body = DenialListResponse),
        (status = 400, description = "No tenant in context"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Requires strict oversight:read")
    ),
    tag = "Audit",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_recent_denials(
    State(state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Query(query): Query<DenialQuery>,
) -> Result<Json<DenialListResponse>, AppError> {
    let tenant_id = tenant_scope(&auth_user)?;

    let data = state.auditor.recent(tenant_id, query.limit).await?;

    Ok(Json(DenialListResponse {
        data,
        limit: state.auditor.config().clamp_limit(query.limit),
    }))
}

#[utoipa::path(
    get,
    path = "/api/audit/denials/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User whose denials to list"),
        DenialQuery
    ),
    responses(
        (status = 200, description = "Most recent denials for the user", body = DenialListResponse),
        (status = 400, description = "No tenant in context"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Requires strict oversight:read")
    ),
    tag = "Audit",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user_denials(
    State(state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(user_id): Path<Uuid>,
    Query(query): Query<DenialQuery>,
) -> Result<Json<DenialListResponse>, AppError> {
    let tenant_id = tenant_scope(&auth_user)?;

    let data = state
        .auditor
        .for_user(tenant_id, user_id, query.limit)
        .await?;

    Ok(Json(DenialListResponse {
        data,
        limit: state.auditor.config().clamp_limit(query.limit),
    }))
}
