use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use edugate_authz::{Action, Module};
use edugate_core::AppError;

use crate::middleware::auth::{Annotations, AuthUser};
use crate::modules::authz::model::{MeResponse, ModuleRolesQuery, ModuleRolesResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/authz/me",
    responses(
        (status = 200, description = "Caller's resolved role, portal and permissions", body = MeResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role undefined or portal mismatch")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, annotations))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Annotations(annotations): Annotations,
) -> Result<Json<MeResponse>, AppError> {
    let permissions = annotations
        .role
        .map(|role| state.engine.permission_set(role));

    Ok(Json(MeResponse {
        user_id: auth_user.user_id,
        email: auth_user.email,
        tenant_id: auth_user.tenant_id,
        academic_year_id: auth_user.academic_year_id,
        school_level_id: auth_user.school_level_id,
        class_id: auth_user.class_id,
        annotations,
        permissions,
    }))
}

#[utoipa::path(
    get,
    path = "/api/authz/modules/{module}/roles",
    params(
        ("module" = String, Path, description = "Module slug, e.g. `exams`"),
        ModuleRolesQuery
    ),
    responses(
        (status = 200, description = "Roles allowed the action on the module", body = ModuleRolesResponse),
        (status = 400, description = "Unknown module or action"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Requires strict settings:read")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_module_roles(
    State(state): State<AppState>,
    Path(module): Path<String>,
    Query(query): Query<ModuleRolesQuery>,
) -> Result<Json<ModuleRolesResponse>, AppError> {
    let module: Module = module.parse().map_err(AppError::bad_request)?;
    let action = match query.action.as_deref() {
        Some(raw) => raw.parse::<Action>().map_err(AppError::bad_request)?,
        None => Action::default(),
    };

    Ok(Json(ModuleRolesResponse {
        module,
        action,
        roles: state.engine.strict().roles_allowed(module, action),
    }))
}
