use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use edugate_authz::{Action, Module, PermissionSet, RequestAnnotations, Role};

/// The caller's identity as seen after the guard, plus what it may do.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
    pub tenant_id: Option<Uuid>,
    pub academic_year_id: Option<Uuid>,
    pub school_level_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub annotations: RequestAnnotations,
    /// Absent when the role could not be resolved (bypassed callers only).
    pub permissions: Option<PermissionSet>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ModuleRolesQuery {
    /// Action to list roles for (default `read`)
    pub action: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleRolesResponse {
    pub module: Module,
    pub action: Action,
    pub roles: Vec<Role>,
}
