use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use edugate_audit::DenialRecord;
use edugate_authz::{
    Action, ForcedContext, Module, ModulePermissions, OverrideHeaders, PermissionSet, Portal,
    RequestAnnotations, Role, StrictGrant,
};
use edugate_core::ErrorResponse;

use crate::modules::audit::model::DenialListResponse;
use crate::modules::authz::model::{MeResponse, ModuleRolesResponse};
use crate::modules::dev::model::BypassReport;
use crate::modules::health::controller::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health,
        crate::modules::authz::controller::get_me,
        crate::modules::authz::controller::get_module_roles,
        crate::modules::audit::controller::get_recent_denials,
        crate::modules::audit::controller::get_user_denials,
        crate::modules::dev::controller::get_bypass_report,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            MeResponse,
            RequestAnnotations,
            PermissionSet,
            ModulePermissions,
            StrictGrant,
            Role,
            Portal,
            Module,
            Action,
            ForcedContext,
            OverrideHeaders,
            ModuleRolesResponse,
            DenialRecord,
            DenialListResponse,
            BypassReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authorization", description = "Resolved roles, portals and permission sets"),
        (name = "Audit", description = "Strict-path authorization denials"),
        (name = "Development", description = "Platform owner bypass diagnostics")
    ),
    info(
        title = "Edugate API",
        version = "0.1.0",
        description = "Authorization engine for a multi-tenant school-management platform.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
