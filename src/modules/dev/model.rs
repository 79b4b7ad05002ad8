use serde::Serialize;
use utoipa::ToSchema;

use edugate_authz::{ForcedContext, OverrideHeaders};

#[derive(Debug, Serialize, ToSchema)]
pub struct BypassReport {
    pub is_bypassed: bool,
    pub bypass_enabled: bool,
    pub environment: String,
    pub owner_email: Option<String>,
    pub forced_context: Option<ForcedContext>,
    pub override_headers: OverrideHeaders,
}
