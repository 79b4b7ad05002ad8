use axum::{Json, extract::State, http::HeaderMap};
use tracing::instrument;

use edugate_authz::OverrideHeaders;
use edugate_core::AppError;

use crate::middleware::auth::Annotations;
use crate::modules::dev::model::BypassReport;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/dev/bypass",
    responses(
        (status = 200, description = "Bypass state and forced context for the platform owner", body = BypassReport),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the bypassed platform owner")
    ),
    tag = "Development",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_bypass_report(
    State(state): State<AppState>,
    Annotations(annotations): Annotations,
    headers: HeaderMap,
) -> Result<Json<BypassReport>, AppError> {
    if !annotations.bypassed {
        return Err(AppError::forbidden(
            "Bypass diagnostics are only available to the platform owner".to_string(),
        ));
    }

    let bypass = state.engine.bypass();
    Ok(Json(BypassReport {
        is_bypassed: true,
        bypass_enabled: bypass.is_enabled(),
        environment: bypass.config().environment.to_string(),
        owner_email: bypass.config().owner_email.clone(),
        forced_context: annotations.forced_context,
        override_headers: OverrideHeaders::from_headers(&headers),
    }))
}
