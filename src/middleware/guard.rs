use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use edugate_authz::AccessDenied;
use edugate_core::AppError;
use edugate_observability::track_authz_decision;

use crate::middleware::auth::principal_from_headers;
use crate::state::AppState;

/// `401` for a missing principal, `403` for every other denial.
pub fn denial_error(denied: AccessDenied) -> AppError {
    let status = if denied.is_unauthenticated() {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::FORBIDDEN
    };
    AppError::new(status, denied)
}

/// Run the guard pipeline for the request.
///
/// Accepted requests continue with the principal and its
/// `RequestAnnotations` in the extensions. Rejected requests end here; when
/// the denial carries an audit payload, the write is spawned after the
/// response is built and never delays it.
pub async fn authorize(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let pattern = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned());
    let principal = principal_from_headers(req.headers(), &state.jwt_config);

    let outcome = state.engine.evaluate(
        req.method(),
        pattern.as_deref(),
        req.uri().path(),
        req.headers(),
        principal,
    );

    match outcome {
        Ok(decision) => {
            track_authz_decision("allowed", decision.stage);
            if let Some(principal) = decision.principal {
                req.extensions_mut().insert(principal);
            }
            req.extensions_mut().insert(decision.annotations);
            next.run(req).await
        }
        Err(rejection) => {
            track_authz_decision(rejection.denied.kind.slug(), rejection.stage);

            let mut denied = rejection.denied;
            if let Some(audit) = denied.audit.take() {
                let auditor = state.auditor.clone();
                tokio::spawn(async move {
                    auditor.log(audit).await;
                });
            }

            denial_error(denied).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edugate_authz::{Action, Module, Portal, Role};

    #[test]
    fn test_unauthenticated_maps_to_401() {
        let err = denial_error(AccessDenied::not_authenticated());
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), "Not authenticated");
    }

    #[test]
    fn test_every_other_denial_maps_to_403() {
        for denied in [
            AccessDenied::portal_mismatch(Role::Parent, Portal::Family, Portal::Teacher),
            AccessDenied::permission_denied(Role::Teacher, Module::Finance, Action::Read),
            AccessDenied::read_only(Module::Oversight, Action::Write),
        ] {
            let reason = denied.reason.clone();
            let err = denial_error(denied);
            assert_eq!(err.status, StatusCode::FORBIDDEN);
            assert_eq!(err.error.to_string(), reason);
        }
    }
}
