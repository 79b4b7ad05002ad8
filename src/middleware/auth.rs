use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use edugate_auth::{Principal, verify_token};
use edugate_authz::RequestAnnotations;
use edugate_config::JwtConfig;
use edugate_core::AppError;

/// Resolve the bearer token into a principal.
///
/// A missing, malformed or invalid token yields `None`; the guard pipeline
/// then decides whether the route needs a principal at all.
pub fn principal_from_headers(headers: &HeaderMap, config: &JwtConfig) -> Option<Principal> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?
        .strip_prefix("Bearer ")?;

    match verify_token(token, config).and_then(Principal::try_from) {
        Ok(principal) => Some(principal),
        Err(err) => {
            tracing::debug!(error = %err, "Rejected bearer token");
            None
        }
    }
}

/// The principal accepted by the guard, with any forced context applied.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Not authenticated".to_string()))
    }
}

/// Annotations left by the guard pipeline. Empty on public routes.
#[derive(Debug, Clone, Default)]
pub struct Annotations(pub RequestAnnotations);

impl<S> FromRequestParts<S> for Annotations
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Annotations(
            parts
                .extensions
                .get::<RequestAnnotations>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}
