use axum::http::{HeaderName, HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use edugate_authz::PORTAL_HEADER;
use edugate_authz::bypass::{
    FORCE_ACADEMIC_YEAR_HEADER, FORCE_CLASS_HEADER, FORCE_SCHOOL_LEVEL_HEADER,
    FORCE_TENANT_HEADER,
};
use edugate_observability::{logging_middleware, metrics_middleware};

use crate::docs::ApiDoc;
use crate::middleware::guard::authorize;
use crate::modules::audit::init_audit_router;
use crate::modules::authz::init_authz_router;
use crate::modules::dev::init_dev_router;
use crate::modules::health::init_health_router;
use crate::state::AppState;

/// Every routed request passes through [`authorize`]; Swagger UI is served
/// outside the guard.
pub fn init_router(state: AppState) -> Router {
    let guarded = Router::new()
        .merge(init_health_router())
        .nest(
            "/api",
            Router::new()
                .nest("/authz", init_authz_router())
                .nest("/audit", init_audit_router())
                .nest("/dev", init_dev_router()),
        )
        .layer(middleware::from_fn_with_state(state.clone(), authorize));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(guarded)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            HeaderName::from_static(PORTAL_HEADER),
            HeaderName::from_static(FORCE_TENANT_HEADER),
            HeaderName::from_static(FORCE_ACADEMIC_YEAR_HEADER),
            HeaderName::from_static(FORCE_SCHOOL_LEVEL_HEADER),
            HeaderName::from_static(FORCE_CLASS_HEADER),
        ])
        .allow_credentials(true)
}
