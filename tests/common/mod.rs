use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use edugate::edugate_audit::{Auditor, DenialRecord, DenialStore, MemoryDenialStore};
use edugate::edugate_auth::Claims;
use edugate::edugate_authz::{AuthzEngine, BypassAuthority, RouteTable};
use edugate::edugate_config::{
    AuditConfig, AuditStoreKind, BypassConfig, CorsConfig, Environment, JwtConfig,
};
use edugate::router::init_router;
use edugate::routes::route_table;
use edugate::state::AppState;

#[allow(dead_code)]
pub const TEST_SECRET: &str = "integration-test-secret";

#[allow(dead_code)]
pub const OWNER_EMAIL: &str = "owner@edugate.dev";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDenialStore>,
}

#[allow(dead_code)]
pub fn test_app() -> TestApp {
    test_app_in(Environment::Development)
}

#[allow(dead_code)]
pub fn test_app_in(environment: Environment) -> TestApp {
    test_app_with_routes(environment, route_table())
}

#[allow(dead_code)]
pub fn test_app_with_routes(environment: Environment, routes: RouteTable) -> TestApp {
    let bypass = BypassAuthority::new(BypassConfig::new(
        environment,
        Some(OWNER_EMAIL.to_string()),
    ));
    let engine = AuthzEngine::builtin(bypass, routes).unwrap();

    let store = Arc::new(MemoryDenialStore::new());
    let auditor = Auditor::new(
        store.clone(),
        AuditConfig {
            store: AuditStoreKind::Memory,
            default_limit: 50,
        },
    );

    let state = AppState::new(
        engine,
        auditor,
        JwtConfig::with_secret(TEST_SECRET),
        CorsConfig {
            allowed_origins: vec![],
        },
    );

    TestApp {
        router: init_router(state),
        store,
    }
}

#[allow(dead_code)]
pub fn token(role: &str, email: &str, tenant_id: Option<Uuid>) -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        tenant_id,
        academic_year_id: None,
        school_level_id: None,
        class_id: None,
        exp: now + 3600,
        iat: now,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    (user_id, token)
}

#[allow(dead_code)]
pub async fn get(
    router: &Router,
    uri: &str,
    token: Option<&str>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let response = router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Audit writes are spawned off the request path; wait for them to land.
#[allow(dead_code)]
pub async fn wait_for_denials(store: &MemoryDenialStore, expected: usize) -> Vec<DenialRecord> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while store.len().await < expected && tokio::time::Instant::now() < deadline {
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    store.all().await
}

#[allow(dead_code)]
pub async fn tenant_denials(store: &MemoryDenialStore, tenant_id: Uuid) -> Vec<DenialRecord> {
    store.recent(tenant_id, 500).await.unwrap()
}
