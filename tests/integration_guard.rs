mod common;

use axum::http::StatusCode;
use uuid::Uuid;

use common::{OWNER_EMAIL, get, test_app, test_app_in, token, wait_for_denials};
use edugate::edugate_config::Environment;

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app();

    let (status, body) = get(&app.router, "/health", None, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app();

    let (status, body) = get(&app.router, "/api/authz/me", None, &[]).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authenticated");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = test_app();

    let (status, _) = get(&app.router, "/api/authz/me", Some("not-a-jwt"), &[]).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_reports_role_portal_and_permissions() {
    let app = test_app();
    let tenant = Uuid::new_v4();
    let (user_id, token) = token("director", "director@school.test", Some(tenant));

    let (status, body) = get(&app.router, "/api/authz/me", Some(&token), &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["tenant_id"], tenant.to_string());
    assert_eq!(body["annotations"]["role"], "director");
    assert_eq!(body["annotations"]["portal"], "school");
    assert_eq!(body["annotations"]["bypassed"], false);
    assert_eq!(body["permissions"]["role"], "director");
}

#[tokio::test]
async fn test_role_alias_resolves_to_canonical_role() {
    let app = test_app();
    let (_, token) = token("Professeur", "prof@school.test", Some(Uuid::new_v4()));

    let (status, body) = get(
        &app.router,
        "/api/authz/me",
        Some(&token),
        &[("x-portal", "enseignant")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annotations"]["role"], "teacher");
    assert_eq!(body["annotations"]["portal"], "teacher");
}

#[tokio::test]
async fn test_parent_cannot_enter_teacher_portal() {
    let app = test_app();
    let (_, token) = token("parent", "parent@family.test", Some(Uuid::new_v4()));

    let (status, body) = get(
        &app.router,
        "/api/authz/me",
        Some(&token),
        &[("x-portal", "teacher")],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Access denied. Role 'parent' belongs to the family portal and cannot access the teacher portal"
    );
    assert!(wait_for_denials(&app.store, 0).await.is_empty());
}

#[tokio::test]
async fn test_unknown_role_is_forbidden() {
    let app = test_app();
    let (_, token) = token("janitor", "janitor@school.test", Some(Uuid::new_v4()));

    let (status, body) = get(&app.router, "/api/authz/me", Some(&token), &[]).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Role 'janitor' is not defined");
}

#[tokio::test]
async fn test_module_roles_lists_strict_grants() {
    let app = test_app();
    let (_, token) = token("founder", "founder@school.test", Some(Uuid::new_v4()));

    let (status, body) = get(
        &app.router,
        "/api/authz/modules/oversight/roles?action=read",
        Some(&token),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["module"], "oversight");
    assert_eq!(body["action"], "read");
    let roles: Vec<&str> = body["roles"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|role| role.as_str())
        .collect();
    assert!(roles.contains(&"founder"));
    assert!(roles.contains(&"director"));
    assert!(!roles.contains(&"teacher"));
}

#[tokio::test]
async fn test_module_roles_rejects_unknown_module() {
    let app = test_app();
    let (_, token) = token("founder", "founder@school.test", Some(Uuid::new_v4()));

    let (status, _) = get(
        &app.router,
        "/api/authz/modules/cafeteria/roles",
        Some(&token),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owner_bypass_forces_tenant() {
    let app = test_app();
    let forced = Uuid::new_v4();
    let (_, token) = token("super_admin", OWNER_EMAIL, None);

    let (status, body) = get(
        &app.router,
        "/api/dev/bypass",
        Some(&token),
        &[("x-force-tenant-id", &forced.to_string())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_bypassed"], true);
    assert_eq!(body["environment"], "development");
    assert_eq!(body["forced_context"]["tenant_id"], forced.to_string());
    assert_eq!(body["override_headers"]["tenant_id"], forced.to_string());
}

#[tokio::test]
async fn test_owner_bypass_skips_portal_and_strict_checks() {
    let app = test_app();
    let forced = Uuid::new_v4();
    let (_, token) = token("super_admin", OWNER_EMAIL, None);

    let (status, body) = get(
        &app.router,
        "/api/audit/denials",
        Some(&token),
        &[("x-force-tenant-id", &forced.to_string())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert!(wait_for_denials(&app.store, 0).await.is_empty());
}

#[tokio::test]
async fn test_bypass_report_is_forbidden_for_other_users() {
    let app = test_app();
    let (_, token) = token("founder", "founder@school.test", Some(Uuid::new_v4()));

    let (status, _) = get(&app.router, "/api/dev/bypass", Some(&token), &[]).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_is_ordinary_user_in_production() {
    let app = test_app_in(Environment::Production);
    let (_, token) = token("founder", OWNER_EMAIL, Some(Uuid::new_v4()));

    let (status, _) = get(&app.router, "/api/dev/bypass", Some(&token), &[]).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
