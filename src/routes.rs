//! Guard metadata for every endpoint served by this binary.

use axum::http::Method;

use edugate_authz::{Module, RouteMeta, RouteTable};

pub const HEALTH: &str = "/health";
pub const METRICS: &str = "/metrics";
pub const AUTHZ_ME: &str = "/api/authz/me";
pub const AUTHZ_MODULE_ROLES: &str = "/api/authz/modules/{module}/roles";
pub const AUDIT_DENIALS: &str = "/api/audit/denials";
pub const AUDIT_USER_DENIALS: &str = "/api/audit/denials/users/{user_id}";
pub const DEV_BYPASS: &str = "/api/dev/bypass";

pub fn route_table() -> RouteTable {
    RouteTable::new()
        .route(Method::GET, HEALTH, RouteMeta::public())
        .route(Method::GET, METRICS, RouteMeta::public())
        .route(Method::GET, AUTHZ_ME, RouteMeta::authenticated())
        .route(
            Method::GET,
            AUTHZ_MODULE_ROLES,
            RouteMeta::requires(Module::Settings).strict(),
        )
        .route(
            Method::GET,
            AUDIT_DENIALS,
            RouteMeta::requires(Module::Oversight).strict(),
        )
        .route(
            Method::GET,
            AUDIT_USER_DENIALS,
            RouteMeta::requires(Module::Oversight).strict(),
        )
        .route(Method::GET, DEV_BYPASS, RouteMeta::authenticated())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edugate_authz::{Action, Enforcement};

    #[test]
    fn test_denial_log_is_strict_oversight_read() {
        let table = route_table();
        for pattern in [AUDIT_DENIALS, AUDIT_USER_DENIALS] {
            let meta = table.lookup(&Method::GET, pattern);
            assert_eq!(meta.module, Some(Module::Oversight));
            assert_eq!(meta.action, Action::Read);
            assert_eq!(meta.enforcement, Enforcement::Strict);
        }
    }

    #[test]
    fn test_only_probes_are_public() {
        let public: Vec<_> = route_table()
            .iter()
            .filter(|(_, _, meta)| meta.public)
            .map(|(_, pattern, _)| pattern.to_string())
            .collect();
        assert_eq!(public.len(), 2);
        assert!(public.contains(&HEALTH.to_string()));
        assert!(public.contains(&METRICS.to_string()));
    }
}
