//! Structured rejections produced by the guard pipeline.

use std::net::IpAddr;

use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use edugate_auth::Principal;

use crate::module::{Action, Module};
use crate::portal::Portal;
use crate::role::{Role, UnknownRole};

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const REAL_IP_HEADER: &str = "x-real-ip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NotAuthenticated,
    RoleUndefined,
    PortalMismatch,
    PermissionDenied,
    ReadOnlyViolation,
}

impl DenialKind {
    pub fn slug(self) -> &'static str {
        match self {
            DenialKind::NotAuthenticated => "not_authenticated",
            DenialKind::RoleUndefined => "role_undefined",
            DenialKind::PortalMismatch => "portal_mismatch",
            DenialKind::PermissionDenied => "permission_denied",
            DenialKind::ReadOnlyViolation => "read_only_violation",
        }
    }
}

/// Caller network metadata recorded with audited denials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// First `X-Forwarded-For` entry, falling back to `X-Real-IP`.
    ///
    /// Values that are not an IP address are dropped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let parse_ip = |raw: &str| raw.trim().parse::<IpAddr>().ok();

        let ip_address = header(FORWARDED_FOR_HEADER)
            .and_then(|forwarded| forwarded.split(',').next())
            .and_then(parse_ip)
            .or_else(|| header(REAL_IP_HEADER).and_then(parse_ip))
            .map(|ip| ip.to_string());

        Self {
            ip_address,
            user_agent: header(USER_AGENT.as_str()).map(str::to_string),
        }
    }
}

/// Everything the denial auditor needs to persist one strict-path rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenialAudit {
    pub tenant_id: Option<Uuid>,
    pub user_id: Uuid,
    pub user_email: String,
    /// Raw role string from the principal, not re-validated.
    pub user_role: String,
    pub module: Module,
    pub action: Action,
    pub reason: String,
    pub client: ClientInfo,
}

#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct AccessDenied {
    pub kind: DenialKind,
    pub reason: String,
    /// Present only for strict-path permission denials.
    pub audit: Option<DenialAudit>,
}

impl AccessDenied {
    fn new(kind: DenialKind, reason: String) -> Self {
        Self {
            kind,
            reason,
            audit: None,
        }
    }

    pub fn not_authenticated() -> Self {
        Self::new(DenialKind::NotAuthenticated, "Not authenticated".to_string())
    }

    pub fn role_undefined(err: UnknownRole) -> Self {
        Self::new(DenialKind::RoleUndefined, err.to_string())
    }

    pub fn portal_mismatch(role: Role, authorized: Portal, targeted: Portal) -> Self {
        Self::new(
            DenialKind::PortalMismatch,
            format!(
                "Access denied. Role '{role}' belongs to the {authorized} portal and cannot access the {targeted} portal"
            ),
        )
    }

    pub fn permission_denied(role: Role, module: Module, action: Action) -> Self {
        Self::new(
            DenialKind::PermissionDenied,
            format!("Access denied. Role '{role}' lacks '{action}' permission on module '{module}'"),
        )
    }

    pub fn read_only(module: Module, action: Action) -> Self {
        Self::new(
            DenialKind::ReadOnlyViolation,
            format!("Access denied. Module '{module}' is read-only; '{action}' is not permitted"),
        )
    }

    /// Attach an audit payload for `principal` built from this denial's reason.
    pub fn audited(
        mut self,
        principal: &Principal,
        module: Module,
        action: Action,
        client: ClientInfo,
    ) -> Self {
        self.audit = Some(DenialAudit {
            tenant_id: principal.tenant_id,
            user_id: principal.user_id,
            user_email: principal.email.clone(),
            user_role: principal.role.clone(),
            module,
            action,
            reason: self.reason.clone(),
            client,
        });
        self
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.kind == DenialKind::NotAuthenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_reasons_name_the_subject() {
        assert_eq!(AccessDenied::not_authenticated().reason, "Not authenticated");
        assert_eq!(
            AccessDenied::role_undefined(UnknownRole("janitor".into())).reason,
            "Role 'janitor' is not defined"
        );

        let mismatch = AccessDenied::portal_mismatch(Role::Parent, Portal::Family, Portal::Teacher);
        assert_eq!(mismatch.kind, DenialKind::PortalMismatch);
        assert!(mismatch.reason.contains("family"));
        assert!(mismatch.reason.contains("teacher"));

        let denied = AccessDenied::permission_denied(Role::Teacher, Module::Finance, Action::Read);
        assert!(denied.reason.contains("'read'"));
        assert!(denied.reason.contains("'finance'"));

        let read_only = AccessDenied::read_only(Module::Oversight, Action::Manage);
        assert!(read_only.reason.contains("read-only"));
    }

    #[test]
    fn test_audit_payload_only_when_requested() {
        let denied = AccessDenied::permission_denied(Role::Teacher, Module::Finance, Action::Read);
        assert!(denied.audit.is_none());

        let principal = Principal::new(Uuid::new_v4(), "t@school.test", "Enseignant")
            .with_tenant(Uuid::new_v4());
        let audited = denied.audited(&principal, Module::Finance, Action::Read, ClientInfo::default());
        let audit = audited.audit.as_ref().unwrap();
        assert_eq!(audit.user_role, "Enseignant");
        assert_eq!(audit.tenant_id, principal.tenant_id);
        assert_eq!(audit.reason, audited.reason);
    }

    #[test]
    fn test_client_info_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR_HEADER, HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert(REAL_IP_HEADER, HeaderValue::from_static("10.0.0.2"));
        headers.insert(USER_AGENT, HeaderValue::from_static("edugate-tests/1.0"));

        let client = ClientInfo::from_headers(&headers);
        assert_eq!(client.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(client.user_agent.as_deref(), Some("edugate-tests/1.0"));
    }

    #[test]
    fn test_client_info_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(REAL_IP_HEADER, HeaderValue::from_static("10.0.0.2"));

        let client = ClientInfo::from_headers(&headers);
        assert_eq!(client.ip_address.as_deref(), Some("10.0.0.2"));
        assert!(client.user_agent.is_none());
        assert_eq!(ClientInfo::from_headers(&HeaderMap::new()), ClientInfo::default());
    }

    #[test]
    fn test_client_info_drops_values_that_are_not_addresses() {
        let oversized = "a".repeat(200);
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR_HEADER, HeaderValue::from_str(&oversized).unwrap());

        assert!(ClientInfo::from_headers(&headers).ip_address.is_none());

        headers.insert(REAL_IP_HEADER, HeaderValue::from_static("2001:db8::1"));
        assert_eq!(
            ClientInfo::from_headers(&headers).ip_address.as_deref(),
            Some("2001:db8::1")
        );
    }
}
