//! Development-only platform owner bypass and header-driven context forcing.

use axum::http::HeaderMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use edugate_auth::Principal;
use edugate_config::BypassConfig;

pub const FORCE_TENANT_HEADER: &str = "x-force-tenant-id";
pub const FORCE_ACADEMIC_YEAR_HEADER: &str = "x-force-academic-year-id";
pub const FORCE_SCHOOL_LEVEL_HEADER: &str = "x-force-school-level-id";
pub const FORCE_CLASS_HEADER: &str = "x-force-class-id";

/// Context overrides supplied by the bypassed principal. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ForcedContext {
    pub tenant_id: Option<Uuid>,
    pub academic_year_id: Option<Uuid>,
    pub school_level_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
}

impl ForcedContext {
    pub fn is_empty(&self) -> bool {
        self.tenant_id.is_none()
            && self.academic_year_id.is_none()
            && self.school_level_id.is_none()
            && self.class_id.is_none()
    }

    /// Overwrite the principal's context with every populated field.
    pub fn apply(&self, principal: &mut Principal) {
        if let Some(tenant_id) = self.tenant_id {
            principal.tenant_id = Some(tenant_id);
        }
        if let Some(academic_year_id) = self.academic_year_id {
            principal.academic_year_id = Some(academic_year_id);
        }
        if let Some(school_level_id) = self.school_level_id {
            principal.school_level_id = Some(school_level_id);
        }
        if let Some(class_id) = self.class_id {
            principal.class_id = Some(class_id);
        }
    }
}

/// Raw override header values, as seen on the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct OverrideHeaders {
    pub tenant_id: Option<String>,
    pub academic_year_id: Option<String>,
    pub school_level_id: Option<String>,
    pub class_id: Option<String>,
}

impl OverrideHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            tenant_id: read(FORCE_TENANT_HEADER),
            academic_year_id: read(FORCE_ACADEMIC_YEAR_HEADER),
            school_level_id: read(FORCE_SCHOOL_LEVEL_HEADER),
            class_id: read(FORCE_CLASS_HEADER),
        }
    }
}

fn parse_override(header: &str, raw: Option<&str>) -> Option<Uuid> {
    let raw = raw?;
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!(header, value = raw, "Ignoring malformed context override");
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct BypassAuthority {
    config: BypassConfig,
}

impl BypassAuthority {
    pub fn new(config: BypassConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BypassConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// True only in development, for the exact configured owner email.
    pub fn is_platform_owner(&self, principal: &Principal) -> bool {
        if !self.config.environment.is_development() {
            return false;
        }

        self.config
            .owner_email
            .as_deref()
            .is_some_and(|owner| owner == principal.email)
    }

    /// Build the forced context for a bypassed principal.
    ///
    /// Returns `None` for anyone else, and when no override header carries a
    /// valid id.
    pub fn forced_context(
        &self,
        principal: &Principal,
        headers: &HeaderMap,
    ) -> Option<ForcedContext> {
        if !self.is_platform_owner(principal) {
            return None;
        }

        let raw = OverrideHeaders::from_headers(headers);
        let forced = ForcedContext {
            tenant_id: parse_override(FORCE_TENANT_HEADER, raw.tenant_id.as_deref()),
            academic_year_id: parse_override(
                FORCE_ACADEMIC_YEAR_HEADER,
                raw.academic_year_id.as_deref(),
            ),
            school_level_id: parse_override(
                FORCE_SCHOOL_LEVEL_HEADER,
                raw.school_level_id.as_deref(),
            ),
            class_id: parse_override(FORCE_CLASS_HEADER, raw.class_id.as_deref()),
        };

        (!forced.is_empty()).then_some(forced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use edugate_config::Environment;

    const OWNER: &str = "owner@edugate.dev";

    fn authority(environment: Environment) -> BypassAuthority {
        BypassAuthority::new(BypassConfig::new(environment, Some(OWNER.to_string())))
    }

    fn principal(email: &str) -> Principal {
        Principal::new(Uuid::new_v4(), email, "teacher")
    }

    fn override_headers(tenant: &str, class: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(FORCE_TENANT_HEADER, HeaderValue::from_str(tenant).unwrap());
        headers.insert(FORCE_CLASS_HEADER, HeaderValue::from_str(class).unwrap());
        headers
    }

    #[test]
    fn test_owner_recognized_in_development() {
        assert!(authority(Environment::Development).is_platform_owner(&principal(OWNER)));
    }

    #[test]
    fn test_owner_never_recognized_outside_development() {
        for environment in [Environment::Staging, Environment::Production] {
            assert!(!authority(environment).is_platform_owner(&principal(OWNER)));
        }
    }

    #[test]
    fn test_email_must_match_exactly() {
        let authority = authority(Environment::Development);
        assert!(!authority.is_platform_owner(&principal("OWNER@edugate.dev")));
        assert!(!authority.is_platform_owner(&principal("someone@edugate.dev")));
    }

    #[test]
    fn test_no_owner_configured() {
        let authority = BypassAuthority::new(BypassConfig::new(Environment::Development, None));
        assert!(!authority.is_platform_owner(&principal("")));
        assert!(!authority.is_enabled());
    }

    #[test]
    fn test_forced_context_for_owner() {
        let tenant = Uuid::new_v4();
        let class = Uuid::new_v4();
        let headers = override_headers(&tenant.to_string(), &class.to_string());

        let forced = authority(Environment::Development)
            .forced_context(&principal(OWNER), &headers)
            .unwrap();
        assert_eq!(forced.tenant_id, Some(tenant));
        assert_eq!(forced.class_id, Some(class));
        assert!(forced.academic_year_id.is_none());
    }

    #[test]
    fn test_forced_context_refused_for_others() {
        let headers = override_headers(&Uuid::new_v4().to_string(), &Uuid::new_v4().to_string());
        let authority = authority(Environment::Development);
        assert!(authority.forced_context(&principal("intruder@school.test"), &headers).is_none());

        let production = self::authority(Environment::Production);
        assert!(production.forced_context(&principal(OWNER), &headers).is_none());
    }

    #[test]
    fn test_malformed_override_ignored() {
        let class = Uuid::new_v4();
        let headers = override_headers("not-a-uuid", &class.to_string());
        let forced = authority(Environment::Development)
            .forced_context(&principal(OWNER), &headers)
            .unwrap();
        assert!(forced.tenant_id.is_none());
        assert_eq!(forced.class_id, Some(class));
    }

    #[test]
    fn test_apply_overwrites_only_populated_fields() {
        let original_year = Uuid::new_v4();
        let mut target = principal(OWNER).with_tenant(Uuid::new_v4());
        target.academic_year_id = Some(original_year);

        let forced = ForcedContext {
            tenant_id: Some(Uuid::new_v4()),
            ..ForcedContext::default()
        };
        forced.apply(&mut target);

        assert_eq!(target.tenant_id, forced.tenant_id);
        assert_eq!(target.academic_year_id, Some(original_year));
    }
}
