//! The shared authorization engine: rule tables, bypass authority and route
//! metadata, built once at startup and read concurrently afterwards.

use axum::http::{HeaderMap, Method};
use serde::Serialize;
use utoipa::ToSchema;

use edugate_auth::Principal;

use crate::bypass::BypassAuthority;
use crate::consistency::{ConsistencyError, ensure_consistent};
use crate::lenient::{LenientMatrix, ModulePermissions};
use crate::module::{Action, Module};
use crate::pipeline::{self, Decision, GuardContext, GuardRequest, Rejection};
use crate::portal::Portal;
use crate::role::Role;
use crate::route::{RouteMeta, RouteTable};
use crate::strict::StrictMatrix;

/// Strict actions a role holds on one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StrictGrant {
    pub module: Module,
    pub actions: Vec<Action>,
}

/// Serializable permission set used by front-ends to render menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PermissionSet {
    pub role: Role,
    pub rank: u8,
    pub portal: Portal,
    pub modules: Vec<ModulePermissions>,
    pub strict: Vec<StrictGrant>,
}

#[derive(Debug, Clone)]
pub struct AuthzEngine {
    lenient: LenientMatrix,
    strict: StrictMatrix,
    bypass: BypassAuthority,
    routes: RouteTable,
}

impl AuthzEngine {
    /// Fails when the two matrices disagree on any entry.
    pub fn new(
        lenient: LenientMatrix,
        strict: StrictMatrix,
        bypass: BypassAuthority,
        routes: RouteTable,
    ) -> Result<Self, ConsistencyError> {
        ensure_consistent(&lenient, &strict)?;
        Ok(Self::from_parts(lenient, strict, bypass, routes))
    }

    pub fn builtin(bypass: BypassAuthority, routes: RouteTable) -> Result<Self, ConsistencyError> {
        Self::new(
            LenientMatrix::builtin(),
            StrictMatrix::builtin(),
            bypass,
            routes,
        )
    }

    pub(crate) fn from_parts(
        lenient: LenientMatrix,
        strict: StrictMatrix,
        bypass: BypassAuthority,
        routes: RouteTable,
    ) -> Self {
        Self {
            lenient,
            strict,
            bypass,
            routes,
        }
    }

    pub fn lenient(&self) -> &LenientMatrix {
        &self.lenient
    }

    pub fn strict(&self) -> &StrictMatrix {
        &self.strict
    }

    pub fn bypass(&self) -> &BypassAuthority {
        &self.bypass
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn route_meta(&self, method: &Method, pattern: &str) -> RouteMeta {
        self.routes.lookup(method, pattern)
    }

    /// Run the guard pipeline for one request.
    ///
    /// `pattern` is the matched route pattern when the router found one;
    /// the raw `path` is used both as a fallback key and for portal sniffing.
    pub fn evaluate(
        &self,
        method: &Method,
        pattern: Option<&str>,
        path: &str,
        headers: &HeaderMap,
        principal: Option<Principal>,
    ) -> Result<Decision, Rejection> {
        let request = GuardRequest {
            method,
            path,
            headers,
            route: self.route_meta(method, pattern.unwrap_or(path)),
        };
        let user_id = principal.as_ref().map(|p| p.user_id);

        let outcome = pipeline::run(GuardContext::new(self, request, principal));
        if let Err(rejection) = &outcome {
            tracing::warn!(
                security.event = "authorization_denied",
                stage = rejection.stage,
                kind = rejection.denied.kind.slug(),
                audited = rejection.denied.audit.is_some(),
                user_id = ?user_id,
                method = %method,
                path = %path,
                reason = %rejection.denied.reason,
                "Request rejected by guard pipeline"
            );
        }
        outcome
    }

    pub fn permission_set(&self, role: Role) -> PermissionSet {
        let strict = self
            .strict
            .modules_for(role)
            .into_iter()
            .map(|module| {
                let mut actions = self.strict.actions_for(role, module);
                if module.is_read_only() {
                    actions.retain(|action| !action.is_write_class());
                }
                StrictGrant { module, actions }
            })
            .collect();

        PermissionSet {
            role,
            rank: role.rank(),
            portal: role.home_portal(),
            modules: self.lenient.ui_projection(role),
            strict,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use edugate_config::{BypassConfig, Environment};

        Self::from_parts(
            LenientMatrix::builtin(),
            StrictMatrix::builtin(),
            BypassAuthority::new(BypassConfig::new(
                Environment::Development,
                Some(tests::OWNER.to_string()),
            )),
            tests::routes(),
        )
    }
}
