//! The ordered guard pipeline.
//!
//! Each stage takes ownership of the [`GuardContext`] and either hands it on
//! ([`Step::Continue`]), finishes the pipeline ([`Step::Accept`]) or rejects
//! with an [`AccessDenied`]. A rejecting stage drops the context, so nothing
//! it annotated can leak past the rejection.
//!
//! | # | stage | on success |
//! |---|-------|------------|
//! | 1 | `public_route` | public routes accept immediately |
//! | 2 | `authenticated` | requires a principal |
//! | 3 | `bypass` | the platform owner accepts immediately |
//! | 4 | `portal` | annotates role and authorized portal |
//! | 5 | `module_action` | routes without a module accept |
//! | 6 | `read_only` | write-class actions on the read-only module reject |

use axum::http::{HeaderMap, Method};
use serde::Serialize;
use utoipa::ToSchema;

use edugate_auth::Principal;

use crate::bypass::ForcedContext;
use crate::denial::{AccessDenied, ClientInfo};
use crate::engine::AuthzEngine;
use crate::portal::{Portal, PortalSource};
use crate::role::Role;
use crate::route::{Enforcement, RouteMeta};

/// The parts of an HTTP request the pipeline reads.
#[derive(Debug, Clone, Copy)]
pub struct GuardRequest<'a> {
    pub method: &'a Method,
    /// Raw request path, used for portal sniffing.
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    pub route: RouteMeta,
}

/// Per-request values produced by the pipeline for downstream handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RequestAnnotations {
    pub role: Option<Role>,
    pub portal: Option<Portal>,
    pub forced_context: Option<ForcedContext>,
    /// Set for bypassed requests so business audit trails can skip them.
    pub audit_excluded: bool,
    pub bypassed: bool,
}

pub struct GuardContext<'a> {
    pub engine: &'a AuthzEngine,
    pub request: GuardRequest<'a>,
    pub principal: Option<Principal>,
    pub annotations: RequestAnnotations,
}

impl<'a> GuardContext<'a> {
    pub fn new(
        engine: &'a AuthzEngine,
        request: GuardRequest<'a>,
        principal: Option<Principal>,
    ) -> Self {
        Self {
            engine,
            request,
            principal,
            annotations: RequestAnnotations::default(),
        }
    }

    fn principal(&self) -> Result<&Principal, AccessDenied> {
        self.principal.as_ref().ok_or_else(AccessDenied::not_authenticated)
    }
}

pub enum Step<'a> {
    Continue(GuardContext<'a>),
    Accept(GuardContext<'a>),
}

pub type StageFn = for<'a> fn(GuardContext<'a>) -> Result<Step<'a>, AccessDenied>;

#[derive(Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub run: StageFn,
}

pub const STAGES: [Stage; 6] = [
    Stage { name: "public_route", run: public_route },
    Stage { name: "authenticated", run: authenticated },
    Stage { name: "bypass", run: bypass },
    Stage { name: "portal", run: portal },
    Stage { name: "module_action", run: module_action },
    Stage { name: "read_only", run: read_only },
];

/// Successful outcome of [`run`].
#[derive(Debug, Clone)]
pub struct Decision {
    pub stage: &'static str,
    pub principal: Option<Principal>,
    pub annotations: RequestAnnotations,
}

#[derive(Debug, Clone)]
pub struct Rejection {
    pub stage: &'static str,
    pub denied: AccessDenied,
}

/// Run every stage in order, stopping at the first accept or rejection.
pub fn run(ctx: GuardContext<'_>) -> Result<Decision, Rejection> {
    let mut ctx = ctx;

    for stage in STAGES {
        ctx = match (stage.run)(ctx) {
            Ok(Step::Continue(next)) => next,
            Ok(Step::Accept(done)) => return Ok(decision(stage.name, done)),
            Err(denied) => {
                return Err(Rejection {
                    stage: stage.name,
                    denied,
                });
            }
        };
    }

    Ok(decision(STAGES[STAGES.len() - 1].name, ctx))
}

fn decision(stage: &'static str, ctx: GuardContext<'_>) -> Decision {
    Decision {
        stage,
        principal: ctx.principal,
        annotations: ctx.annotations,
    }
}

fn public_route(ctx: GuardContext<'_>) -> Result<Step<'_>, AccessDenied> {
    if ctx.request.route.public {
        return Ok(Step::Accept(ctx));
    }
    Ok(Step::Continue(ctx))
}

fn authenticated(ctx: GuardContext<'_>) -> Result<Step<'_>, AccessDenied> {
    ctx.principal()?;
    Ok(Step::Continue(ctx))
}

fn bypass(mut ctx: GuardContext<'_>) -> Result<Step<'_>, AccessDenied> {
    let authority = ctx.engine.bypass();
    let Some(principal) = ctx.principal.as_mut() else {
        return Err(AccessDenied::not_authenticated());
    };
    if !authority.is_platform_owner(principal) {
        return Ok(Step::Continue(ctx));
    }

    let forced = authority.forced_context(principal, ctx.request.headers);
    if let Some(forced) = &forced {
        forced.apply(principal);
    }

    let role = Role::normalize(&principal.role).ok();
    tracing::debug!(
        user_id = %principal.user_id,
        forced = forced.is_some(),
        "Platform owner bypass accepted"
    );

    ctx.annotations = RequestAnnotations {
        role,
        portal: role.map(Role::home_portal),
        forced_context: forced,
        audit_excluded: true,
        bypassed: true,
    };
    Ok(Step::Accept(ctx))
}

fn portal(mut ctx: GuardContext<'_>) -> Result<Step<'_>, AccessDenied> {
    let role = Role::normalize(&ctx.principal()?.role).map_err(AccessDenied::role_undefined)?;
    let authorized = role.home_portal();
    let (targeted, source) = Portal::targeted(ctx.request.headers, ctx.request.path);

    if !role.can_access_portal(targeted) {
        return Err(AccessDenied::portal_mismatch(role, authorized, targeted));
    }

    if source == PortalSource::Default {
        tracing::trace!(portal = %targeted, "No portal hint, using default");
    }
    ctx.annotations.role = Some(role);
    ctx.annotations.portal = Some(authorized);
    Ok(Step::Continue(ctx))
}

fn module_action(ctx: GuardContext<'_>) -> Result<Step<'_>, AccessDenied> {
    let route = ctx.request.route;
    let Some(module) = route.module else {
        return Ok(Step::Accept(ctx));
    };
    let action = route.action;

    // The read-only stage owns every write-class decision on that module.
    if module.is_read_only() && action.is_write_class() {
        return Ok(Step::Continue(ctx));
    }

    let principal = ctx.principal()?;
    let role = match ctx.annotations.role {
        Some(role) => role,
        None => Role::normalize(&principal.role).map_err(AccessDenied::role_undefined)?,
    };

    let allowed = match route.enforcement {
        Enforcement::Lenient => ctx.engine.lenient().has_permission(role, module, Some(action)),
        Enforcement::Strict => ctx.engine.strict().has_strict_permission(role, module, action),
    };
    if allowed {
        return Ok(Step::Continue(ctx));
    }

    let denied = AccessDenied::permission_denied(role, module, action);
    match route.enforcement {
        Enforcement::Lenient => Err(denied),
        Enforcement::Strict => Err(denied.audited(
            principal,
            module,
            action,
            ClientInfo::from_headers(ctx.request.headers),
        )),
    }
}

fn read_only(ctx: GuardContext<'_>) -> Result<Step<'_>, AccessDenied> {
    let route = ctx.request.route;
    if let Some(module) = route.module {
        if module.is_read_only() && route.action.is_write_class() {
            return Err(AccessDenied::read_only(module, route.action));
        }
    }
    Ok(Step::Accept(ctx))
}
