//! Authorization core for Edugate API.
//!
//! Roles and their portals, the lenient and strict permission matrices, the
//! platform owner bypass, route metadata and the guard pipeline that ties
//! them together. Everything here is pure and synchronous; persistence of
//! denials lives in `edugate-audit`.

pub mod bypass;
pub mod consistency;
pub mod denial;
pub mod engine;
pub mod lenient;
pub mod module;
pub mod pipeline;
pub mod portal;
pub mod role;
pub mod route;
pub mod strict;

pub use bypass::{BypassAuthority, ForcedContext, OverrideHeaders};
pub use consistency::{ConsistencyError, Drift};
pub use denial::{AccessDenied, ClientInfo, DenialAudit, DenialKind};
pub use engine::{AuthzEngine, PermissionSet, StrictGrant};
pub use lenient::{LenientMatrix, ModulePermissions};
pub use module::{Action, Module, READ_ONLY_MODULE, UnknownAction, UnknownModule};
pub use pipeline::{Decision, Rejection, RequestAnnotations, STAGES};
pub use portal::{PORTAL_HEADER, Portal, PortalSource};
pub use role::{Role, UnknownRole};
pub use route::{Enforcement, RouteMeta, RouteTable};
pub use strict::{SUPERSET_ROLE, StrictMatrix};
