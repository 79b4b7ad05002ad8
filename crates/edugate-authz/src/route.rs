//! Per-endpoint guard metadata, declared up front in a static table.

use axum::http::Method;
use serde::Serialize;
use std::collections::HashMap;

use crate::module::{Action, Module};

/// Which evaluator a route's module requirement is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    #[default]
    Lenient,
    /// Audited, allow-list based enforcement.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RouteMeta {
    pub public: bool,
    pub module: Option<Module>,
    pub action: Action,
    pub enforcement: Enforcement,
}

impl RouteMeta {
    pub const fn public() -> Self {
        Self {
            public: true,
            module: None,
            action: Action::Read,
            enforcement: Enforcement::Lenient,
        }
    }

    /// Requires a principal but no particular module.
    pub const fn authenticated() -> Self {
        Self {
            public: false,
            module: None,
            action: Action::Read,
            enforcement: Enforcement::Lenient,
        }
    }

    /// Requires `read` on `module` unless [`RouteMeta::action`] says otherwise.
    pub const fn requires(module: Module) -> Self {
        Self {
            public: false,
            module: Some(module),
            action: Action::Read,
            enforcement: Enforcement::Lenient,
        }
    }

    pub const fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub const fn strict(mut self) -> Self {
        self.enforcement = Enforcement::Strict;
        self
    }
}

/// Route metadata keyed by method and matched route pattern
/// (for example `/api/audit/denials/users/{user_id}`).
///
/// Routes missing from the table are treated as
/// [`RouteMeta::authenticated`].
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<(Method, String), RouteMeta>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: Method, pattern: &str, meta: RouteMeta) -> Self {
        self.routes.insert((method, pattern.to_string()), meta);
        self
    }

    pub fn get(&self, method: &Method, pattern: &str) -> Option<RouteMeta> {
        self.routes.get(&(method.clone(), pattern.to_string())).copied()
    }

    pub fn lookup(&self, method: &Method, pattern: &str) -> RouteMeta {
        self.get(method, pattern)
            .unwrap_or_else(RouteMeta::authenticated)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Method, &str, &RouteMeta)> {
        self.routes
            .iter()
            .map(|((method, pattern), meta)| (method, pattern.as_str(), meta))
    }
}
