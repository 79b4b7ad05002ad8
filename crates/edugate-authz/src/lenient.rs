//! Lenient matrix: the single highest action each role holds on each module.
//!
//! Drives menus and other UI decisions. Enforcement on sensitive routes
//! goes through [`crate::strict`] instead.

use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::module::{Action, Module};
use crate::role::Role;

use crate::module::Action::{Manage as M, Read as R, Write as W};

const PLATFORM_ADMIN: &[(Module, Action)] = &[
    (Module::Students, M),
    (Module::Enrollment, M),
    (Module::Documents, M),
    (Module::PedagogicalOrganization, M),
    (Module::Materials, M),
    (Module::Exams, M),
    (Module::ReportCards, M),
    (Module::Finance, M),
    (Module::Collections, M),
    (Module::Expenses, M),
    (Module::HumanResources, M),
    (Module::Payroll, M),
    (Module::Communication, M),
    (Module::Settings, M),
    (Module::AcademicYears, M),
    (Module::Oversight, R),
    (Module::HealthSafety, M),
];

const FOUNDER: &[(Module, Action)] = PLATFORM_ADMIN;

const DIRECTOR: &[(Module, Action)] = &[
    (Module::Students, M),
    (Module::Enrollment, M),
    (Module::Documents, M),
    (Module::PedagogicalOrganization, M),
    (Module::Materials, M),
    (Module::Exams, M),
    (Module::ReportCards, M),
    (Module::Finance, R),
    (Module::Collections, R),
    (Module::Expenses, R),
    (Module::HumanResources, M),
    (Module::Payroll, R),
    (Module::Communication, M),
    (Module::Settings, W),
    (Module::AcademicYears, M),
    (Module::Oversight, R),
    (Module::HealthSafety, M),
];

const CENSOR: &[(Module, Action)] = &[
    (Module::Students, W),
    (Module::Enrollment, R),
    (Module::Documents, W),
    (Module::PedagogicalOrganization, M),
    (Module::Materials, W),
    (Module::Exams, M),
    (Module::ReportCards, M),
    (Module::Communication, W),
    (Module::AcademicYears, R),
    (Module::HealthSafety, W),
];

const SECRETARY_ACCOUNTANT: &[(Module, Action)] = &[
    (Module::Students, M),
    (Module::Enrollment, M),
    (Module::Documents, M),
    (Module::PedagogicalOrganization, R),
    (Module::Materials, R),
    (Module::Exams, R),
    (Module::ReportCards, R),
    (Module::Finance, M),
    (Module::Collections, M),
    (Module::Expenses, M),
    (Module::HumanResources, R),
    (Module::Payroll, M),
    (Module::Communication, W),
    (Module::AcademicYears, R),
    (Module::HealthSafety, R),
];

const SECRETARY: &[(Module, Action)] = &[
    (Module::Students, M),
    (Module::Enrollment, M),
    (Module::Documents, M),
    (Module::PedagogicalOrganization, R),
    (Module::Materials, R),
    (Module::Exams, R),
    (Module::ReportCards, R),
    (Module::Communication, W),
    (Module::AcademicYears, R),
    (Module::HealthSafety, R),
];

const ACCOUNTANT: &[(Module, Action)] = &[
    (Module::Students, R),
    (Module::Enrollment, R),
    (Module::Documents, R),
    (Module::Finance, M),
    (Module::Collections, M),
    (Module::Expenses, M),
    (Module::HumanResources, R),
    (Module::Payroll, M),
    (Module::Communication, W),
    (Module::AcademicYears, R),
];

const SUPERVISOR: &[(Module, Action)] = &[
    (Module::Students, R),
    (Module::Documents, R),
    (Module::PedagogicalOrganization, R),
    (Module::Exams, R),
    (Module::Communication, W),
    (Module::AcademicYears, R),
    (Module::HealthSafety, W),
];

const TEACHER: &[(Module, Action)] = &[
    (Module::Students, R),
    (Module::Documents, R),
    (Module::PedagogicalOrganization, R),
    (Module::Materials, W),
    (Module::Exams, W),
    (Module::ReportCards, W),
    (Module::Communication, W),
    (Module::AcademicYears, R),
];

const PARENT: &[(Module, Action)] = &[
    (Module::Students, R),
    (Module::Documents, R),
    (Module::Exams, R),
    (Module::ReportCards, R),
    (Module::Finance, R),
    (Module::Collections, R),
    (Module::Communication, R),
    (Module::AcademicYears, R),
];

const STUDENT: &[(Module, Action)] = &[
    (Module::Students, R),
    (Module::Materials, R),
    (Module::Exams, R),
    (Module::ReportCards, R),
    (Module::Communication, R),
    (Module::AcademicYears, R),
];

fn builtin_entries(role: Role) -> &'static [(Module, Action)] {
    match role {
        Role::PlatformAdmin => PLATFORM_ADMIN,
        Role::Founder => FOUNDER,
        Role::Director => DIRECTOR,
        Role::Censor => CENSOR,
        Role::SecretaryAccountant => SECRETARY_ACCOUNTANT,
        Role::Secretary => SECRETARY,
        Role::Accountant => ACCOUNTANT,
        Role::Supervisor => SUPERVISOR,
        Role::Teacher => TEACHER,
        Role::Parent => PARENT,
        Role::Student => STUDENT,
    }
}

/// UI-friendly view of one lenient entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ModulePermissions {
    pub module: Module,
    pub level: Action,
    pub can_read: bool,
    pub can_write: bool,
    pub can_delete: bool,
    pub can_manage: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LenientMatrix {
    entries: HashMap<Role, HashMap<Module, Action>>,
}

impl LenientMatrix {
    pub fn builtin() -> Self {
        let mut matrix = Self::default();
        for role in Role::ALL {
            for (module, action) in builtin_entries(role) {
                matrix = matrix.grant(role, *module, *action);
            }
        }
        matrix
    }

    /// Set the highest action `role` holds on `module`, replacing any previous entry.
    pub fn grant(mut self, role: Role, module: Module, action: Action) -> Self {
        self.entries.entry(role).or_default().insert(module, action);
        self
    }

    pub fn entry(&self, role: Role, module: Module) -> Option<Action> {
        self.entries
            .get(&role)
            .and_then(|modules| modules.get(&module))
            .copied()
    }

    /// Without an action this answers "has any access at all".
    pub fn has_permission(&self, role: Role, module: Module, action: Option<Action>) -> bool {
        match (self.entry(role, module), action) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(held), Some(requested)) => held.grants(requested),
        }
    }

    pub fn accessible_modules(&self, role: Role) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|module| self.entry(role, *module).is_some())
            .collect()
    }

    /// Per-module booleans for front-ends. Write-class flags are always
    /// false on the read-only module.
    pub fn ui_projection(&self, role: Role) -> Vec<ModulePermissions> {
        Module::ALL
            .into_iter()
            .filter_map(|module| {
                let level = self.entry(role, module)?;
                let writable = !module.is_read_only();
                Some(ModulePermissions {
                    module,
                    level,
                    can_read: true,
                    can_write: writable && level.grants(Action::Write),
                    can_delete: writable && level.grants(Action::Delete),
                    can_manage: writable && level.grants(Action::Manage),
                })
            })
            .collect()
    }
}
