//! Strict matrix: explicit allow-lists of roles per module and action.
//!
//! The authoritative source for enforcement on sensitive routes. Nothing is
//! derived between actions here: a role listed under `manage` is not
//! implicitly listed under `write`. [`SUPERSET_ROLE`] is allowed everything
//! without being listed.

use std::collections::HashMap;

use crate::module::{Action, Module};
use crate::role::Role;

/// Role implicitly granted every action on every module.
pub const SUPERSET_ROLE: Role = Role::PlatformAdmin;

const FO: Role = Role::Founder;
const DI: Role = Role::Director;
const CE: Role = Role::Censor;
const SA: Role = Role::SecretaryAccountant;
const SE: Role = Role::Secretary;
const AC: Role = Role::Accountant;
const SU: Role = Role::Supervisor;
const TE: Role = Role::Teacher;
const PA: Role = Role::Parent;
const ST: Role = Role::Student;

/// Allow-lists for each action on one module.
#[derive(Debug, Clone, Copy)]
pub struct ModuleRules {
    pub read: &'static [Role],
    pub write: &'static [Role],
    pub delete: &'static [Role],
    pub manage: &'static [Role],
}

const BUILTIN: &[(Module, ModuleRules)] = &[
    (
        Module::Students,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, AC, SU, TE, PA, ST],
            write: &[FO, DI, CE, SA, SE],
            delete: &[FO, DI, SA, SE],
            manage: &[FO, DI, SA, SE],
        },
    ),
    (
        Module::Enrollment,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, AC],
            write: &[FO, DI, SA, SE],
            delete: &[FO, DI, SA, SE],
            manage: &[FO, DI, SA, SE],
        },
    ),
    (
        Module::Documents,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, AC, SU, TE, PA],
            write: &[FO, DI, CE, SA, SE],
            delete: &[FO, DI, SA, SE],
            manage: &[FO, DI, SA, SE],
        },
    ),
    (
        Module::PedagogicalOrganization,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, SU, TE],
            write: &[FO, DI, CE],
            delete: &[FO, DI, CE],
            manage: &[FO, DI, CE],
        },
    ),
    (
        Module::Materials,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, TE, ST],
            write: &[FO, DI, CE, TE],
            delete: &[FO, DI],
            manage: &[FO, DI],
        },
    ),
    (
        Module::Exams,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, SU, TE, PA, ST],
            write: &[FO, DI, CE, TE],
            delete: &[FO, DI, CE],
            manage: &[FO, DI, CE],
        },
    ),
    (
        Module::ReportCards,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, TE, PA, ST],
            write: &[FO, DI, CE, TE],
            delete: &[FO, DI, CE],
            manage: &[FO, DI, CE],
        },
    ),
    (
        Module::Finance,
        ModuleRules {
            read: &[FO, DI, SA, AC, PA],
            write: &[FO, SA, AC],
            delete: &[FO, SA, AC],
            manage: &[FO, SA, AC],
        },
    ),
    (
        Module::Collections,
        ModuleRules {
            read: &[FO, DI, SA, AC, PA],
            write: &[FO, SA, AC],
            delete: &[FO, SA, AC],
            manage: &[FO, SA, AC],
        },
    ),
    (
        Module::Expenses,
        ModuleRules {
            read: &[FO, DI, SA, AC],
            write: &[FO, SA, AC],
            delete: &[FO, SA, AC],
            manage: &[FO, SA, AC],
        },
    ),
    (
        Module::HumanResources,
        ModuleRules {
            read: &[FO, DI, SA, AC],
            write: &[FO, DI],
            delete: &[FO, DI],
            manage: &[FO, DI],
        },
    ),
    (
        Module::Payroll,
        ModuleRules {
            read: &[FO, DI, SA, AC],
            write: &[FO, SA, AC],
            delete: &[FO, SA, AC],
            manage: &[FO, SA, AC],
        },
    ),
    (
        Module::Communication,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, AC, SU, TE, PA, ST],
            write: &[FO, DI, CE, SA, SE, AC, SU, TE],
            delete: &[FO, DI],
            manage: &[FO, DI],
        },
    ),
    (
        Module::Settings,
        ModuleRules {
            read: &[FO, DI],
            write: &[FO, DI],
            delete: &[FO],
            manage: &[FO],
        },
    ),
    (
        Module::AcademicYears,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, AC, SU, TE, PA, ST],
            write: &[FO, DI],
            delete: &[FO, DI],
            manage: &[FO, DI],
        },
    ),
    (
        Module::Oversight,
        ModuleRules {
            read: &[FO, DI],
            write: &[],
            delete: &[],
            manage: &[],
        },
    ),
    (
        Module::HealthSafety,
        ModuleRules {
            read: &[FO, DI, CE, SA, SE, SU],
            write: &[FO, DI, CE, SU],
            delete: &[FO, DI],
            manage: &[FO, DI],
        },
    ),
];

#[derive(Debug, Clone, Default)]
pub struct StrictMatrix {
    rules: HashMap<Module, HashMap<Action, Vec<Role>>>,
}

impl StrictMatrix {
    pub fn builtin() -> Self {
        let mut matrix = Self::default();
        for (module, rules) in BUILTIN {
            matrix = matrix
                .allow(*module, Action::Read, rules.read)
                .allow(*module, Action::Write, rules.write)
                .allow(*module, Action::Delete, rules.delete)
                .allow(*module, Action::Manage, rules.manage);
        }
        matrix
    }

    /// Add `roles` to the allow-list of (`module`, `action`). Registers the
    /// module even when `roles` is empty.
    pub fn allow(mut self, module: Module, action: Action, roles: &[Role]) -> Self {
        let allowed = self
            .rules
            .entry(module)
            .or_default()
            .entry(action)
            .or_default();
        for role in roles {
            if !allowed.contains(role) {
                allowed.push(*role);
            }
        }
        self
    }

    pub fn defines(&self, module: Module) -> bool {
        self.rules.contains_key(&module)
    }

    fn listed(&self, role: Role, module: Module, action: Action) -> bool {
        self.rules
            .get(&module)
            .and_then(|actions| actions.get(&action))
            .is_some_and(|roles| roles.contains(&role))
    }

    /// Undefined modules and empty allow-lists deny.
    pub fn has_strict_permission(&self, role: Role, module: Module, action: Action) -> bool {
        role == SUPERSET_ROLE || self.listed(role, module, action)
    }

    /// Every role allowed `action` on `module`, the super-set role first.
    pub fn roles_allowed(&self, module: Module, action: Action) -> Vec<Role> {
        let mut roles = vec![SUPERSET_ROLE];
        if let Some(listed) = self.rules.get(&module).and_then(|a| a.get(&action)) {
            roles.extend(listed.iter().copied().filter(|r| *r != SUPERSET_ROLE));
        }
        roles
    }

    pub fn actions_for(&self, role: Role, module: Module) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.has_strict_permission(role, module, *action))
            .collect()
    }

    pub fn modules_for(&self, role: Role) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|module| !self.actions_for(role, *module).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superset_role_holds_everything() {
        let matrix = StrictMatrix::builtin();
        for module in Module::ALL {
            for action in Action::ALL {
                assert!(matrix.has_strict_permission(SUPERSET_ROLE, module, action));
            }
        }
        assert!(StrictMatrix::default().has_strict_permission(
            SUPERSET_ROLE,
            Module::Payroll,
            Action::Manage
        ));
    }

    #[test]
    fn test_director_writes_exams() {
        let matrix = StrictMatrix::builtin();
        assert!(matrix.has_strict_permission(Role::Director, Module::Exams, Action::Write));
    }

    #[test]
    fn test_teacher_has_no_finance_action() {
        let matrix = StrictMatrix::builtin();
        assert!(matrix.actions_for(Role::Teacher, Module::Finance).is_empty());
        assert!(!matrix.has_strict_permission(Role::Teacher, Module::Finance, Action::Read));
    }

    #[test]
    fn test_undefined_module_denies() {
        let matrix = StrictMatrix::default().allow(Module::Exams, Action::Read, &[Role::Teacher]);
        assert!(!matrix.defines(Module::Finance));
        assert!(!matrix.has_strict_permission(Role::Founder, Module::Finance, Action::Read));
        assert!(matrix.has_strict_permission(Role::Teacher, Module::Exams, Action::Read));
    }

    #[test]
    fn test_empty_allow_list_denies() {
        let matrix = StrictMatrix::default().allow(Module::Settings, Action::Delete, &[]);
        assert!(matrix.defines(Module::Settings));
        assert!(!matrix.has_strict_permission(Role::Founder, Module::Settings, Action::Delete));
    }

    #[test]
    fn test_manage_listing_does_not_imply_write() {
        let matrix = StrictMatrix::default().allow(Module::Payroll, Action::Manage, &[Role::Accountant]);
        assert!(matrix.has_strict_permission(Role::Accountant, Module::Payroll, Action::Manage));
        assert!(!matrix.has_strict_permission(Role::Accountant, Module::Payroll, Action::Write));
        assert!(!matrix.has_strict_permission(Role::Accountant, Module::Payroll, Action::Read));
    }

    #[test]
    fn test_roles_allowed_lists_superset_first() {
        let matrix = StrictMatrix::builtin();
        assert_eq!(
            matrix.roles_allowed(Module::Settings, Action::Manage),
            vec![Role::PlatformAdmin, Role::Founder]
        );
        assert_eq!(
            matrix.roles_allowed(Module::Oversight, Action::Write),
            vec![Role::PlatformAdmin]
        );
    }

    #[test]
    fn test_modules_for() {
        let matrix = StrictMatrix::builtin();
        assert_eq!(matrix.modules_for(SUPERSET_ROLE).len(), Module::ALL.len());
        assert!(!matrix.modules_for(Role::Teacher).contains(&Module::Finance));
        assert!(matrix.modules_for(Role::Parent).contains(&Module::Finance));
    }

    #[test]
    fn test_allow_deduplicates() {
        let matrix = StrictMatrix::default()
            .allow(Module::Exams, Action::Read, &[Role::Teacher])
            .allow(Module::Exams, Action::Read, &[Role::Teacher, Role::Parent]);
        assert_eq!(
            matrix.roles_allowed(Module::Exams, Action::Read),
            vec![Role::PlatformAdmin, Role::Teacher, Role::Parent]
        );
    }
}
