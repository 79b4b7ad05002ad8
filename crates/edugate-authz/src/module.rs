//! Functional modules and the four capability levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Students,
    Enrollment,
    Documents,
    PedagogicalOrganization,
    Materials,
    Exams,
    ReportCards,
    Finance,
    Collections,
    Expenses,
    HumanResources,
    Payroll,
    Communication,
    Settings,
    AcademicYears,
    /// Analytics and oversight surface. Globally read-only.
    Oversight,
    HealthSafety,
}

/// The module on which only reads are ever permitted.
pub const READ_ONLY_MODULE: Module = Module::Oversight;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown module '{0}'")]
pub struct UnknownModule(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl Module {
    pub const ALL: [Module; 17] = [
        Module::Students,
        Module::Enrollment,
        Module::Documents,
        Module::PedagogicalOrganization,
        Module::Materials,
        Module::Exams,
        Module::ReportCards,
        Module::Finance,
        Module::Collections,
        Module::Expenses,
        Module::HumanResources,
        Module::Payroll,
        Module::Communication,
        Module::Settings,
        Module::AcademicYears,
        Module::Oversight,
        Module::HealthSafety,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Module::Students => "students",
            Module::Enrollment => "enrollment",
            Module::Documents => "documents",
            Module::PedagogicalOrganization => "pedagogical_organization",
            Module::Materials => "materials",
            Module::Exams => "exams",
            Module::ReportCards => "report_cards",
            Module::Finance => "finance",
            Module::Collections => "collections",
            Module::Expenses => "expenses",
            Module::HumanResources => "human_resources",
            Module::Payroll => "payroll",
            Module::Communication => "communication",
            Module::Settings => "settings",
            Module::AcademicYears => "academic_years",
            Module::Oversight => "oversight",
            Module::HealthSafety => "health_safety",
        }
    }

    pub fn is_read_only(self) -> bool {
        self == READ_ONLY_MODULE
    }

    /// Modules whose permissions follow the finance line rather than rank.
    pub fn is_finance(self) -> bool {
        matches!(
            self,
            Module::Finance | Module::Collections | Module::Expenses | Module::Payroll
        )
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Module {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Module::ALL
            .into_iter()
            .find(|module| module.slug() == key)
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}

/// Capability level. `Manage` implies every other level; `Write` and
/// `Delete` are independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Read,
    Write,
    Delete,
    Manage,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Write, Action::Delete, Action::Manage];

    pub fn slug(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
            Action::Manage => "manage",
        }
    }

    /// Whether holding `self` is enough to perform `requested`.
    pub fn grants(self, requested: Action) -> bool {
        match (self, requested) {
            (_, Action::Read) => true,
            (Action::Manage, _) => true,
            (held, requested) => held == requested,
        }
    }

    /// Every action `self` grants, in [`Action::ALL`] order.
    pub fn implied(self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|requested| self.grants(*requested))
            .collect()
    }

    pub fn is_write_class(self) -> bool {
        self != Action::Read
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read" => Ok(Action::Read),
            "write" => Ok(Action::Write),
            "delete" => Ok(Action::Delete),
            "manage" => Ok(Action::Manage),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manage_implies_everything() {
        for action in Action::ALL {
            assert!(Action::Manage.grants(action));
        }
    }

    #[test]
    fn test_write_and_delete_are_independent() {
        assert!(Action::Write.grants(Action::Read));
        assert!(Action::Delete.grants(Action::Read));
        assert!(!Action::Write.grants(Action::Delete));
        assert!(!Action::Delete.grants(Action::Write));
        assert!(!Action::Write.grants(Action::Manage));
    }

    #[test]
    fn test_read_grants_only_read() {
        assert_eq!(Action::Read.implied(), vec![Action::Read]);
        assert_eq!(Action::Write.implied(), vec![Action::Read, Action::Write]);
    }

    #[test]
    fn test_module_from_str() {
        assert_eq!("report-cards".parse::<Module>(), Ok(Module::ReportCards));
        assert_eq!("FINANCE".parse::<Module>(), Ok(Module::Finance));
        assert!("cafeteria".parse::<Module>().is_err());
        for module in Module::ALL {
            assert_eq!(module.slug().parse::<Module>(), Ok(module));
        }
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("Manage".parse::<Action>(), Ok(Action::Manage));
        assert!("export".parse::<Action>().is_err());
    }

    #[test]
    fn test_single_read_only_module() {
        let read_only: Vec<Module> = Module::ALL.into_iter().filter(|m| m.is_read_only()).collect();
        assert_eq!(read_only, vec![Module::Oversight]);
    }
}
