//! Agreement between the lenient and strict matrices.
//!
//! The two tables are authored separately. A [`Drift`] is any
//! (role, module, action) where they give different answers. The super-set
//! role is skipped because the strict path grants it everything implicitly.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::lenient::LenientMatrix;
use crate::module::{Action, Module};
use crate::role::Role;
use crate::strict::{SUPERSET_ROLE, StrictMatrix};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drift {
    pub role: Role,
    pub module: Module,
    pub action: Action,
    pub lenient: bool,
    pub strict: bool,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}: lenient={} strict={}",
            self.role, self.module, self.action, self.lenient, self.strict
        )
    }
}

#[derive(Debug, Error)]
#[error("permission matrices disagree on {} entries", .drifts.len())]
pub struct ConsistencyError {
    pub drifts: Vec<Drift>,
}

pub fn check(lenient: &LenientMatrix, strict: &StrictMatrix) -> Vec<Drift> {
    let mut drifts = Vec::new();

    for role in Role::ALL.into_iter().filter(|r| *r != SUPERSET_ROLE) {
        for module in Module::ALL {
            for action in Action::ALL {
                let lenient_allows = lenient.has_permission(role, module, Some(action));
                let strict_allows = strict.has_strict_permission(role, module, action);
                if lenient_allows != strict_allows {
                    drifts.push(Drift {
                        role,
                        module,
                        action,
                        lenient: lenient_allows,
                        strict: strict_allows,
                    });
                }
            }
        }
    }

    drifts
}

pub fn ensure_consistent(
    lenient: &LenientMatrix,
    strict: &StrictMatrix,
) -> Result<(), ConsistencyError> {
    let drifts = check(lenient, strict);
    if drifts.is_empty() {
        Ok(())
    } else {
        Err(ConsistencyError { drifts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_matrices_agree() {
        let drifts = check(&LenientMatrix::builtin(), &StrictMatrix::builtin());
        assert!(drifts.is_empty(), "drift: {drifts:?}");
    }

    #[test]
    fn test_detects_lenient_grant_without_strict_listing() {
        let lenient = LenientMatrix::default().grant(Role::Teacher, Module::Exams, Action::Write);
        let strict = StrictMatrix::default().allow(Module::Exams, Action::Read, &[Role::Teacher]);

        let drifts = check(&lenient, &strict);
        assert_eq!(
            drifts,
            vec![Drift {
                role: Role::Teacher,
                module: Module::Exams,
                action: Action::Write,
                lenient: true,
                strict: false,
            }]
        );
        assert!(ensure_consistent(&lenient, &strict).is_err());
    }

    #[test]
    fn test_detects_strict_listing_without_lenient_entry() {
        let strict = StrictMatrix::default().allow(Module::Payroll, Action::Read, &[Role::Parent]);
        let drifts = check(&LenientMatrix::default(), &strict);
        assert_eq!(drifts.len(), 1);
        assert!(drifts[0].strict && !drifts[0].lenient);
    }

    #[test]
    fn test_superset_role_is_ignored() {
        let lenient = LenientMatrix::default();
        let strict = StrictMatrix::default();
        assert!(check(&lenient, &strict).is_empty());
    }
}
