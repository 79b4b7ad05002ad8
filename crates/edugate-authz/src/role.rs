//! Roles, their hierarchy rank and their home portal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::portal::Portal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator. Implicitly holds every strict permission.
    #[serde(rename = "super_admin")]
    PlatformAdmin,
    /// School owner (promoter/founder).
    Founder,
    Director,
    /// Pedagogy and discipline lead.
    Censor,
    /// A single person holding both the secretary and accountant duties.
    SecretaryAccountant,
    Secretary,
    Accountant,
    /// Discipline staff.
    Supervisor,
    Teacher,
    Parent,
    Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role '{0}' is not defined")]
pub struct UnknownRole(pub String);

/// Accepted spellings, matched after [`normalize_alias`].
const ROLE_ALIASES: &[(&str, Role)] = &[
    ("super_admin", Role::PlatformAdmin),
    ("superadmin", Role::PlatformAdmin),
    ("platform_admin", Role::PlatformAdmin),
    ("admin_plateforme", Role::PlatformAdmin),
    ("founder", Role::Founder),
    ("fondateur", Role::Founder),
    ("promoteur", Role::Founder),
    ("owner", Role::Founder),
    ("director", Role::Director),
    ("directeur", Role::Director),
    ("principal", Role::Director),
    ("censor", Role::Censor),
    ("censeur", Role::Censor),
    ("secretary_accountant", Role::SecretaryAccountant),
    ("secretaire_comptable", Role::SecretaryAccountant),
    ("secrétaire_comptable", Role::SecretaryAccountant),
    ("secretary", Role::Secretary),
    ("secretaire", Role::Secretary),
    ("secrétaire", Role::Secretary),
    ("accountant", Role::Accountant),
    ("comptable", Role::Accountant),
    ("bursar", Role::Accountant),
    ("supervisor", Role::Supervisor),
    ("surveillant", Role::Supervisor),
    ("surveillant_general", Role::Supervisor),
    ("teacher", Role::Teacher),
    ("enseignant", Role::Teacher),
    ("professeur", Role::Teacher),
    ("parent", Role::Parent),
    ("guardian", Role::Parent),
    ("student", Role::Student),
    ("eleve", Role::Student),
    ("élève", Role::Student),
    ("pupil", Role::Student),
];

/// Lowercase, trim, and fold spaces and dashes into underscores.
fn normalize_alias(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

impl Role {
    pub const ALL: [Role; 11] = [
        Role::PlatformAdmin,
        Role::Founder,
        Role::Director,
        Role::Censor,
        Role::SecretaryAccountant,
        Role::Secretary,
        Role::Accountant,
        Role::Supervisor,
        Role::Teacher,
        Role::Parent,
        Role::Student,
    ];

    /// Map a raw role string onto a role. Unknown spellings fail closed.
    pub fn normalize(raw: &str) -> Result<Role, UnknownRole> {
        let key = normalize_alias(raw);
        ROLE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, role)| *role)
            .ok_or_else(|| UnknownRole(raw.to_string()))
    }

    pub fn slug(self) -> &'static str {
        match self {
            Role::PlatformAdmin => "super_admin",
            Role::Founder => "founder",
            Role::Director => "director",
            Role::Censor => "censor",
            Role::SecretaryAccountant => "secretary_accountant",
            Role::Secretary => "secretary",
            Role::Accountant => "accountant",
            Role::Supervisor => "supervisor",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
            Role::Student => "student",
        }
    }

    /// Hierarchy rank, higher is more powerful.
    ///
    /// Secretary and Accountant share a rank: their permissions are split by
    /// function rather than ordered.
    pub fn rank(self) -> u8 {
        match self {
            Role::PlatformAdmin => 100,
            Role::Founder => 90,
            Role::Director => 80,
            Role::Censor => 70,
            Role::SecretaryAccountant => 65,
            Role::Secretary => 60,
            Role::Accountant => 60,
            Role::Supervisor => 50,
            Role::Teacher => 40,
            Role::Parent => 20,
            Role::Student => 10,
        }
    }

    pub fn home_portal(self) -> Portal {
        match self {
            Role::PlatformAdmin => Portal::Platform,
            Role::Founder
            | Role::Director
            | Role::Censor
            | Role::SecretaryAccountant
            | Role::Secretary
            | Role::Accountant
            | Role::Supervisor => Portal::School,
            Role::Teacher => Portal::Teacher,
            Role::Parent | Role::Student => Portal::Family,
        }
    }

    pub fn can_access_portal(self, portal: Portal) -> bool {
        self.home_portal() == portal
    }

    /// Roles this role directly manages in the school organization chart.
    pub fn supervises(self) -> &'static [Role] {
        match self {
            Role::Founder => &[Role::Director],
            Role::Director => &[
                Role::Censor,
                Role::SecretaryAccountant,
                Role::Supervisor,
                Role::Teacher,
            ],
            Role::Censor => &[Role::Supervisor],
            Role::SecretaryAccountant => &[Role::Secretary, Role::Accountant],
            _ => &[],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::normalize(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canonical_slugs() {
        for role in Role::ALL {
            assert_eq!(Role::normalize(role.slug()), Ok(role));
        }
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(Role::normalize("DIRECTEUR"), Ok(Role::Director));
        assert_eq!(Role::normalize("  Teacher "), Ok(Role::Teacher));
        assert_eq!(Role::normalize("Secrétaire-Comptable"), Ok(Role::SecretaryAccountant));
        assert_eq!(Role::normalize("SUPER ADMIN"), Ok(Role::PlatformAdmin));
        assert_eq!(Role::normalize("ÉLÈVE"), Ok(Role::Student));
    }

    #[test]
    fn test_normalize_english_synonyms() {
        assert_eq!(Role::normalize("principal"), Ok(Role::Director));
        assert_eq!(Role::normalize("owner"), Ok(Role::Founder));
        assert_eq!(Role::normalize("pupil"), Ok(Role::Student));
        assert_eq!(Role::normalize("guardian"), Ok(Role::Parent));
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let err = Role::normalize("janitor").unwrap_err();
        assert_eq!(err.to_string(), "Role 'janitor' is not defined");
        assert!(Role::normalize("").is_err());
    }

    #[test]
    fn test_every_role_has_exactly_one_portal() {
        for role in Role::ALL {
            let accessible: Vec<Portal> = Portal::ALL
                .into_iter()
                .filter(|portal| role.can_access_portal(*portal))
                .collect();
            assert_eq!(accessible, vec![role.home_portal()], "role {role}");
        }
    }

    #[test]
    fn test_supervised_roles_rank_lower() {
        for role in Role::ALL {
            for junior in role.supervises() {
                assert!(role.rank() > junior.rank(), "{role} over {junior}");
            }
        }
    }

    #[test]
    fn test_serde_uses_slugs() {
        assert_eq!(serde_json::to_string(&Role::PlatformAdmin).unwrap(), r#""super_admin""#);
        assert_eq!(
            serde_json::to_string(&Role::SecretaryAccountant).unwrap(),
            r#""secretary_accountant""#
        );
    }
}
