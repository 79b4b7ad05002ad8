use std::fmt::Write;

use edugate_audit::DenialRecord;
use edugate_authz::{Action, Drift, LenientMatrix, Module, Role, StrictMatrix, consistency};

pub fn roles() -> String {
    let mut out = format!("{:<22} {:>4}  {}\n", "ROLE", "RANK", "PORTAL");
    for role in Role::ALL {
        let _ = writeln!(out, "{:<22} {:>4}  {}", role.slug(), role.rank(), role.home_portal());
    }
    out
}

fn flag(value: bool) -> &'static str {
    if value { "x" } else { "-" }
}

/// Lenient projection for one role, one module per line.
pub fn matrix(lenient: &LenientMatrix, role: Role) -> String {
    let mut out = format!(
        "{:<26} {:<7} {} {} {} {}\n",
        "MODULE", "LEVEL", "R", "W", "D", "M"
    );
    for entry in lenient.ui_projection(role) {
        let _ = writeln!(
            out,
            "{:<26} {:<7} {} {} {} {}",
            entry.module.slug(),
            entry.level.slug(),
            flag(entry.can_read),
            flag(entry.can_write),
            flag(entry.can_delete),
            flag(entry.can_manage),
        );
    }
    out
}

pub fn check(
    lenient: &LenientMatrix,
    strict: &StrictMatrix,
    role: Role,
    module: Module,
    action: Action,
    use_strict: bool,
) -> bool {
    let allowed = if use_strict {
        strict.has_strict_permission(role, module, action)
    } else {
        lenient.has_permission(role, module, Some(action))
    };
    allowed && !(module.is_read_only() && action.is_write_class())
}

pub fn lint(lenient: &LenientMatrix, strict: &StrictMatrix) -> Vec<Drift> {
    consistency::check(lenient, strict)
}

pub fn denials(records: &[DenialRecord]) -> String {
    if records.is_empty() {
        return "No denials recorded.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "{}  {}  {} ({})  {}/{}  {}",
            record.created_at.to_rfc3339(),
            record.user_id,
            record.user_email,
            record.user_role,
            record.module,
            record.action,
            record.reason,
        );
    }
    out
}
