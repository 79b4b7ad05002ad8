use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use edugate_authz::DenialAudit;

/// A denial as stored in `authorization_denials`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct DenialRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    /// Raw role string as carried by the token.
    pub user_role: String,
    pub module: String,
    pub action: String,
    pub reason: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDenialRecord {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_role: String,
    pub module: String,
    pub action: String,
    pub reason: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewDenialRecord {
    /// `None` when the denial carries no tenant, which the store requires.
    pub fn from_audit(audit: DenialAudit) -> Option<Self> {
        let tenant_id = audit.tenant_id?;

        Some(Self {
            tenant_id,
            user_id: audit.user_id,
            user_email: audit.user_email,
            user_role: audit.user_role,
            module: audit.module.slug().to_string(),
            action: audit.action.slug().to_string(),
            reason: audit.reason,
            ip_address: audit.client.ip_address,
            user_agent: audit.client.user_agent,
        })
    }
}
