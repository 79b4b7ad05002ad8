//! Best-effort denial auditor.
//!
//! [`Auditor::log`] never fails: a denial without a tenant is skipped and a
//! store error is logged and swallowed. The authorization decision has
//! already been made by the time it runs.

use std::sync::Arc;
use uuid::Uuid;

use edugate_authz::DenialAudit;
use edugate_config::AuditConfig;
use edugate_observability::track_audit_write;

use crate::model::{DenialRecord, NewDenialRecord};
use crate::store::{AuditError, DenialStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Written,
    SkippedNoTenant,
    Failed,
}

impl AuditOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditOutcome::Written => "written",
            AuditOutcome::SkippedNoTenant => "skipped",
            AuditOutcome::Failed => "failed",
        }
    }
}

#[derive(Clone)]
pub struct Auditor {
    store: Arc<dyn DenialStore>,
    config: AuditConfig,
}

impl std::fmt::Debug for Auditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Auditor {
    pub fn new(store: Arc<dyn DenialStore>, config: AuditConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub async fn log(&self, audit: DenialAudit) -> AuditOutcome {
        let user_id = audit.user_id;
        let outcome = match NewDenialRecord::from_audit(audit) {
            None => {
                tracing::warn!(
                    security.event = "authorization_denied",
                    %user_id,
                    "Denial has no tenant, audit record skipped"
                );
                AuditOutcome::SkippedNoTenant
            }
            Some(record) => match self.store.insert(record).await {
                Ok(stored) => {
                    tracing::debug!(denial_id = %stored.id, %user_id, "Denial recorded");
                    AuditOutcome::Written
                }
                Err(err) => {
                    tracing::error!(error = %err, %user_id, "Failed to record denial");
                    AuditOutcome::Failed
                }
            },
        };

        track_audit_write(outcome.as_str());
        outcome
    }

    pub async fn recent(
        &self,
        tenant_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<DenialRecord>, AuditError> {
        self.store
            .recent(tenant_id, self.config.clamp_limit(limit))
            .await
    }

    pub async fn for_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<DenialRecord>, AuditError> {
        self.store
            .for_user(tenant_id, user_id, self.config.clamp_limit(limit))
            .await
    }
}
