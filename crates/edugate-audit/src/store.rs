//! Denial storage backends.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::model::{DenialRecord, NewDenialRecord};

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("denial store query failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("denial store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only store of denial records, partitioned by tenant.
///
/// Reads return newest first and never more than `limit` rows.
#[async_trait]
pub trait DenialStore: Send + Sync {
    async fn insert(&self, record: NewDenialRecord) -> Result<DenialRecord, AuditError>;

    async fn recent(&self, tenant_id: Uuid, limit: i64) -> Result<Vec<DenialRecord>, AuditError>;

    async fn for_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DenialRecord>, AuditError>;
}

const DENIAL_COLUMNS: &str = "id, tenant_id, user_id, user_email, user_role, module, action, \
     reason, ip_address, user_agent, created_at";

#[derive(Debug, Clone)]
pub struct PgDenialStore {
    db: PgPool,
}

impl PgDenialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DenialStore for PgDenialStore {
    #[instrument(skip(self, record), fields(tenant_id = %record.tenant_id))]
    async fn insert(&self, record: NewDenialRecord) -> Result<DenialRecord, AuditError> {
        let query = format!(
            r#"INSERT INTO authorization_denials
                   (tenant_id, user_id, user_email, user_role, module, action, reason, ip_address, user_agent)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {DENIAL_COLUMNS}"#
        );

        let stored = sqlx::query_as::<_, DenialRecord>(&query)
            .bind(record.tenant_id)
            .bind(record.user_id)
            .bind(&record.user_email)
            .bind(&record.user_role)
            .bind(&record.module)
            .bind(&record.action)
            .bind(&record.reason)
            .bind(&record.ip_address)
            .bind(&record.user_agent)
            .fetch_one(&self.db)
            .await?;

        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn recent(&self, tenant_id: Uuid, limit: i64) -> Result<Vec<DenialRecord>, AuditError> {
        let query = format!(
            r#"SELECT {DENIAL_COLUMNS}
               FROM authorization_denials
               WHERE tenant_id = $1
               ORDER BY created_at DESC
               LIMIT $2"#
        );

        let records = sqlx::query_as::<_, DenialRecord>(&query)
            .bind(tenant_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(records)
    }

    #[instrument(skip(self))]
    async fn for_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DenialRecord>, AuditError> {
        let query = format!(
            r#"SELECT {DENIAL_COLUMNS}
               FROM authorization_denials
               WHERE tenant_id = $1 AND user_id = $2
               ORDER BY created_at DESC
               LIMIT $3"#
        );

        let records = sqlx::query_as::<_, DenialRecord>(&query)
            .bind(tenant_id)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(records)
    }
}

/// Records kept by [`MemoryDenialStore::new`] before the oldest are evicted.
pub const MEMORY_STORE_CAPACITY: usize = 10_000;

/// Process-local store, used by tests and `AUDIT_STORE=memory`.
///
/// Holds at most `capacity` records; inserting past that drops the oldest.
#[derive(Debug)]
pub struct MemoryDenialStore {
    records: RwLock<VecDeque<DenialRecord>>,
    capacity: usize,
}

impl Default for MemoryDenialStore {
    fn default() -> Self {
        Self::with_capacity(MEMORY_STORE_CAPACITY)
    }
}

impl MemoryDenialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn all(&self) -> Vec<DenialRecord> {
        self.records.read().await.iter().cloned().collect()
    }

    async fn newest_matching<F>(&self, limit: i64, matches: F) -> Vec<DenialRecord>
    where
        F: Fn(&DenialRecord) -> bool,
    {
        let records = self.records.read().await;
        records
            .iter()
            .rev()
            .filter(|record| matches(record))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DenialStore for MemoryDenialStore {
    async fn insert(&self, record: NewDenialRecord) -> Result<DenialRecord, AuditError> {
        let stored = DenialRecord {
            id: Uuid::new_v4(),
            tenant_id: record.tenant_id,
            user_id: record.user_id,
            user_email: record.user_email,
            user_role: record.user_role,
            module: record.module,
            action: record.action,
            reason: record.reason,
            ip_address: record.ip_address,
            user_agent: record.user_agent,
            created_at: Utc::now(),
        };

        let mut records = self.records.write().await;
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(stored.clone());
        Ok(stored)
    }

    async fn recent(&self, tenant_id: Uuid, limit: i64) -> Result<Vec<DenialRecord>, AuditError> {
        Ok(self
            .newest_matching(limit, |record| record.tenant_id == tenant_id)
            .await)
    }

    async fn for_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DenialRecord>, AuditError> {
        Ok(self
            .newest_matching(limit, |record| {
                record.tenant_id == tenant_id && record.user_id == user_id
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tenant_id: Uuid, user_id: Uuid, reason: &str) -> NewDenialRecord {
        NewDenialRecord {
            tenant_id,
            user_id,
            user_email: "teacher@school.test".to_string(),
            user_role: "teacher".to_string(),
            module: "finance".to_string(),
            action: "read".to_string(),
            reason: reason.to_string(),
            ip_address: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_returns_newest_first() {
        let store = MemoryDenialStore::new();
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();

        for reason in ["first", "second", "third"] {
            store.insert(record(tenant, user, reason)).await.unwrap();
        }

        let recent = store.recent(tenant, 2).await.unwrap();
        let reasons: Vec<_> = recent.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(reasons, ["third", "second"]);
    }

    #[tokio::test]
    async fn test_memory_store_partitions_by_tenant() {
        let store = MemoryDenialStore::new();
        let tenant = Uuid::new_v4();
        let other_tenant = Uuid::new_v4();
        let user = Uuid::new_v4();

        store.insert(record(tenant, user, "mine")).await.unwrap();
        store.insert(record(other_tenant, user, "theirs")).await.unwrap();

        let recent = store.recent(tenant, 50).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].reason, "mine");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_memory_store_filters_by_user() {
        let store = MemoryDenialStore::new();
        let tenant = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(record(tenant, alice, "alice")).await.unwrap();
        store.insert(record(tenant, bob, "bob")).await.unwrap();

        let for_bob = store.for_user(tenant, bob, 10).await.unwrap();
        assert_eq!(for_bob.len(), 1);
        assert_eq!(for_bob[0].user_id, bob);
        assert!(store.for_user(Uuid::new_v4(), bob, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_evicts_oldest_past_capacity() {
        let store = MemoryDenialStore::with_capacity(2);
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();

        for reason in ["first", "second", "third"] {
            store.insert(record(tenant, user, reason)).await.unwrap();
        }

        assert_eq!(store.len().await, 2);
        let reasons: Vec<_> = store.all().await.into_iter().map(|r| r.reason).collect();
        assert_eq!(reasons, ["second", "third"]);
    }
}
