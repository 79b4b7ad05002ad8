use std::sync::Arc;

use anyhow::Context;

use edugate_audit::{Auditor, DenialStore, MemoryDenialStore, PgDenialStore};
use edugate_authz::{AuthzEngine, BypassAuthority};
use edugate_config::{AuditConfig, AuditStoreKind, BypassConfig, CorsConfig, JwtConfig};
use edugate_observability::PrometheusHandle;

use crate::routes::route_table;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AuthzEngine>,
    pub auditor: Auditor,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("auditor", &self.auditor)
            .field("jwt_config", &"<redacted>")
            .field("cors_config", &self.cors_config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    pub fn new(
        engine: AuthzEngine,
        auditor: Auditor,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            auditor,
            jwt_config,
            cors_config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Option<PrometheusHandle>) -> Self {
        self.metrics = metrics;
        self
    }
}

/// Build the authorization engine from the built-in tables.
///
/// Fails when the lenient and strict matrices disagree.
pub fn init_engine(bypass: BypassConfig) -> anyhow::Result<AuthzEngine> {
    let engine = AuthzEngine::builtin(BypassAuthority::new(bypass), route_table()).map_err(
        |err| {
            for drift in &err.drifts {
                tracing::error!(%drift, "Permission matrix drift");
            }
            anyhow::Error::new(err)
        },
    )?;

    tracing::info!(
        routes = engine.routes().len(),
        bypass_enabled = engine.bypass().is_enabled(),
        "Authorization engine ready"
    );
    Ok(engine)
}

async fn init_denial_store(config: &AuditConfig) -> anyhow::Result<Arc<dyn DenialStore>> {
    match config.store {
        AuditStoreKind::Memory => {
            tracing::warn!("Using in-memory denial store; denials are lost on restart");
            Ok(Arc::new(MemoryDenialStore::new()))
        }
        AuditStoreKind::Postgres => {
            let pool = edugate_db::init_db_pool().await?;
            edugate_db::run_migrations(&pool)
                .await
                .context("Denial log schema is not available")?;
            Ok(Arc::new(PgDenialStore::new(pool)))
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let bypass_config = BypassConfig::from_env();
    let jwt_config = JwtConfig::from_env(bypass_config.environment)
        .context("Refusing to start without a token signing secret")?;
    let engine = init_engine(bypass_config)?;
    let audit_config = AuditConfig::from_env();
    let store = init_denial_store(&audit_config).await?;

    Ok(AppState::new(
        engine,
        Auditor::new(store, audit_config),
        jwt_config,
        CorsConfig::from_env(),
    ))
}
