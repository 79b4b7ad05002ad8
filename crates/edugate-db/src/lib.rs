//! # Edugate DB
//!
//! PostgreSQL pool initialization and schema migrations.
//!
//! ```ignore
//! use edugate_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool().await?;
//! run_migrations(&pool).await?;
//! ```

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;

/// Connect to the database named by `DATABASE_URL`.
///
/// `DATABASE_MAX_CONNECTIONS` caps the pool size (default 10).
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(max_connections, "Database pool initialized");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    Ok(())
}

pub use sqlx::PgPool;
