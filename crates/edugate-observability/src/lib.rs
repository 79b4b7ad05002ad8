//! Edugate Observability
//!
//! Provides configurable observability features including:
//! - Structured logging and distributed tracing via OpenTelemetry
//! - Prometheus metrics for HTTP traffic and authorization decisions
//! - HTTP request/response logging
//!
//! Everything beyond console logging is compiled only with the
//! `observability` feature (on by default). At runtime it can be switched
//! off with `OBSERVABILITY_ENABLED=false`, in which case only console
//! logging is installed.
//!
//! # Examples
//!
//! ```no_run
//! use edugate_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     // ... application code ...
//!     shutdown_tracer().await;
//!     Ok(())
//! }
//! ```

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, is_observability_enabled, metrics_middleware, track_audit_write,
    track_authz_decision,
};

// No-op stand-ins when observability is compiled out
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    /// Placeholder for the Prometheus handle; renders nothing.
    #[derive(Clone, Debug)]
    pub struct PrometheusHandle;

    impl PrometheusHandle {
        pub fn render(&self) -> String {
            String::new()
        }
    }

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Console logging only.
    pub fn init_tracing() -> anyhow::Result<()> {
        super::init_basic_console_logging();
        Ok(())
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn track_authz_decision(_outcome: &str, _stage: &str) {}
    pub fn track_audit_write(_result: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
