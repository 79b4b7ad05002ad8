use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install console-only logging.
///
/// Used when observability is compiled out or disabled with
/// `OBSERVABILITY_ENABLED=false`. `LOG_LEVEL` sets the level for Edugate
/// crates (default `info`); `RUST_LOG` overrides the whole filter.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "edugate={level},edugate_authz={level},edugate_audit={level},tower_http=warn,hyper=warn,sqlx=warn",
            level = log_level
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // A subscriber may already be installed, for example by a test harness.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
