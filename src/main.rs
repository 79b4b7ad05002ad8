use dotenvy::dotenv;

use edugate::router::init_router;
use edugate::state::init_app_state;
use edugate_config::ServerConfig;
use edugate_observability::{init_metrics, init_tracing, shutdown_tracer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let state = init_app_state().await?.with_metrics(init_metrics());
    let app = init_router(state);

    let server = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(server.bind_address()).await?;
    tracing::info!(address = %server.bind_address(), "🚀 Server running");
    tracing::info!("📚 Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    shutdown_tracer().await;
    Ok(())
}
