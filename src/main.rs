use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use coursehub::logging::init_logging;
use coursehub::router::init_router;
use coursehub::state::init_app_state;
use coursehub_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let server_config = ServerConfig::from_env();
    let state = init_app_state(&server_config).await?;
    let app = init_router(state);

    let addr = server_config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
