use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use zhangxi::api::{AppState, router};
use zhangxi::config::{AppConfig, GATEWAY_PORT};
use zhangxi::services::provider::resolve;
use zhangxi::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    // An unknown provider selector is startup-fatal.
    let conn = resolve(&config)?;
    info!(provider = %conn.provider, model = %conn.model, "AI 后端已就绪");

    let app = router(AppState::new(config));

    let listener = TcpListener::bind(("0.0.0.0", GATEWAY_PORT))
        .await
        .with_context(|| format!("无法绑定端口 {GATEWAY_PORT}"))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
