//! 前端静态资源服务器，由启动器作为独立子进程拉起。

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use zhangxi::config::STATIC_PORT;
use zhangxi::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let root = std::env::var("STATIC_DIR").unwrap_or_else(|_| "web".to_string());

    let app = Router::new()
        .fallback_service(ServeDir::new(&root))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(("0.0.0.0", STATIC_PORT))
        .await
        .with_context(|| format!("无法绑定端口 {STATIC_PORT}"))?;
    info!(root = %root, "Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
