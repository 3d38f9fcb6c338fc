//! 一键启动器：回收端口、拉起网关与前端静态服务、打开浏览器，
//! Ctrl-C 后按序关闭两个子进程。

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use zhangxi::config::{GATEWAY_PORT, STATIC_PORT};
use zhangxi::supervisor::{ports, shutdown_all, spawn_service, startup_health_check};

const STARTUP_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    dotenvy::dotenv().ok();

    info!("正在启动 章析 服务...");

    ports::reclaim_port(STATIC_PORT).await;
    ports::reclaim_port(GATEWAY_PORT).await;

    info!("启动后端服务...");
    let gateway = spawn_service("gateway", "zhangxi", GATEWAY_PORT)?;
    info!("启动前端服务器...");
    let static_server = spawn_service("static", "zhangxi-static", STATIC_PORT)?;

    let mut services = vec![gateway, static_server];
    if let Err(err) = startup_health_check(&mut services, STARTUP_GRACE).await {
        shutdown_all(services).await;
        return Err(err);
    }

    info!("所有服务启动成功！");
    info!("后端服务: http://localhost:{GATEWAY_PORT}");
    info!("前端服务: http://localhost:{STATIC_PORT}");

    let front_url = format!("http://localhost:{STATIC_PORT}");
    if let Err(err) = webbrowser::open(&front_url) {
        warn!("打开浏览器失败: {err}");
    }

    info!("按 Ctrl+C 停止服务...");
    tokio::signal::ctrl_c().await?;

    info!("正在关闭服务...");
    shutdown_all(services).await;
    info!("服务已关闭");

    Ok(())
}
