//! Local process supervision for the gateway and static-content server.
//!
//! The launcher performs a single health check shortly after spawning;
//! children that crash later are not detected or restarted. Accepted
//! limitation for a local developer tool.

pub mod ports;
pub mod shutdown;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{error, info};

/// A child process owned by the launcher.
pub struct ManagedService {
    pub name: &'static str,
    pub port: u16,
    pub child: Child,
}

/// Spawn a sibling binary as an independent child process. Siblings are
/// looked up next to the launcher executable first, then on PATH.
pub fn spawn_service(
    name: &'static str,
    binary: &str,
    port: u16,
) -> anyhow::Result<ManagedService> {
    let program = sibling_binary(binary);
    let child = Command::new(&program)
        .spawn()
        .with_context(|| format!("启动 {name} 失败 ({})", program.display()))?;

    let pid = child.id().unwrap_or_default();
    info!(service = name, pid, port, "服务已启动");

    Ok(ManagedService { name, port, child })
}

fn sibling_binary(binary: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join(binary);
            if candidate.is_file() {
                return candidate;
            }
        }
    }
    PathBuf::from(binary)
}

/// One-shot startup check: wait a fixed delay, then verify neither child
/// has already exited. Nothing is polled after this.
pub async fn startup_health_check(
    services: &mut [ManagedService],
    delay: Duration,
) -> anyhow::Result<()> {
    sleep(delay).await;

    for service in services.iter_mut() {
        if let Some(status) = service
            .child
            .try_wait()
            .with_context(|| format!("无法检查 {} 的进程状态", service.name))?
        {
            bail!("{} 启动失败，进程已退出 ({status})", service.name);
        }
    }

    Ok(())
}

/// Terminate every child in order: SIGTERM, bounded wait, SIGKILL
/// escalation. Outcomes are logged, never propagated, so each child gets
/// its turn.
pub async fn shutdown_all(services: Vec<ManagedService>) {
    for service in services {
        match shutdown::shutdown_child(service.child).await {
            Ok(status) => info!(service = service.name, %status, "服务已关闭"),
            Err(err) => error!(service = service.name, "关闭服务失败: {err}"),
        }
    }
}
