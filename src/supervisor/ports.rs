//! Port reclamation: make sure the service ports can be bound before
//! anything is spawned on them.

use std::net::TcpListener;

use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::shutdown::kill_pid;

/// Check if a port is available by attempting to bind to it. Binding and
/// immediately dropping the listener releases the port again.
pub fn is_port_available(port: u16) -> bool {
    match TcpListener::bind(("127.0.0.1", port)) {
        Ok(listener) => listener.local_addr().is_ok(),
        Err(_) => false,
    }
}

/// Pids with a listening TCP socket on `port`, via `lsof`. An absent or
/// failing `lsof` yields an empty list.
async fn pids_listening_on(port: u16) -> Vec<u32> {
    let output = Command::new("lsof")
        .args(["-t", "-i", &format!("tcp:{port}"), "-s", "TCP:LISTEN"])
        .output()
        .await;

    match output {
        Ok(out) => String::from_utf8_lossy(&out.stdout)
            .lines()
            .filter_map(|line| line.trim().parse().ok())
            .collect(),
        Err(err) => {
            debug!(port, "lsof 不可用: {err}");
            Vec::new()
        }
    }
}

/// Forcibly free a port before binding to it. Runs unconditionally before
/// spawn; a port with no holder and a holder that has already exited both
/// count as success. Failures on a single process are logged and skipped.
pub async fn reclaim_port(port: u16) {
    if is_port_available(port) {
        debug!(port, "端口空闲");
        return;
    }

    let pids = pids_listening_on(port).await;
    if pids.is_empty() {
        warn!(port, "端口被占用但找不到持有进程");
        return;
    }

    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, false);

    for pid in pids {
        let name = system
            .process(Pid::from_u32(pid))
            .map(|process| process.name().to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        info!(port, pid, process = %name, "终止端口 {port} 上的进程 {pid}");

        if let Err(err) = kill_pid(pid).await {
            warn!(port, pid, "终止进程失败，跳过: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_port_is_reported_busy() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();

        assert!(!is_port_available(port));
        drop(listener);
        assert!(is_port_available(port));
    }

    #[tokio::test]
    async fn reclaiming_a_free_port_is_a_no_op() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        reclaim_port(port).await;
        assert!(is_port_available(port));
    }
}
