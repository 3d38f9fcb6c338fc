//! Termination primitives: SIGTERM first, SIGKILL when a process refuses.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::time::{sleep, timeout};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Grace period between SIGTERM and SIGKILL.
const TERM_GRACE: Duration = Duration::from_secs(5);

/// Kill a process we do not own. No `Child` handle exists, so the process
/// cannot be reaped here; used against stale port holders.
///
/// Returns `Ok(())` when the process was killed or was already gone.
pub async fn kill_pid(pid: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        kill_pid_unix(pid).await
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "killing by pid is only supported on unix",
        ))
    }
}

#[cfg(unix)]
async fn kill_pid_unix(pid: u32) -> io::Result<()> {
    let target = Pid::from_raw(pid as i32);

    match signal::kill(target, Signal::SIGTERM) {
        Err(Errno::ESRCH) => return Ok(()),
        Err(e) => return Err(io::Error::other(e)),
        Ok(()) => {}
    }
    if wait_for_exit(target, 20).await {
        return Ok(());
    }

    match signal::kill(target, Signal::SIGKILL) {
        Err(Errno::ESRCH) => return Ok(()),
        Err(e) => return Err(io::Error::other(e)),
        Ok(()) => {}
    }
    if wait_for_exit(target, 20).await {
        return Ok(());
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("进程 {pid} 在 SIGKILL 后仍未退出"),
    ))
}

/// Poll with the null signal until the pid disappears.
#[cfg(unix)]
async fn wait_for_exit(pid: Pid, attempts: u32) -> bool {
    for _ in 0..attempts {
        sleep(Duration::from_millis(100)).await;
        if let Err(Errno::ESRCH) = signal::kill(pid, None) {
            return true;
        }
    }
    false
}

/// Gracefully shut down an owned child: SIGTERM, wait up to the grace
/// period, then SIGKILL. Always reaps, so no zombie is left behind.
///
/// On non-unix platforms there is no SIGTERM equivalent; the child is
/// killed immediately.
pub async fn shutdown_child(mut child: Child) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => return Err(io::Error::other(e)),
            }

            if let Ok(status) = timeout(TERM_GRACE, child.wait()).await {
                return status;
            }
        }
    }

    child.kill().await?;
    child.wait().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::process::Command;

    #[tokio::test]
    #[cfg(unix)]
    async fn kill_pid_tolerates_an_absent_process() {
        kill_pid(999_999).await.expect("absent pid is a success");
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn kill_pid_terminates_a_live_process() {
        let mut child = Command::new("sleep")
            .arg("60")
            .spawn()
            .expect("failed to spawn sleep");
        let pid = child.id().expect("no pid");

        kill_pid(pid).await.expect("kill failed");

        // Reap to avoid leaving a zombie in the test run.
        let _ = child.wait().await;
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn shutdown_child_stops_a_live_process() {
        let child = Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("failed to spawn sleep");

        shutdown_child(child).await.expect("shutdown failed");
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn shutdown_child_handles_an_already_exited_process() {
        let child = Command::new("echo")
            .arg("done")
            .spawn()
            .expect("failed to spawn echo");

        sleep(Duration::from_millis(100)).await;

        shutdown_child(child).await.expect("shutdown failed");
    }
}
