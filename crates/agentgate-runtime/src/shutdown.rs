//! Termination of a running agent process.
//!
//! SIGTERM first, escalating to SIGKILL when the agent ignores it, then reap
//! so no zombie is left behind.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tracing::debug;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Time an agent gets to exit after SIGTERM before it is killed.
pub const TERMINATE_GRACE: Duration = Duration::from_secs(3);

/// Terminate an agent process and wait for it to be reaped.
pub async fn terminate_agent(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        terminate_unix(child, grace).await
    }

    #[cfg(not(unix))]
    {
        let _ = grace;
        child.kill().await?;
        child.wait().await
    }
}

#[cfg(unix)]
async fn terminate_unix(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    let Some(pid) = child.id() else {
        // Already reaped.
        return child.wait().await;
    };
    let pid = i32::try_from(pid).map_err(io::Error::other)?;

    match signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => {}
        Err(nix::errno::Errno::ESRCH) => return child.wait().await,
        Err(e) => return Err(io::Error::other(e)),
    }

    if let Ok(result) = tokio::time::timeout(grace, child.wait()).await {
        return result;
    }

    debug!(pid, "Agent ignored SIGTERM, sending SIGKILL");
    child.kill().await?;
    child.wait().await
}
