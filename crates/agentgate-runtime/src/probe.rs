//! Startup prerequisite check for the agent binary.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::debug;

use crate::command::AgentCommand;

/// Upper bound on the `--version` probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Verify the configured agent can be launched.
///
/// Runs `<program> [launcher args] --version` and returns its trimmed stdout.
pub async fn check_agent_available(command: &AgentCommand) -> Result<String> {
    let program = command.program_name();
    debug!(program = %program, "Probing agent");

    let output = tokio::time::timeout(
        PROBE_TIMEOUT,
        Command::new(&command.program)
            .args(&command.launcher_args)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .with_context(|| format!("'{program} --version' did not finish within {PROBE_TIMEOUT:?}"))?
    .with_context(|| format!("Failed to run agent '{program}'. Is it installed and on PATH?"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "'{program} --version' exited with {}: {}",
            output.status,
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> AgentCommand {
        AgentCommand::new("sh").with_launcher_args(vec![
            "-c".to_string(),
            script.to_string(),
            "fake-agent".to_string(),
        ])
    }

    #[tokio::test]
    async fn reports_version() {
        let version = check_agent_available(&sh(r#"[ "$1" = "--version" ] && echo "1.2.3 (Agent)""#))
            .await
            .unwrap();
        assert_eq!(version, "1.2.3 (Agent)");
    }

    #[tokio::test]
    async fn fails_on_non_zero_exit() {
        let err = check_agent_available(&sh("echo nope >&2; exit 4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn fails_when_missing() {
        let err = check_agent_available(&AgentCommand::new("/nonexistent/agentgate-probe"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/agentgate-probe"));
    }
}
