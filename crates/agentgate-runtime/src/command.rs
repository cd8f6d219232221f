//! Agent invocation settings and argument construction.

use std::path::PathBuf;
use std::time::Duration;

use agentgate_core::AgentRequest;

/// Default program name of the agent CLI.
pub const DEFAULT_AGENT_PROGRAM: &str = "claude";

/// Hard upper bound on one agent run, measured from spawn.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(120);

/// How to launch the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCommand {
    /// Agent executable, resolved through `PATH` when not absolute.
    pub program: PathBuf,
    /// Arguments placed before the protocol flags (e.g. a wrapper script).
    pub launcher_args: Vec<String>,
    /// Wall-clock bound for a single run.
    pub timeout: Duration,
}

impl Default for AgentCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_AGENT_PROGRAM),
            launcher_args: Vec::new(),
            timeout: DEFAULT_AGENT_TIMEOUT,
        }
    }
}

impl AgentCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_launcher_args(mut self, args: Vec<String>) -> Self {
        self.launcher_args = args;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Printable program name for logs and errors.
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Full argument list for one run.
    pub fn build_args(&self, request: &AgentRequest) -> Vec<String> {
        let mut args = self.launcher_args.clone();
        args.extend(protocol_args(request));
        args
    }
}

/// Flags that put the agent into single-shot stream-json mode.
pub fn protocol_args(request: &AgentRequest) -> Vec<String> {
    let mut args: Vec<String> = [
        "--print",
        "--verbose",
        "--input-format",
        "stream-json",
        "--output-format",
        "stream-json",
        "--dangerously-skip-permissions",
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    if request.streaming {
        args.push("--include-partial-messages".to_string());
    }

    if let Some(prompt) = &request.system_prompt {
        args.push("--system-prompt".to_string());
        args.push(prompt.clone());
    }

    args.push("--session-id".to_string());
    args.push(request.session_id.clone());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(streaming: bool, system_prompt: Option<&str>) -> AgentRequest {
        AgentRequest {
            ndjson: String::new(),
            system_prompt: system_prompt.map(str::to_string),
            session_id: "sess-1".to_string(),
            streaming,
        }
    }

    #[test]
    fn test_default_command() {
        let cmd = AgentCommand::default();
        assert_eq!(cmd.program, PathBuf::from("claude"));
        assert_eq!(cmd.timeout, Duration::from_secs(120));
        assert!(cmd.launcher_args.is_empty());
    }

    #[test]
    fn test_non_streaming_args() {
        let args = protocol_args(&request(false, None));
        assert_eq!(
            args,
            vec![
                "--print",
                "--verbose",
                "--input-format",
                "stream-json",
                "--output-format",
                "stream-json",
                "--dangerously-skip-permissions",
                "--session-id",
                "sess-1",
            ]
        );
    }

    #[test]
    fn test_streaming_args_with_system_prompt() {
        let args = protocol_args(&request(true, Some("be terse")));
        assert!(args.contains(&"--include-partial-messages".to_string()));

        let pos = args.iter().position(|a| a == "--system-prompt").unwrap();
        assert_eq!(args[pos + 1], "be terse");
        assert_eq!(args[args.len() - 2..], ["--session-id", "sess-1"]);
    }

    #[test]
    fn test_launcher_args_come_first() {
        let cmd = AgentCommand::new("npx")
            .with_launcher_args(vec!["@anthropic-ai/claude-code".to_string()]);
        let args = cmd.build_args(&request(false, None));
        assert_eq!(args[0], "@anthropic-ai/claude-code");
        assert_eq!(args[1], "--print");
    }
}
