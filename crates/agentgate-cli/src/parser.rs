//! Command-line arguments.
//!
//! Every option can also be set through an `AGENTGATE_*` environment variable
//! (or a `.env` file), except the repeatable ones.

use clap::Parser;

use agentgate_proxy::{DEFAULT_MODEL, DEFAULT_PORT};
use agentgate_runtime::DEFAULT_AGENT_PROGRAM;

/// OpenAI-compatible HTTP bridge to a stream-json CLI agent.
#[derive(Parser, Debug)]
#[command(name = "agentgate")]
#[command(about = "Serve an OpenAI-compatible API backed by a local CLI agent")]
#[command(version)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "AGENTGATE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "AGENTGATE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Agent executable, looked up on PATH
    #[arg(long, env = "AGENTGATE_AGENT", default_value = DEFAULT_AGENT_PROGRAM)]
    pub agent: String,

    /// Extra argument placed before the protocol flags (repeatable)
    #[arg(long = "agent-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub agent_args: Vec<String>,

    /// Seconds an agent run may take before it is killed
    #[arg(long, env = "AGENTGATE_TIMEOUT_SECS", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Model id reported to clients
    #[arg(long, env = "AGENTGATE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Allowed CORS origin (repeatable); all origins when omitted
    #[arg(long = "allow-origin", value_name = "ORIGIN")]
    pub allow_origins: Vec<String>,

    /// Skip the agent `--version` check at startup
    #[arg(long)]
    pub skip_check: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeatable_args() {
        let cli = Cli::parse_from([
            "agentgate",
            "--agent-arg",
            "--model=opus",
            "--agent-arg",
            "-x",
            "--allow-origin",
            "http://localhost:3000",
            "-v",
        ]);
        assert_eq!(cli.agent_args, vec!["--model=opus", "-x"]);
        assert_eq!(cli.allow_origins, vec!["http://localhost:3000"]);
        assert!(cli.verbose);
        assert!(!cli.skip_check);
    }
}
