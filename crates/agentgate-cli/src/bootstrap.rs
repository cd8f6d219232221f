//! Composition root: turns parsed arguments into wired-up components.

use std::sync::Arc;
use std::time::Duration;

use agentgate_core::AgentRunner;
use agentgate_proxy::ServerConfig;
use agentgate_runtime::{AgentCommand, CliAgentRunner};
use tracing_subscriber::EnvFilter;

use crate::parser::Cli;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when verbose.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// How to launch the agent.
pub fn agent_command(cli: &Cli) -> AgentCommand {
    AgentCommand::new(&cli.agent)
        .with_launcher_args(cli.agent_args.clone())
        .with_timeout(Duration::from_secs(cli.timeout_secs))
}

/// How to serve HTTP.
pub fn server_config(cli: &Cli) -> ServerConfig {
    ServerConfig {
        host: cli.host.clone(),
        port: cli.port,
        model: cli.model.clone(),
        ..ServerConfig::default()
    }
    .with_allowed_origins(cli.allow_origins.clone())
}

/// The agent runner used for every request.
pub fn agent_runner(command: AgentCommand) -> Arc<dyn AgentRunner> {
    Arc::new(CliAgentRunner::new(command))
}
