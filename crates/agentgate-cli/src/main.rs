//! CLI entry point.
//!
//! Loads configuration, checks the agent is runnable, then serves HTTP until
//! interrupted.

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use agentgate_cli::Cli;
use agentgate_cli::bootstrap::{agent_command, agent_runner, init_tracing, server_config};
use agentgate_runtime::check_agent_available;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = agent_command(&cli);
    let config = server_config(&cli);

    if cli.skip_check {
        warn!("Skipping agent availability check");
    } else {
        let version = check_agent_available(&command).await?;
        info!(agent = %command.program_name(), version = %version, "Agent available");
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    agentgate_proxy::serve(listener, &config, agent_runner(command), cancel).await
}
