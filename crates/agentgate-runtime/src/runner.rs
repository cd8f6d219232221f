//! `AgentRunner` implementation backed by a local CLI agent process.

use agentgate_core::{AgentReply, AgentRequest, AgentRunner, BridgeError};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::command::AgentCommand;
use crate::session::run_session;

/// Spawns one agent process per request.
#[derive(Debug, Clone, Default)]
pub struct CliAgentRunner {
    command: AgentCommand,
}

impl CliAgentRunner {
    pub const fn new(command: AgentCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl AgentRunner for CliAgentRunner {
    async fn run(
        &self,
        request: AgentRequest,
        increments: Option<mpsc::Sender<String>>,
    ) -> Result<AgentReply, BridgeError> {
        run_session(&self.command, request, increments).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn runner_is_usable_as_trait_object() {
        let command = AgentCommand::new("sh").with_launcher_args(vec![
            "-c".to_string(),
            r#"cat >/dev/null; echo '{"type":"assistant","message":{"content":"ok"}}'"#.to_string(),
            "fake-agent".to_string(),
        ]);
        let runner: Arc<dyn AgentRunner> = Arc::new(CliAgentRunner::new(command));

        let request = AgentRequest {
            ndjson: String::new(),
            system_prompt: None,
            session_id: "s".to_string(),
            streaming: false,
        };
        let reply = runner.run(request, None).await.unwrap();
        assert_eq!(reply.text, "ok");
    }
}
