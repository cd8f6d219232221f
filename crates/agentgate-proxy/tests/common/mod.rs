//! Test doubles shared by the route tests.

use std::sync::{Arc, Mutex};

use agentgate_core::{AgentReply, AgentRequest, AgentRunner, BridgeError, DecodeStats};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// What the fake agent does when run.
pub enum Script {
    /// Emit these increments, then succeed with their concatenation.
    Reply(Vec<&'static str>),
    /// Emit these increments, then exit non-zero with `stderr`.
    Fail(Vec<&'static str>, &'static str),
}

/// `AgentRunner` that follows a script and records the requests it receives.
pub struct FakeAgent {
    script: Script,
    seen: Mutex<Vec<AgentRequest>>,
}

impl FakeAgent {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn last_request(&self) -> Option<AgentRequest> {
        self.seen.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AgentRunner for FakeAgent {
    async fn run(
        &self,
        request: AgentRequest,
        increments: Option<mpsc::Sender<String>>,
    ) -> Result<AgentReply, BridgeError> {
        self.seen.lock().unwrap().push(request.clone());

        let (pieces, stderr) = match &self.script {
            Script::Reply(pieces) => (pieces, None),
            Script::Fail(pieces, stderr) => (pieces, Some(*stderr)),
        };
        if let Some(tx) = increments {
            for piece in pieces {
                if tx.send((*piece).to_string()).await.is_err() {
                    return Err(BridgeError::Cancelled);
                }
            }
        }

        match stderr {
            Some(stderr) => Err(BridgeError::AgentExit {
                exit_code: Some(1),
                stderr: stderr.to_string(),
            }),
            None => Ok(AgentReply {
                text: pieces.concat(),
                session_id: request.session_id,
                stats: DecodeStats::default(),
            }),
        }
    }
}
