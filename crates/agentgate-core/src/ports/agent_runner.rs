//! Agent runner port.
//!
//! The HTTP adapter talks to the agent only through this trait, so it can be
//! driven by a real subprocess or by a test double.

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::decoder::DecodeStats;
use crate::error::BridgeError;
use crate::translate::TranslatedHistory;

/// One request's worth of agent input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    /// NDJSON document for the agent's stdin.
    pub ndjson: String,
    pub system_prompt: Option<String>,
    /// Always set: the caller's token, or a freshly minted UUID.
    pub session_id: String,
    /// Ask the agent for partial messages and deliver increments as they arrive.
    pub streaming: bool,
}

impl AgentRequest {
    /// Build a request, minting a session id when the caller has none.
    pub fn new(history: TranslatedHistory, session_id: Option<String>, streaming: bool) -> Self {
        Self {
            ndjson: history.ndjson,
            system_prompt: history.system_prompt,
            session_id: resolve_session_id(session_id),
            streaming,
        }
    }
}

/// Use the caller's session id, or mint a new one.
///
/// Blank ids are treated as absent.
pub fn resolve_session_id(session_id: Option<String>) -> String {
    session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Outcome of a successful agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    /// Final cumulative assistant text.
    pub text: String,
    pub session_id: String,
    pub stats: DecodeStats,
}

/// Runs one agent invocation per call.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Run the agent to completion.
    ///
    /// When `increments` is given, each new piece of assistant text is sent
    /// on it as soon as it is decoded. Increments already sent are never
    /// retracted, even if the run later fails.
    async fn run(
        &self,
        request: AgentRequest,
        increments: Option<mpsc::Sender<String>>,
    ) -> Result<AgentReply, BridgeError>;
}
