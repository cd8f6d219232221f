//! Error taxonomy for the bridge.
//!
//! Malformed agent output lines are not errors: the decoder reports them as
//! skipped and carries on. Everything here aborts the current request only.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while serving one request through the agent.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The request was rejected before any process was spawned.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The agent process could not be started.
    #[error("Failed to start agent '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The agent exited with a non-zero status.
    #[error("{}", describe_exit(*.exit_code, .stderr))]
    AgentExit {
        /// `None` when the process was ended by a signal.
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The agent did not finish within the configured bound and was killed.
    #[error("Agent did not finish within {}s", .0.as_secs())]
    Timeout(Duration),

    /// The consumer of a streaming response went away.
    #[error("Request cancelled by client")]
    Cancelled,

    /// Pipe I/O with the running agent failed.
    #[error("Agent I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Whether the failure was caused by the client rather than the agent.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_) | Self::Cancelled)
    }
}

fn describe_exit(exit_code: Option<i32>, stderr: &str) -> String {
    let status = exit_code.map_or_else(
        || "Agent was terminated by a signal".to_string(),
        |code| format!("Agent exited with code {code}"),
    );
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status
    } else {
        format!("{status}: {stderr}")
    }
}
