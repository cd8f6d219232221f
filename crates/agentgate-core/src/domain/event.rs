//! Agent protocol events.
//!
//! Outbound events are written to the agent's stdin, one JSON object per
//! line. Inbound events are read from its stdout; only assistant events carry
//! meaning here and everything else is opaque.

use serde::{Deserialize, Serialize};

use super::content::{ContentBlock, MessageContent};
use super::message::MessageRole;

/// Event type of an outbound agent event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentEventType {
    User,
    Assistant,
}

impl AgentEventType {
    /// Event type for a conversation role. System messages have none.
    pub const fn from_role(role: MessageRole) -> Option<Self> {
        match role {
            MessageRole::User => Some(Self::User),
            MessageRole::Assistant => Some(Self::Assistant),
            MessageRole::System => None,
        }
    }
}

/// Message payload of an outbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEventMessage {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

/// One line of the NDJSON document fed to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    #[serde(rename = "type")]
    pub event_type: AgentEventType,
    pub message: AgentEventMessage,
}

/// One line of agent output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStreamEvent {
    Assistant { message: AssistantPayload },
    #[serde(other)]
    Other,
}

/// Message body of an inbound assistant event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssistantPayload {
    /// Cumulative content so far, not a delta.
    #[serde(default)]
    pub content: Option<MessageContent>,
}

impl AgentStreamEvent {
    /// Cumulative assistant text carried by this event, if any.
    pub fn assistant_text(&self) -> Option<String> {
        match self {
            Self::Assistant { message } => message
                .content
                .as_ref()
                .map(MessageContent::to_plain_text),
            Self::Other => None,
        }
    }
}
