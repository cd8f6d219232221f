//! Core of the agentgate protocol bridge.
//!
//! Pure translation between OpenAI-style message histories and the agent's
//! NDJSON event protocol, plus the incremental decoder for agent output. No
//! process or HTTP concerns live here; those sit behind the [`ports`].

pub mod decoder;
pub mod domain;
pub mod error;
pub mod ports;
pub mod translate;

// Re-export commonly used types for convenience
pub use decoder::{DecodeStats, LineOutcome, StreamDecoder};
pub use domain::{
    AgentEvent, AgentEventMessage, AgentEventType, AgentStreamEvent, ContentBlock, MediaSource,
    Message, MessageContent, MessageRole,
};
pub use error::BridgeError;
pub use ports::{AgentReply, AgentRequest, AgentRunner, resolve_session_id};
pub use translate::{TranslatedHistory, extract_system_prompt, translate_messages};
