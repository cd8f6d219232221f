//! Domain types shared by every layer of the bridge.

pub mod content;
pub mod event;
pub mod message;

pub use content::{ContentBlock, MediaSource, MessageContent};
pub use event::{AgentEvent, AgentEventMessage, AgentEventType, AgentStreamEvent, AssistantPayload};
pub use message::{Message, MessageRole};
