//! OpenAI API data models for request/response handling.
//!
//! This module contains types that match the OpenAI API wire format. Domain
//! types live in `agentgate-core`; this module handles the API layer mapping.

use agentgate_core::{BridgeError, Message};
use serde::{Deserialize, Serialize};

// =============================================================================
// Request Types
// =============================================================================

/// Request to /v1/chat/completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model name, echoed back in responses.
    #[serde(default)]
    pub model: Option<String>,
    /// Conversation history.
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    /// Whether to stream the response.
    #[serde(default)]
    pub stream: Option<bool>,
    /// Opaque agent session token from a previous response.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatCompletionRequest {
    pub fn is_streaming(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    /// The message history, rejected when missing or empty.
    pub fn validated_messages(&self) -> Result<&[Message], BridgeError> {
        match self.messages.as_deref() {
            Some(messages) if !messages.is_empty() => Ok(messages),
            _ => Err(BridgeError::invalid_request(
                "'messages' is required and must be a non-empty array",
            )),
        }
    }
}

/// Prompt of a text completion: one string or a list joined by newlines.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PromptInput {
    Text(String),
    Many(Vec<String>),
}

impl PromptInput {
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Many(parts) => parts.join("\n"),
        }
    }
}

/// Request to /v1/completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub prompt: Option<PromptInput>,
    #[serde(default)]
    pub stream: Option<bool>,
}

impl CompletionRequest {
    pub fn is_streaming(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    /// The prompt as a single user message, rejected when missing or blank.
    pub fn validated_prompt(&self) -> Result<Message, BridgeError> {
        let text = self.prompt.as_ref().map(PromptInput::to_text);
        match text {
            Some(text) if !text.trim().is_empty() => Ok(Message::user(text)),
            _ => Err(BridgeError::invalid_request(
                "'prompt' is required and must be a non-empty string",
            )),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Token usage. Counts are never known, so every field is `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

impl Usage {
    pub const UNAVAILABLE: Self = Self {
        prompt_tokens: -1,
        completion_tokens: -1,
        total_tokens: -1,
    };
}

/// Assistant message inside a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

/// Response from /v1/chat/completions endpoint (non-streaming).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
    /// Agent session token; send it back as `session_id` to continue.
    #[serde(rename = "_session_id")]
    pub session_id: String,
}

/// A single chat completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

/// Response from /v1/completions endpoint (non-streaming).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<TextChoice>,
    pub usage: Usage,
}

/// A single text completion choice; also used for streamed text chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChoice {
    pub text: String,
    pub index: u32,
    pub logprobs: Option<serde_json::Value>,
    pub finish_reason: Option<String>,
}

/// Streaming chunk from /v1/chat/completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChunkChoice>,
}

/// A single streaming choice. `finish_reason` is `null` until the last chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChunkChoice {
    pub index: u32,
    pub delta: ChatDelta,
    pub finish_reason: Option<String>,
}

/// Delta content in streaming response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Streaming chunk from /v1/completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<TextChoice>,
}

// =============================================================================
// Models Endpoint Types
// =============================================================================

/// Response from /v1/models endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

impl ModelsResponse {
    /// A list holding just the configured model.
    pub fn single(model: &str, created: i64) -> Self {
        Self {
            object: "list".to_string(),
            data: vec![ModelInfo {
                id: model.to_string(),
                object: "model".to_string(),
                created,
                owned_by: "agentgate".to_string(),
            }],
        }
    }
}

/// Information about a single model (OpenAI format).
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

// =============================================================================
// Error Response Types
// =============================================================================

/// Error response matching OpenAI format.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail within an error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Create an error response with a code.
    pub fn with_code(
        message: impl Into<String>,
        error_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: Some(code.into()),
            },
        }
    }

    /// Create an error response for a rejected request body.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_code(message, "invalid_request_error", "invalid_request")
    }

    /// Create an error response for an agent that could not be reached.
    pub fn upstream_error(reason: &str) -> Self {
        Self::with_code(
            format!("Failed to run agent: {reason}"),
            "server_error",
            "upstream_error",
        )
    }
}

impl From<&BridgeError> for ErrorResponse {
    fn from(err: &BridgeError) -> Self {
        match err {
            BridgeError::InvalidRequest(msg) => Self::invalid_request(msg.clone()),
            BridgeError::Spawn { .. } | BridgeError::Io(_) => {
                Self::upstream_error(&err.to_string())
            }
            BridgeError::AgentExit { .. } => {
                Self::with_code(err.to_string(), "server_error", "agent_process_error")
            }
            BridgeError::Timeout(_) => Self::with_code(err.to_string(), "server_error", "timeout"),
            BridgeError::Cancelled => {
                Self::with_code(err.to_string(), "invalid_request_error", "cancelled")
            }
        }
    }
}
