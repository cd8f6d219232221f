//! Construction of OpenAI response bodies and SSE frames.
//!
//! Everything here is pure apart from reading the clock for the stamp.

use chrono::Utc;
use serde::Serialize;

use crate::models::{
    AssistantMessage, ChatChoice, ChatChunkChoice, ChatCompletionChunk, ChatCompletionResponse,
    ChatDelta, TextChoice, TextCompletionChunk, TextCompletionResponse, Usage,
};

/// Stream terminator frame.
pub const SSE_DONE: &str = "data: [DONE]\n\n";

/// Which OpenAI endpoint a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Chat,
    Text,
}

impl CompletionKind {
    const fn id_prefix(self) -> &'static str {
        match self {
            Self::Chat => "chatcmpl",
            Self::Text => "cmpl",
        }
    }
}

/// Synthetic id and creation time shared by every piece of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStamp {
    pub id: String,
    /// Unix seconds.
    pub created: i64,
}

impl ResponseStamp {
    pub fn now(kind: CompletionKind) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}-{}", kind.id_prefix(), now.timestamp_millis()),
            created: now.timestamp(),
        }
    }
}

/// Non-streaming chat completion.
pub fn chat_completion(
    stamp: &ResponseStamp,
    model: &str,
    text: String,
    session_id: String,
) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: stamp.id.clone(),
        object: "chat.completion".to_string(),
        created: stamp.created,
        model: model.to_string(),
        choices: vec![ChatChoice {
            index: 0,
            message: AssistantMessage {
                role: "assistant".to_string(),
                content: text,
            },
            finish_reason: Some("stop".to_string()),
        }],
        usage: Usage::UNAVAILABLE,
        session_id,
    }
}

/// Non-streaming text completion. Carries no session id.
pub fn text_completion(stamp: &ResponseStamp, model: &str, text: String) -> TextCompletionResponse {
    TextCompletionResponse {
        id: stamp.id.clone(),
        object: "text_completion".to_string(),
        created: stamp.created,
        model: model.to_string(),
        choices: vec![TextChoice {
            text,
            index: 0,
            logprobs: None,
            finish_reason: Some("stop".to_string()),
        }],
        usage: Usage::UNAVAILABLE,
    }
}

/// Frame a payload as one SSE `data:` event.
pub fn sse_frame<T: Serialize>(payload: &T) -> String {
    let json = serde_json::to_string(payload).unwrap_or_default();
    format!("data: {json}\n\n")
}

/// Builds the SSE frames of one streamed response.
#[derive(Debug, Clone)]
pub struct StreamFramer {
    kind: CompletionKind,
    stamp: ResponseStamp,
    model: String,
    role_sent: bool,
}

impl StreamFramer {
    pub fn new(kind: CompletionKind, model: impl Into<String>) -> Self {
        Self {
            kind,
            stamp: ResponseStamp::now(kind),
            model: model.into(),
            role_sent: false,
        }
    }

    pub const fn kind(&self) -> CompletionKind {
        self.kind
    }

    /// Frame for one text increment.
    pub fn content(&mut self, text: &str) -> String {
        self.frame(Some(text.to_string()), None)
    }

    /// Frame reporting an error in-band, after the stream has started.
    pub fn error(&mut self, message: &str) -> String {
        self.content(&format!("\n\n[Error: {message}]"))
    }

    /// Final content frame with `finish_reason: "stop"`.
    pub fn finish(&mut self) -> String {
        self.frame(None, Some("stop".to_string()))
    }

    fn frame(&mut self, content: Option<String>, finish_reason: Option<String>) -> String {
        match self.kind {
            CompletionKind::Chat => {
                let role = (!self.role_sent).then(|| "assistant".to_string());
                self.role_sent = true;
                sse_frame(&ChatCompletionChunk {
                    id: self.stamp.id.clone(),
                    object: "chat.completion.chunk".to_string(),
                    created: self.stamp.created,
                    model: self.model.clone(),
                    choices: vec![ChatChunkChoice {
                        index: 0,
                        delta: ChatDelta { role, content },
                        finish_reason,
                    }],
                })
            }
            CompletionKind::Text => sse_frame(&TextCompletionChunk {
                id: self.stamp.id.clone(),
                object: "text_completion".to_string(),
                created: self.stamp.created,
                model: self.model.clone(),
                choices: vec![TextChoice {
                    text: content.unwrap_or_default(),
                    index: 0,
                    logprobs: None,
                    finish_reason,
                }],
            }),
        }
    }
}
