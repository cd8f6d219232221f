//! Chat messages as received from OpenAI-style clients.

use serde::{Deserialize, Deserializer, Serialize};

use super::content::MessageContent;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    /// Missing or `null` content reads as empty text.
    #[serde(default, deserialize_with = "nullable_content")]
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

fn nullable_content<'de, D>(deserializer: D) -> Result<MessageContent, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<MessageContent>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_content_reads_as_empty_text() {
        let msg: Message = serde_json::from_value(json!({
            "role": "assistant",
            "content": null
        }))
        .unwrap();
        assert_eq!(msg.content, MessageContent::Text(String::new()));

        let msg: Message = serde_json::from_value(json!({"role": "user"})).unwrap();
        assert_eq!(msg.content, MessageContent::Text(String::new()));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_value::<Message>(json!({
            "role": "tool",
            "content": "x"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }
}
