//! Translation of an OpenAI message history into agent input.
//!
//! The first system message becomes the agent's system prompt. Every user and
//! assistant message becomes one NDJSON event line, in order.

use tracing::warn;

use crate::domain::{AgentEvent, AgentEventMessage, AgentEventType, Message, MessageRole};

/// Agent input derived from a message history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedHistory {
    /// Text of the first system message, if there is one.
    pub system_prompt: Option<String>,
    /// NDJSON document to write to the agent's stdin. Empty when the
    /// history holds only system messages.
    pub ndjson: String,
}

/// Extract the system prompt from the first system message.
///
/// Block content keeps only its text blocks, joined with newlines.
pub fn extract_system_prompt(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .find(|m| m.role == MessageRole::System)
        .map(|m| m.content.join_text("\n"))
}

/// Map every user/assistant message to an agent event, preserving order.
pub fn to_agent_events(messages: &[Message]) -> Vec<AgentEvent> {
    messages
        .iter()
        .filter_map(|m| {
            let event_type = AgentEventType::from_role(m.role)?;
            Some(AgentEvent {
                event_type,
                message: AgentEventMessage {
                    role: m.role,
                    content: m.content.to_blocks(),
                },
            })
        })
        .collect()
}

/// Serialize events as NDJSON, one line each, with a trailing newline.
///
/// Events hold only strings and JSON values, so serialization cannot fail in
/// practice; an event that somehow does is dropped with a warning.
pub fn encode_ndjson(events: &[AgentEvent]) -> String {
    let mut out = String::new();
    for event in events {
        match serde_json::to_string(event) {
            Ok(line) => {
                out.push_str(&line);
                out.push('\n');
            }
            Err(e) => warn!(error = %e, "Dropping agent event that failed to serialize"),
        }
    }
    out
}

/// Translate a full message history.
pub fn translate_messages(messages: &[Message]) -> TranslatedHistory {
    TranslatedHistory {
        system_prompt: extract_system_prompt(messages),
        ndjson: encode_ndjson(&to_agent_events(messages)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentBlock, MediaSource, MessageContent};

    #[test]
    fn test_single_user_message_exact_output() {
        let out = translate_messages(&[Message::user("Hi")]);
        assert_eq!(out.system_prompt, None);
        assert_eq!(
            out.ndjson,
            "{\"type\":\"user\",\"message\":{\"role\":\"user\",\"content\":[{\"type\":\"text\",\"text\":\"Hi\"}]}}\n"
        );
    }

    #[test]
    fn test_order_preserved_and_system_excluded() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("one"),
            Message::assistant("two"),
            Message::system("ignored"),
            Message::user("three"),
        ];
        let out = translate_messages(&messages);

        let lines: Vec<&str> = out.ndjson.lines().collect();
        assert_eq!(lines.len(), 3);
        let texts: Vec<String> = lines
            .iter()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).unwrap();
                assert_ne!(v["message"]["role"], "system");
                v["message"]["content"][0]["text"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert!(lines[1].starts_with(r#"{"type":"assistant","message":{"role":"assistant""#));
        assert!(out.ndjson.ends_with('\n'));
    }

    #[test]
    fn test_first_system_message_wins() {
        let messages = vec![
            Message::system("first"),
            Message::system("second"),
            Message::user("hi"),
        ];
        assert_eq!(extract_system_prompt(&messages).as_deref(), Some("first"));
    }

    #[test]
    fn test_block_system_prompt_joins_text_with_newlines() {
        let messages = vec![Message::system(vec![
            ContentBlock::text("rule one"),
            ContentBlock::Image {
                source: MediaSource::new("image/png", "AAAA"),
            },
            ContentBlock::text("rule two"),
        ])];
        assert_eq!(
            extract_system_prompt(&messages).as_deref(),
            Some("rule one\nrule two")
        );
    }

    #[test]
    fn test_system_only_history_yields_empty_document() {
        let out = translate_messages(&[Message::system("setup")]);
        assert_eq!(out.system_prompt.as_deref(), Some("setup"));
        assert_eq!(out.ndjson, "");
    }

    #[test]
    fn test_unknown_block_is_encoded_verbatim() {
        let block: ContentBlock = serde_json::from_value(serde_json::json!({
            "type": "image_url",
            "image_url": {"url": "https://example.com/a.png", "detail": "low"}
        }))
        .unwrap();
        let out = translate_messages(&[Message::user(vec![block])]);
        assert!(out.ndjson.contains(r#""detail":"low""#));
        assert_eq!(out.ndjson.lines().count(), 1);
    }

    #[test]
    fn test_block_content_passes_through() {
        let blocks = vec![
            ContentBlock::text("look"),
            ContentBlock::Image {
                source: MediaSource::new("image/png", "AAAA"),
            },
        ];
        let events = to_agent_events(&[Message::user(MessageContent::Blocks(blocks.clone()))]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message.content, blocks);
    }
}
