//! Message content and the blocks it is made of.
//!
//! Content arrives either as a bare string or as a sequence of typed blocks.
//! Blocks use the agent's wire shape (`{"type":"image","source":{...}}`), with
//! OpenAI `image_url` data URLs folded into image blocks on the way in.
//! Block types this crate does not know are kept verbatim so newer agent
//! protocol features pass through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inline base64 payload of an image or document block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "base64")]
pub struct MediaSource {
    /// MIME type, e.g. `image/png` or `application/pdf`.
    pub media_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

impl MediaSource {
    pub fn new(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Parse a `data:<media-type>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let media_type = header.strip_suffix(";base64")?;
        if media_type.is_empty() {
            return None;
        }
        Some(Self::new(media_type, data))
    }
}

/// A single block of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Image {
        source: MediaSource,
    },
    Document {
        source: MediaSource,
        title: Option<String>,
    },
    /// Any block shape not modelled above, kept as received.
    Unknown(Value),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The text of a `Text` block, `None` for everything else.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Wire representation of the blocks this crate understands.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TypedBlock {
    Text {
        text: String,
    },
    Image {
        source: MediaSource,
    },
    Document {
        source: MediaSource,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawBlock {
    Typed(TypedBlock),
    Other(Value),
}

impl From<RawBlock> for ContentBlock {
    fn from(raw: RawBlock) -> Self {
        match raw {
            RawBlock::Typed(TypedBlock::Text { text }) => Self::Text { text },
            RawBlock::Typed(TypedBlock::Image { source }) => Self::Image { source },
            RawBlock::Typed(TypedBlock::Document { source, title }) => {
                Self::Document { source, title }
            }
            RawBlock::Other(value) => match inline_image_url(&value) {
                Some(source) => Self::Image { source },
                None => Self::Unknown(value),
            },
        }
    }
}

/// The inline image of an OpenAI `image_url` block holding a base64 data URL.
fn inline_image_url(value: &Value) -> Option<MediaSource> {
    if value.get("type")?.as_str()? != "image_url" {
        return None;
    }
    let url = value.get("image_url")?.get("url")?.as_str()?;
    MediaSource::from_data_url(url)
}

impl From<ContentBlock> for RawBlock {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text { text } => Self::Typed(TypedBlock::Text { text }),
            ContentBlock::Image { source } => Self::Typed(TypedBlock::Image { source }),
            ContentBlock::Document { source, title } => {
                Self::Typed(TypedBlock::Document { source, title })
            }
            ContentBlock::Unknown(value) => Self::Other(value),
        }
    }
}

/// Content of a message: a bare string or a block sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<ContentBlock>> for MessageContent {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        Self::Blocks(blocks)
    }
}

impl MessageContent {
    /// Canonical block form. A bare string becomes a single text block.
    pub fn to_blocks(&self) -> Vec<ContentBlock> {
        match self {
            Self::Text(text) => vec![ContentBlock::text(text.clone())],
            Self::Blocks(blocks) => blocks.clone(),
        }
    }

    /// Concatenated text of every text block, with no separator.
    pub fn to_plain_text(&self) -> String {
        self.join_text("")
    }

    /// Text blocks joined by `separator`; non-text blocks are dropped.
    pub fn join_text(&self, separator: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Blocks(blocks) => blocks
                .iter()
                .filter_map(ContentBlock::as_text)
                .collect::<Vec<_>>()
                .join(separator),
        }
    }
}
