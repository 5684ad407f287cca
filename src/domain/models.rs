//! Messages, conversations and per-call metadata.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a message's content is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Prose, escaped for Markdown
    #[default]
    Text,
    /// Source code, wrapped in a fenced block
    Code,
    /// Image reference, rendered as `![Image](...)`
    Image,
}

impl ContentType {
    /// All content types, in default dispatch order.
    pub const ALL: [ContentType; 3] = [ContentType::Text, ContentType::Code, ContentType::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Image => "image",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ContentType::Text),
            "code" => Ok(ContentType::Code),
            "image" => Ok(ContentType::Image),
            other => Err(format!("unknown content type '{}'", other)),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub content_type: ContentType,
    /// Language tag for code fences; ignored for other content types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Message {
    /// Create a text message.
    pub fn new(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            content: content.into(),
            timestamp: None,
            content_type: ContentType::Text,
            language: None,
        }
    }

    /// Create a code message with an optional language tag.
    pub fn code(
        speaker: impl Into<String>,
        content: impl Into<String>,
        language: Option<&str>,
    ) -> Self {
        Self {
            content_type: ContentType::Code,
            language: language.map(str::to_string),
            ..Self::new(speaker, content)
        }
    }

    /// Create an image message; `content` is the image location.
    pub fn image(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Image,
            ..Self::new(speaker, content)
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn is_code(&self) -> bool {
        self.content_type == ContentType::Code
    }
}

/// An ordered sequence of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            title: None,
            messages,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// A scalar metadata value destined for YAML frontmatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    /// Infer a typed value from command-line text.
    ///
    /// `true`/`false` become booleans and numeric text becomes a number,
    /// but only when the typed value prints back exactly as `raw`. Anything
    /// else (`007`, `1.10`, `1e3`) stays text.
    pub fn infer(raw: &str) -> Self {
        let typed = if let Ok(b) = raw.parse::<bool>() {
            Self::Bool(b)
        } else if let Ok(i) = raw.parse::<i64>() {
            Self::Integer(i)
        } else {
            match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => Self::Float(f),
                _ => return Self::Text(raw.to_string()),
            }
        };

        if typed.to_string() == raw {
            typed
        } else {
            Self::Text(raw.to_string())
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Caller-supplied frontmatter fields. Iteration order is irrelevant; output
/// keys are sorted.
pub type Metadata = HashMap<String, MetadataValue>;
