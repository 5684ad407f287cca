//! JSON conversation parser.
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "title": "optional",
//!   "messages": [
//!     {"speaker": "User", "content": "Hello", "timestamp": "14:30", "content_type": "text"},
//!     {"speaker": "Bot", "content": "fn main() {}", "type": "code", "language": "rust"}
//!   ]
//! }
//! ```
//!
//! The document is walked as a [`serde_json::Value`] rather than derived
//! directly so every failure can name the offending message and field.

use serde_json::{Map, Value};

use crate::domain::{ContentType, Conversation, Message};
use crate::error::ErrorKind;

/// Errors raised while turning JSON into a [`Conversation`].
#[derive(Debug, thiserror::Error)]
pub enum ConversationParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Conversation data must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Required field 'messages' not found in conversation data")]
    MissingMessages,

    #[error("Field 'messages' must be array, got {found}")]
    MessagesNotArray { found: &'static str },

    #[error("Conversation messages list cannot be empty")]
    EmptyMessages,

    #[error("Message {index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Message {index}: {field} must be {expected}, got {found}")]
    InvalidFieldType {
        index: usize,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Message {index}: speaker cannot be empty")]
    EmptySpeaker { index: usize },

    #[error("Message {index}: {reason}")]
    UnknownContentType { index: usize, reason: String },
}

impl ConversationParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encoding(_) => ErrorKind::Encoding,
            _ => ErrorKind::MalformedInput,
        }
    }
}

/// JSON type name for error messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Log a validation failure and hand it back.
fn reject(err: ConversationParseError) -> ConversationParseError {
    tracing::error!("Validation error: {}", err);
    err
}

/// Parses JSON conversation exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverter;

impl JsonConverter {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw bytes, rejecting anything that is not UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Conversation, ConversationParseError> {
        let text = std::str::from_utf8(bytes).map_err(|e| reject(e.into()))?;
        self.parse(text)
    }

    /// Parse a JSON string into a conversation.
    pub fn parse(&self, json: &str) -> Result<Conversation, ConversationParseError> {
        tracing::info!("Starting JSON conversation parsing");

        let data: Value = serde_json::from_str(json).map_err(|e| {
            tracing::error!("JSON parsing failed: {}", e);
            ConversationParseError::from(e)
        })?;
        tracing::debug!("JSON parsed successfully");

        let root = data.as_object().ok_or_else(|| {
            reject(ConversationParseError::NotAnObject {
                found: type_name(&data),
            })
        })?;

        let entries = match root.get("messages") {
            None => return Err(reject(ConversationParseError::MissingMessages)),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(reject(ConversationParseError::MessagesNotArray {
                    found: type_name(other),
                }))
            }
        };

        if entries.is_empty() {
            return Err(reject(ConversationParseError::EmptyMessages));
        }
        tracing::debug!("Found {} messages to process", entries.len());

        let messages = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| parse_message(i + 1, entry).map_err(reject))
            .collect::<Result<Vec<_>, _>>()?;

        let title = match root.get("title") {
            Some(Value::String(title)) if !title.trim().is_empty() => Some(title.clone()),
            _ => None,
        };

        tracing::info!("Parsed {} messages successfully", messages.len());
        tracing::info!("JSON parsing completed");

        Ok(Conversation { title, messages })
    }
}

fn parse_message(index: usize, entry: &Value) -> Result<Message, ConversationParseError> {
    let fields = entry
        .as_object()
        .ok_or(ConversationParseError::InvalidFieldType {
            index,
            field: "message",
            expected: "object",
            found: type_name(entry),
        })?;

    let speaker = required_string(fields, index, "speaker")?;
    let content = required_string(fields, index, "content")?;
    tracing::debug!("Processing message {}: speaker='{}'", index, speaker);

    if speaker.trim().is_empty() {
        return Err(ConversationParseError::EmptySpeaker { index });
    }

    let timestamp = match fields.get("timestamp") {
        None | Some(Value::Null) => None,
        Some(Value::String(ts)) => Some(ts.clone()),
        // Epoch seconds are often stored as numbers
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(ConversationParseError::InvalidFieldType {
                index,
                field: "timestamp",
                expected: "string",
                found: type_name(other),
            })
        }
    };

    let content_type = match optional_string(fields, index, "content_type")? {
        Some(raw) => Some(raw),
        None => optional_string(fields, index, "type")?,
    }
    .map(|raw| {
        raw.parse::<ContentType>()
            .map_err(|reason| ConversationParseError::UnknownContentType { index, reason })
    })
    .transpose()?
    .unwrap_or_default();

    let language = optional_string(fields, index, "language")?.map(str::to_string);

    Ok(Message {
        speaker: speaker.to_string(),
        content: content.to_string(),
        timestamp,
        content_type,
        language,
    })
}

fn required_string<'a>(
    fields: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a str, ConversationParseError> {
    match fields.get(field) {
        None => Err(ConversationParseError::MissingField { index, field }),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ConversationParseError::InvalidFieldType {
            index,
            field,
            expected: "string",
            found: type_name(other),
        }),
    }
}

fn optional_string<'a>(
    fields: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Option<&'a str>, ConversationParseError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ConversationParseError::InvalidFieldType {
            index,
            field,
            expected: "string",
            found: type_name(other),
        }),
    }
}
