//! Markdown generation errors.

use super::security::SecurityError;
use crate::error::ErrorKind;

/// Errors that can occur while generating Markdown from a conversation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("{message}")]
    InvalidContent {
        message: String,
        #[source]
        source: Option<SecurityError>,
    },

    #[error("Message {index} content too large: {size} bytes (max {limit})")]
    MessageTooLarge {
        index: usize,
        size: usize,
        limit: usize,
    },

    #[error("Conversation content too large: {size} bytes (max {limit})")]
    ConversationTooLarge { size: usize, limit: usize },

    /// A renderer failed in a way the generator does not translate.
    #[error(transparent)]
    Renderer(Box<dyn std::error::Error + Send + Sync>),
}

impl GenerationError {
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
            source: None,
        }
    }

    /// A field validation failure on the message at `index` (1-based).
    pub fn invalid_field(index: usize, error: SecurityError) -> Self {
        Self::InvalidContent {
            message: format!("Message {}: {}", index, error),
            source: Some(error),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidContent { .. } => ErrorKind::InvalidContent,
            Self::MessageTooLarge { .. } | Self::ConversationTooLarge { .. } => {
                ErrorKind::ContentTooLarge
            }
            Self::Renderer(_) => ErrorKind::Internal,
        }
    }

    /// The sanitizer failure behind an invalid-content error, if any.
    pub fn security_error(&self) -> Option<&SecurityError> {
        match self {
            Self::InvalidContent { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}
