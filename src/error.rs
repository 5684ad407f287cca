//! Error taxonomy shared by the parser and the Markdown generator.
//!
//! Each concrete error type in the crate reports one of these kinds through a
//! `kind()` method. The CLI prints the kind next to the error message.

/// Classification of every failure a conversion can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not valid JSON or lacks required fields.
    MalformedInput,
    /// Conversation or message content cannot be rendered.
    InvalidContent,
    /// A message or the whole conversation exceeds a size cap.
    ContentTooLarge,
    /// Input bytes are not valid UTF-8.
    Encoding,
    /// Programming errors and faults outside the taxonomy.
    Internal,
}

impl ErrorKind {
    /// Stable identifier for logs and machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::InvalidContent => "invalid_content",
            Self::ContentTooLarge => "content_too_large",
            Self::Encoding => "encoding_error",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
