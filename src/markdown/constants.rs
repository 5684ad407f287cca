//! Size limits applied during Markdown generation.

/// Raw UTF-8 size allowed for a single message's content (10 MiB).
pub const MAX_MESSAGE_CONTENT_SIZE: usize = 10 * 1024 * 1024;

/// Cumulative sanitized size allowed for a whole conversation (100 MiB).
pub const MAX_TOTAL_CONVERSATION_SIZE: usize = 100 * 1024 * 1024;

/// Content is truncated to this many bytes during sanitization (100 KiB).
pub const MAX_CONTENT_SANITIZATION_SIZE: usize = 100 * 1024;

/// Metadata values are truncated to this many characters.
pub const MAX_METADATA_VALUE_LENGTH: usize = 1000;

/// Speaker names are truncated to this many characters.
pub const MAX_SPEAKER_NAME_LENGTH: usize = 100;

/// Timestamps are truncated to this many characters.
pub const MAX_TIMESTAMP_LENGTH: usize = 50;
