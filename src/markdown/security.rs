//! Field-level validation and sanitization of untrusted conversation input.
//!
//! Every value that ends up in the output passes through one of these
//! functions first: speaker names and timestamps are validated, message
//! content is bounded and cleaned, and frontmatter keys/values are neutralized
//! so they cannot break out of the YAML block.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::constants::{
    MAX_CONTENT_SANITIZATION_SIZE, MAX_METADATA_VALUE_LENGTH, MAX_SPEAKER_NAME_LENGTH,
    MAX_TIMESTAMP_LENGTH,
};
use crate::domain::Metadata;

/// Validation failures for individual message fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecurityError {
    #[error("invalid speaker name: {reason}")]
    InvalidSpeaker { reason: &'static str },

    #[error("invalid timestamp format: {value}")]
    InvalidTimestamp { value: String },
}

/// Accepted timestamp shapes. Dates are checked for shape only, so
/// `2024-13-99` passes the ISO pattern.
static TIMESTAMP_PATTERNS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        // ISO-8601 date or datetime, optional fraction and offset
        Regex::new(
            r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(T[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?(Z|[+-][0-9]{2}:?[0-9]{2})?)?$",
        )
        .unwrap(),
        // 24-hour clock
        Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9](:[0-5][0-9])?$").unwrap(),
        // 12-hour clock
        Regex::new(r"^(?i)(0?[1-9]|1[0-2]):[0-5][0-9](:[0-5][0-9])? ?(AM|PM)$").unwrap(),
        // Unix epoch seconds
        Regex::new(r"^[0-9]{10}(\.[0-9]{1,6})?$").unwrap(),
        // Date and time separated by a space
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$").unwrap(),
    ]
});

/// C0 controls and DEL.
fn is_control(c: char) -> bool {
    c <= '\u{1F}' || c == '\u{7F}'
}

fn strip_control_chars(s: &str) -> String {
    s.chars().filter(|&c| !is_control(c)).collect()
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Longest prefix of `s` that is at most `max_bytes` long and ends on a char
/// boundary.
fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Validate and clean a speaker name.
///
/// Trims, removes control characters and truncates to
/// [`MAX_SPEAKER_NAME_LENGTH`] characters.
pub fn validate_speaker(name: &str) -> Result<String, SecurityError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SecurityError::InvalidSpeaker {
            reason: "speaker name cannot be empty",
        });
    }

    let cleaned = truncate_chars(&strip_control_chars(trimmed), MAX_SPEAKER_NAME_LENGTH);
    if cleaned.is_empty() {
        return Err(SecurityError::InvalidSpeaker {
            reason: "speaker name contains only invalid characters",
        });
    }

    Ok(cleaned)
}

/// Validate and clean a timestamp.
///
/// Blank input yields an empty string since timestamps are optional.
pub fn validate_timestamp(timestamp: &str) -> Result<String, SecurityError> {
    let trimmed = timestamp.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let cleaned = truncate_chars(&strip_control_chars(trimmed), MAX_TIMESTAMP_LENGTH);

    if TIMESTAMP_PATTERNS.iter().any(|re| re.is_match(&cleaned)) {
        Ok(cleaned)
    } else {
        Err(SecurityError::InvalidTimestamp { value: cleaned })
    }
}

/// Whether [`sanitize_content`] will cut `content` short.
pub fn exceeds_sanitization_limit(content: &str) -> bool {
    content.len() > MAX_CONTENT_SANITIZATION_SIZE
}

/// Bound and clean free-text message content.
///
/// Truncates to [`MAX_CONTENT_SANITIZATION_SIZE`] bytes, drops control
/// characters other than newline and tab, and normalizes line endings to `\n`.
pub fn sanitize_content(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let bounded = truncate_bytes(content, MAX_CONTENT_SANITIZATION_SIZE);

    // \r survives this step so the line-ending pass below can see it
    let cleaned: String = bounded
        .chars()
        .filter(|&c| !is_control(c) || matches!(c, '\n' | '\t' | '\r'))
        .collect();

    if cleaned.contains('\r') {
        cleaned.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        cleaned
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped form of a YAML-significant character.
fn yaml_escape(c: char) -> Option<&'static str> {
    let escaped = match c {
        '\\' => "\\\\",
        ':' => "\\:",
        '"' => "\\\"",
        '\'' => "\\'",
        '\n' => "\\n",
        '\r' => "\\r",
        '\t' => "\\t",
        '-' => "\\-",
        '#' => "\\#",
        '|' => "\\|",
        '>' => "\\>",
        '[' => "\\[",
        ']' => "\\]",
        '{' => "\\{",
        '}' => "\\}",
        _ => return None,
    };
    Some(escaped)
}

/// Render a scalar as a frontmatter-safe string.
///
/// The value is truncated to [`MAX_METADATA_VALUE_LENGTH`] characters,
/// HTML-escaped, and then every YAML-significant character is backslash
/// escaped.
pub fn sanitize_yaml_value(value: impl fmt::Display) -> String {
    let raw = truncate_chars(&value.to_string(), MAX_METADATA_VALUE_LENGTH);
    let html = html_escape(&raw);

    let mut out = String::with_capacity(html.len() + html.len() / 4);
    for c in html.chars() {
        match yaml_escape(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    out
}

/// Keep only `[A-Za-z0-9_-]` in a frontmatter key.
pub fn sanitize_yaml_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Sanitize every metadata entry, dropping keys with nothing left.
///
/// Raw keys are visited in sorted order; if two collapse to the same key the
/// later one wins.
pub fn sanitize_yaml_metadata(metadata: &Metadata) -> BTreeMap<String, String> {
    let mut raw_keys: Vec<&String> = metadata.keys().collect();
    raw_keys.sort();

    let mut sanitized = BTreeMap::new();
    for raw_key in raw_keys {
        let key = sanitize_yaml_key(raw_key);
        if key.is_empty() {
            continue;
        }
        sanitized.insert(key, sanitize_yaml_value(&metadata[raw_key]));
    }
    sanitized
}
