//! Parsers that turn external conversation formats into the domain model.

pub mod json;

pub use json::{ConversationParseError, JsonConverter};
