//! conv2md - conversation to Markdown conversion.
//!
//! The library parses conversation exports ([`converters`]), validates and
//! sanitizes them, and renders deterministic Markdown ([`markdown`]).
//!
//! ```
//! use conv2md::{Conversation, MarkdownGenerator, Message};
//!
//! let conversation = Conversation::new(vec![
//!     Message::new("User", "Hello"),
//!     Message::new("Assistant", "Hi there!"),
//! ]);
//! let markdown = MarkdownGenerator::new().generate(&conversation, None).unwrap();
//! assert_eq!(markdown, "**User:**\nHello\n\n**Assistant:**\nHi there\\!");
//! ```

pub mod cli;
pub mod config;
pub mod converters;
pub mod domain;
pub mod error;
pub mod files;
pub mod logging;
pub mod markdown;

pub use config::Config;
pub use converters::{ConversationParseError, JsonConverter};
pub use domain::{ContentType, Conversation, Message, Metadata, MetadataValue};
pub use error::ErrorKind;
pub use markdown::{
    ConversionMetrics, ConversionStatus, GenerationError, GenerationReport, MarkdownGenerator,
};
