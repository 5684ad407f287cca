//! Conversation data model.

mod models;

pub use models::{ContentType, Conversation, Message, Metadata, MetadataValue};
