//! Conversation to Markdown generation.
//!
//! # Module Structure
//!
//! - [`blocks`] - Escaping and code-fence primitives
//! - [`security`] - Field validation and sanitization of untrusted input
//! - [`pipeline`] - Per-content-type renderers and their dispatcher
//! - [`metrics`] - Counters and timings for one conversion run
//! - [`generator`] - Validation, frontmatter and document assembly
//! - [`constants`] - Size limits

pub mod blocks;
pub mod constants;
mod error;
pub mod generator;
pub mod metrics;
pub mod pipeline;
pub mod security;

pub use blocks::{code_block, date_marker, escape_markdown, fence_length, speaker_line};
pub use error::GenerationError;
pub use generator::{GenerationReport, GeneratorLimits, MarkdownGenerator};
pub use metrics::{ConversionMetrics, ConversionStatus, MetricsCollector, MetricsError};
pub use pipeline::{ContentPipeline, RenderError, Renderer};
pub use security::{
    sanitize_content, sanitize_yaml_metadata, sanitize_yaml_value, validate_speaker,
    validate_timestamp, SecurityError,
};
