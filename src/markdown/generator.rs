//! Conversation to Markdown orchestration.
//!
//! A call runs in two phases. Validation checks and sanitizes every message
//! up front, so a failure never leaves a half-built document behind.
//! Rendering then emits optional frontmatter followed by one block per
//! message:
//!
//! ```text
//! **<speaker>:**            (no timestamp)
//! **<speaker> — <timestamp>**
//! <rendered content>
//!
//! ```

use super::blocks::speaker_line;
use super::constants::{
    MAX_CONTENT_SANITIZATION_SIZE, MAX_MESSAGE_CONTENT_SIZE, MAX_TOTAL_CONVERSATION_SIZE,
};
use super::error::GenerationError;
use super::metrics::ConversionMetrics;
use super::pipeline::{ContentPipeline, RenderError};
use super::security::{
    exceeds_sanitization_limit, sanitize_content, sanitize_yaml_key, sanitize_yaml_metadata,
    validate_speaker, validate_timestamp,
};
use crate::domain::{Conversation, Message, Metadata};

/// Size caps enforced during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorLimits {
    /// Raw UTF-8 bytes allowed per message
    pub max_message_size: usize,
    /// Sanitized bytes allowed across the conversation
    pub max_total_size: usize,
}

impl Default for GeneratorLimits {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_CONTENT_SIZE,
            max_total_size: MAX_TOTAL_CONVERSATION_SIZE,
        }
    }
}

/// Output and metrics of a single generation call.
#[derive(Debug)]
pub struct GenerationReport {
    pub markdown: Result<String, GenerationError>,
    pub metrics: ConversionMetrics,
}

impl GenerationReport {
    pub fn into_result(self) -> Result<String, GenerationError> {
        self.markdown
    }
}

/// Renders conversations as Markdown.
///
/// Holds no per-call state, so one generator can serve any number of calls,
/// including from several threads.
#[derive(Debug, Clone, Default)]
pub struct MarkdownGenerator {
    pipeline: ContentPipeline,
    limits: GeneratorLimits,
}

impl MarkdownGenerator {
    /// Create with the built-in renderers and default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom renderer pipeline.
    pub fn with_pipeline(pipeline: ContentPipeline) -> Self {
        Self {
            pipeline,
            limits: GeneratorLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: GeneratorLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn pipeline(&self) -> &ContentPipeline {
        &self.pipeline
    }

    pub fn limits(&self) -> GeneratorLimits {
        self.limits
    }

    /// Generate Markdown, optionally prefixed with YAML frontmatter.
    pub fn generate(
        &self,
        conversation: &Conversation,
        metadata: Option<&Metadata>,
    ) -> Result<String, GenerationError> {
        self.generate_report(conversation, metadata).into_result()
    }

    /// Generate Markdown and return the run's metrics with it.
    ///
    /// The metrics are finished in both the success and the error case.
    pub fn generate_report(
        &self,
        conversation: &Conversation,
        metadata: Option<&Metadata>,
    ) -> GenerationReport {
        tracing::info!("Starting Markdown generation");
        tracing::debug!("Converting {} messages to Markdown", conversation.len());

        let mut metrics = ConversionMetrics::start();
        let markdown = self.render(conversation, metadata, &mut metrics);

        let output_size = match &markdown {
            Ok(md) => {
                let chars = md.chars().count();
                tracing::info!("Markdown generation completed: {} characters", chars);
                chars
            }
            Err(err) => {
                metrics.record_error(err);
                0
            }
        };
        metrics.finish(output_size);

        GenerationReport { markdown, metrics }
    }

    fn render(
        &self,
        conversation: &Conversation,
        metadata: Option<&Metadata>,
        metrics: &mut ConversionMetrics,
    ) -> Result<String, GenerationError> {
        let messages = self.validate(conversation, metrics)?;

        let mut lines: Vec<String> = Vec::with_capacity(messages.len() * 3 + 4);

        if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
            push_frontmatter(&mut lines, metadata, metrics);
        }

        for (i, message) in messages.iter().enumerate() {
            let index = i + 1;
            tracing::debug!("Formatting message {}: {}", index, message.speaker);

            let content = self
                .pipeline
                .process_message(message)
                .map_err(|err| match err {
                    RenderError::Invalid(reason) => GenerationError::invalid_content(format!(
                        "Message {}: failed to process content: {}",
                        index, reason
                    )),
                    RenderError::Fault(source) => GenerationError::Renderer(source),
                })?;

            lines.push(speaker_line(&message.speaker, message.timestamp.as_deref()));
            lines.push(content);
            lines.push(String::new());

            metrics.record_message(message.content_type, message.content.len());
        }

        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        Ok(lines.join("\n"))
    }

    /// Check every message and return sanitized copies, in order.
    fn validate(
        &self,
        conversation: &Conversation,
        metrics: &mut ConversionMetrics,
    ) -> Result<Vec<Message>, GenerationError> {
        if conversation.is_empty() {
            return Err(GenerationError::invalid_content(
                "Conversation must contain at least one message",
            ));
        }

        let mut total_size = 0usize;
        let mut sanitized = Vec::with_capacity(conversation.len());

        for (i, message) in conversation.messages.iter().enumerate() {
            let index = i + 1;

            if message.speaker.is_empty() {
                return Err(GenerationError::invalid_content(format!(
                    "Message {}: speaker cannot be empty",
                    index
                )));
            }

            let speaker = validate_speaker(&message.speaker)
                .map_err(|err| GenerationError::invalid_field(index, err))?;

            let timestamp = match message.timestamp.as_deref() {
                Some(ts) => {
                    let ts = validate_timestamp(ts)
                        .map_err(|err| GenerationError::invalid_field(index, err))?;
                    Some(ts).filter(|ts| !ts.is_empty())
                }
                None => None,
            };

            // Checked on the raw bytes so truncation cannot hide an oversized message
            let raw_size = message.content.len();
            if raw_size > self.limits.max_message_size {
                return Err(GenerationError::MessageTooLarge {
                    index,
                    size: raw_size,
                    limit: self.limits.max_message_size,
                });
            }

            if exceeds_sanitization_limit(&message.content) {
                metrics.record_warning(&format!(
                    "Message {} content truncated to {} bytes",
                    index, MAX_CONTENT_SANITIZATION_SIZE
                ));
            }
            let content = sanitize_content(&message.content);
            total_size += content.len();

            sanitized.push(Message {
                speaker,
                content,
                timestamp,
                content_type: message.content_type,
                language: message.language.clone(),
            });
        }

        if total_size > self.limits.max_total_size {
            return Err(GenerationError::ConversationTooLarge {
                size: total_size,
                limit: self.limits.max_total_size,
            });
        }

        Ok(sanitized)
    }
}

/// Append `---`, sorted `key: value` lines, `---` and a blank line.
fn push_frontmatter(lines: &mut Vec<String>, metadata: &Metadata, metrics: &mut ConversionMetrics) {
    let dropped = metadata
        .keys()
        .filter(|key| sanitize_yaml_key(key).is_empty())
        .count();
    if dropped > 0 {
        metrics.record_warning(&format!(
            "Dropped {} metadata key(s) with no valid characters",
            dropped
        ));
    }

    let fields = sanitize_yaml_metadata(metadata);
    tracing::debug!("Adding YAML frontmatter with {} fields", fields.len());

    lines.push("---".to_string());
    for (key, value) in &fields {
        lines.push(format!("{}: {}", key, value));
    }
    lines.push("---".to_string());
    lines.push(String::new());
}
