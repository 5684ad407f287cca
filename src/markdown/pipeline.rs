//! Content renderers and the ordered dispatcher that picks one per message.
//!
//! A [`Renderer`] pairs a predicate over [`ContentType`] with a rendering
//! function. [`ContentPipeline`] tries renderers in order:
//! 1. The first renderer whose predicate accepts the message's content type
//! 2. The text renderer, when nothing matched

use std::fmt;

use super::blocks::{code_block, escape_markdown};
use crate::domain::{ContentType, Message};

/// Decides whether a renderer handles a content type.
pub type Predicate = fn(ContentType) -> bool;

/// Turns a message into a Markdown fragment.
pub type RenderFn = fn(&Message) -> Result<String, RenderError>;

/// Failure while rendering a single message.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The content has a shape the renderer cannot express. The generator
    /// reports these as invalid content for the offending message.
    #[error("{0}")]
    Invalid(String),

    /// Any other failure. Passed through to the caller untouched.
    #[error(transparent)]
    Fault(Box<dyn std::error::Error + Send + Sync>),
}

/// A named `(predicate, render)` pair.
#[derive(Clone, Copy)]
pub struct Renderer {
    name: &'static str,
    predicate: Predicate,
    render: RenderFn,
}

impl Renderer {
    pub fn new(name: &'static str, predicate: Predicate, render: RenderFn) -> Self {
        Self {
            name,
            predicate,
            render,
        }
    }

    /// Escaped prose.
    pub fn text() -> Self {
        Self::new("text", |kind| kind == ContentType::Text, render_text)
    }

    /// Fenced code block tagged with the message language.
    pub fn code() -> Self {
        Self::new("code", |kind| kind == ContentType::Code, render_code)
    }

    /// Markdown image whose target is the escaped content.
    pub fn image() -> Self {
        Self::new("image", |kind| kind == ContentType::Image, render_image)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn can_process(&self, kind: ContentType) -> bool {
        (self.predicate)(kind)
    }

    pub fn process(&self, message: &Message) -> Result<String, RenderError> {
        (self.render)(message)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer").field("name", &self.name).finish()
    }
}

fn render_text(message: &Message) -> Result<String, RenderError> {
    Ok(escape_markdown(&message.content))
}

fn render_code(message: &Message) -> Result<String, RenderError> {
    let language = match message.language.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(lang) => {
            // The tag shares a line with the opening fence
            if lang.chars().any(|c| c == '`' || c.is_control()) {
                return Err(RenderError::Invalid(format!(
                    "code language tag '{}' contains invalid characters",
                    lang.escape_debug()
                )));
            }
            Some(lang)
        }
    };
    Ok(code_block(&message.content, language))
}

fn render_image(message: &Message) -> Result<String, RenderError> {
    Ok(format!("![Image]({})", escape_markdown(&message.content)))
}

/// Ordered list of renderers with a guaranteed text fallback.
#[derive(Debug, Clone)]
pub struct ContentPipeline {
    renderers: Vec<Renderer>,
}

impl ContentPipeline {
    /// Create with the built-in renderers: text, code, image.
    pub fn new() -> Self {
        Self {
            renderers: vec![Renderer::text(), Renderer::code(), Renderer::image()],
        }
    }

    /// Create with specific renderers, in priority order.
    pub fn with_renderers(renderers: Vec<Renderer>) -> Self {
        Self { renderers }
    }

    pub fn renderers(&self) -> &[Renderer] {
        &self.renderers
    }

    /// Append a renderer. It is consulted after every existing one.
    pub fn add_renderer(&mut self, renderer: Renderer) {
        self.renderers.push(renderer);
    }

    /// The renderer that will handle `kind`.
    pub fn renderer_for(&self, kind: ContentType) -> Renderer {
        self.renderers
            .iter()
            .find(|r| r.can_process(kind))
            .copied()
            .unwrap_or_else(Renderer::text)
    }

    /// Render a message with the first matching renderer.
    pub fn process_message(&self, message: &Message) -> Result<String, RenderError> {
        self.renderer_for(message.content_type).process(message)
    }
}

impl Default for ContentPipeline {
    fn default() -> Self {
        Self::new()
    }
}
