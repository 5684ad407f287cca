//! Output filename generation and sanitization.
//!
//! Output names come from a template with `{stem}`, `{date}` and `{time}`
//! tags. The stem (usually the input file's name) is sanitized so the result
//! is safe on every common filesystem.

use deunicode::deunicode;

/// Extension appended to every generated name.
pub const EXTENSION: &str = ".md";

/// Name used when sanitization leaves nothing behind.
const FALLBACK_NAME: &str = "conversation";

/// Maximum filename length for most filesystems.
const MAX_FILENAME_LENGTH: usize = 255;

/// Default template string.
pub const DEFAULT_TEMPLATE: &str = "{stem}";

/// Default date format for `{date}`.
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default time format for `{time}`.
const DEFAULT_TIME_FORMAT: &str = "%H%M";

/// Windows reserved device names that cannot be used as filenames.
const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Options for stem sanitization.
#[derive(Debug, Clone)]
pub struct NameConfig {
    /// Maximum length of the sanitized stem (minimum 1).
    pub stem_max_length: usize,
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            stem_max_length: 100,
        }
    }
}

impl NameConfig {
    pub fn new(stem_max_length: usize) -> Self {
        Self {
            stem_max_length: stem_max_length.max(1),
        }
    }
}

/// Sanitize a string for use as a filename stem.
///
/// 1. Unicode → ASCII transliteration
/// 2. Whitespace runs → one hyphen
/// 3. Anything outside `[A-Za-z0-9_.-]` removed
/// 4. Hyphen runs collapsed, edge dots/hyphens trimmed
/// 5. Windows reserved names prefixed with `_`
/// 6. Truncated to `config.stem_max_length`
/// 7. Empty result → `conversation`
pub fn sanitize(input: &str, config: &NameConfig) -> String {
    let ascii = deunicode(input);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_hyphen = false;

    for c in ascii.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_hyphen {
                result.push('-');
                last_was_hyphen = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            result.push(c);
            last_was_hyphen = false;
        }
    }

    let trimmed = result.trim_matches(|c| c == '.' || c == '-');
    let truncated: String = trimmed.chars().take(config.stem_max_length).collect();
    let name = handle_reserved_name(truncated.trim_end_matches(['.', '-']));

    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// Prefix Windows device names (`CON`, `nul.txt`, ...) with `_`.
fn handle_reserved_name(name: &str) -> String {
    let base = name.split('.').next().unwrap_or(name);
    if WINDOWS_RESERVED
        .iter()
        .any(|reserved| base.eq_ignore_ascii_case(reserved))
    {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// Generate an output filename from a template and a stem.
///
/// Appends `.md` when the template does not already end with it.
pub fn generate(stem: &str, template: &str, config: &NameConfig) -> Result<String, GenerateError> {
    let rendered = Template::parse(template)?.render(stem, config);

    let filename = if rendered.ends_with(EXTENSION) {
        rendered
    } else {
        format!("{}{}", rendered, EXTENSION)
    };

    validate_length(&filename)?;
    Ok(filename)
}

/// Reject names longer than the filesystem limit.
pub fn validate_length(filename: &str) -> Result<(), FilenameError> {
    if filename.len() > MAX_FILENAME_LENGTH {
        Err(FilenameError::TooLong {
            length: filename.len(),
            max: MAX_FILENAME_LENGTH,
        })
    } else {
        Ok(())
    }
}

/// Errors that can occur during filename generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Filename error: {0}")]
    Filename(#[from] FilenameError),
}

/// Final filename problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("Filename too long: {length} characters (max {max})")]
    TooLong { length: usize, max: usize },
}

/// Template syntax problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Template cannot be empty")]
    Empty,
    #[error("Unclosed brace in template")]
    UnclosedBrace,
    #[error("Unmatched closing brace in template")]
    UnmatchedCloseBrace,
    #[error("Unknown template tag: {0}")]
    UnknownTag(String),
    #[error("Invalid format string: {0}")]
    InvalidFormat(String),
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// Sanitized input stem
    Stem,
    /// Current local date, strftime format
    Date(String),
    /// Current local time, strftime format
    Time(String),
}

/// A parsed filename template.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        if template.is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }

                    let mut tag = String::new();
                    let mut closed = false;
                    for tc in chars.by_ref() {
                        match tc {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(TemplateError::UnclosedBrace),
                            _ => tag.push(tc),
                        }
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedBrace);
                    }
                    segments.push(parse_tag(&tag)?);
                }
                '}' => return Err(TemplateError::UnmatchedCloseBrace),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Render with `stem` and the current local date/time.
    pub fn render(&self, stem: &str, config: &NameConfig) -> String {
        let now = chrono::Local::now();

        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(s) => s.clone(),
                Segment::Stem => sanitize(stem, config),
                Segment::Date(fmt) | Segment::Time(fmt) => now.format(fmt).to_string(),
            })
            .collect()
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            segments: vec![Segment::Stem],
        }
    }
}

/// Parse tag content (without braces), e.g. `date:%Y%m%d`.
fn parse_tag(content: &str) -> Result<Segment, TemplateError> {
    let (name, format) = match content.split_once(':') {
        Some((name, fmt)) => (name, Some(fmt)),
        None => (content, None),
    };

    match name {
        "stem" => match format {
            Some(_) => Err(TemplateError::InvalidFormat(
                "stem tag does not accept format".to_string(),
            )),
            None => Ok(Segment::Stem),
        },
        "date" => Ok(Segment::Date(checked_format(format.unwrap_or(DEFAULT_DATE_FORMAT))?)),
        "time" => Ok(Segment::Time(checked_format(format.unwrap_or(DEFAULT_TIME_FORMAT))?)),
        _ => Err(TemplateError::UnknownTag(name.to_string())),
    }
}

/// Ensure a strftime format is non-empty and contains a known specifier.
fn checked_format(fmt: &str) -> Result<String, TemplateError> {
    const VALID_SPECIFIERS: &[char] = &[
        'Y', 'y', 'm', 'd', 'H', 'M', 'S', 'j', 'a', 'A', 'b', 'B', 'e', 'I', 'p', 'F', 'T', 's',
    ];

    if fmt.is_empty() {
        return Err(TemplateError::InvalidFormat("format cannot be empty".to_string()));
    }

    let mut chars = fmt.chars();
    let mut found = false;
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some(spec) if VALID_SPECIFIERS.contains(&spec) => found = true,
                Some('%') => {}
                _ => {
                    return Err(TemplateError::InvalidFormat(format!(
                        "format string '{}' contains an unsupported specifier",
                        fmt
                    )))
                }
            }
        }
    }

    if !found {
        return Err(TemplateError::InvalidFormat(format!(
            "format string '{}' contains no valid strftime specifiers",
            fmt
        )));
    }

    // Path separators would escape the output directory
    if fmt.contains('/') || fmt.contains('\\') {
        return Err(TemplateError::InvalidFormat(format!(
            "format string '{}' contains a path separator",
            fmt
        )));
    }

    Ok(fmt.to_string())
}
