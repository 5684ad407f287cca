//! Pure escaping and fencing primitives.
//!
//! Nothing here allocates more than one output string or depends on any
//! other module, so these functions are safe to call from any renderer.

/// Characters escaped in message text and speaker lines.
pub const MARKDOWN_SPECIAL_CHARS: &str = "\\`*_{}[]()#+-.!|";

/// Characters escaped inside a date heading. Hyphens are left alone.
const DATE_SPECIAL_CHARS: &str = "#*_";

/// ASCII lookup table built from a character list.
const fn ascii_table(chars: &str) -> [bool; 128] {
    let bytes = chars.as_bytes();
    let mut table = [false; 128];
    let mut i = 0;
    while i < bytes.len() {
        table[bytes[i] as usize] = true;
        i += 1;
    }
    table
}

static MARKDOWN_TABLE: [bool; 128] = ascii_table(MARKDOWN_SPECIAL_CHARS);
static DATE_TABLE: [bool; 128] = ascii_table(DATE_SPECIAL_CHARS);

/// Prefix every character flagged in `table` with a backslash.
///
/// One pass means the backslashes we insert are never re-examined, which is
/// the same result as replacing `\` first and every other character after.
fn escape_with(text: &str, table: &[bool; 128]) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        if c.is_ascii() && table[c as usize] {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Length of the longest run of backticks in `content`.
fn longest_backtick_run(content: &str) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run
}

/// Number of backticks needed to fence `content`.
///
/// Always strictly longer than any backtick run inside the content and never
/// shorter than `min_length`.
pub fn fence_length(content: &str, min_length: usize) -> usize {
    if content.is_empty() {
        return min_length;
    }
    match longest_backtick_run(content) {
        0 => min_length,
        run => min_length.max(run + 1),
    }
}

/// Wrap `content` in a fenced code block.
///
/// The opening fence carries `language` when given. Non-empty content is
/// terminated with a newline so the closing fence sits on its own line.
pub fn code_block(content: &str, language: Option<&str>) -> String {
    let fence = "`".repeat(fence_length(content, 3));
    let tag = language.unwrap_or("");

    let mut block = String::with_capacity(content.len() + fence.len() * 2 + tag.len() + 2);
    block.push_str(&fence);
    block.push_str(tag);
    block.push('\n');
    block.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        block.push('\n');
    }
    block.push_str(&fence);
    block
}

/// Escape Markdown special characters in free text.
///
/// # Examples
///
/// ```
/// use conv2md::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("Hi there!"), "Hi there\\!");
/// assert_eq!(escape_markdown("a\\b"), "a\\\\b");
/// ```
pub fn escape_markdown(text: &str) -> String {
    escape_with(text, &MARKDOWN_TABLE)
}

/// Bold speaker line, with the timestamp after an em-dash when present.
pub fn speaker_line(speaker: &str, timestamp: Option<&str>) -> String {
    let speaker = escape_markdown(speaker);
    match timestamp {
        Some(ts) if !ts.is_empty() => format!("**{} — {}**", speaker, escape_markdown(ts)),
        _ => format!("**{}:**", speaker),
    }
}

/// Level-two heading for a date separator.
pub fn date_marker(date: &str) -> String {
    format!("## {}", escape_with(date, &DATE_TABLE))
}
