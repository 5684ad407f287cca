//! Tests for output filename sanitization and generation.

use conv2md::files::filename::{
    self, FilenameError, GenerateError, NameConfig, Segment, Template, TemplateError,
};

// ============================================================================
// Sanitization
// ============================================================================

#[test]
fn sanitize_replaces_whitespace_with_single_hyphen() {
    let config = NameConfig::default();
    assert_eq!(filename::sanitize("my chat", &config), "my-chat");
    assert_eq!(filename::sanitize("my \t\n  chat", &config), "my-chat");
}

#[test]
fn sanitize_removes_path_and_shell_characters() {
    let config = NameConfig::default();
    assert_eq!(
        filename::sanitize("a/b\\c:d*e?f\"g<h>i|j", &config),
        "abcdefghij"
    );
}

#[test]
fn sanitize_transliterates_accents() {
    let config = NameConfig::default();
    assert_eq!(filename::sanitize("café", &config), "cafe");
    assert_eq!(filename::sanitize("Grüße", &config), "Grusse");
}

#[test]
fn sanitize_trims_edge_dots_and_hyphens() {
    let config = NameConfig::default();
    assert_eq!(filename::sanitize("..-chat-..", &config), "chat");
    assert_eq!(filename::sanitize("  chat  ", &config), "chat");
}

#[test]
fn sanitize_collapses_hyphen_runs() {
    let config = NameConfig::default();
    assert_eq!(filename::sanitize("a - - b", &config), "a-b");
}

#[test]
fn sanitize_preserves_safe_characters() {
    let config = NameConfig::default();
    assert_eq!(filename::sanitize("chat_2024.v2", &config), "chat_2024.v2");
}

#[test]
fn sanitize_prefixes_reserved_names() {
    let config = NameConfig::default();
    assert_eq!(filename::sanitize("CON", &config), "_CON");
    assert_eq!(filename::sanitize("lpt1", &config), "_lpt1");
    assert_eq!(filename::sanitize("console", &config), "console");
}

#[test]
fn sanitize_falls_back_when_nothing_is_left() {
    let config = NameConfig::default();
    assert_eq!(filename::sanitize("", &config), "conversation");
    assert_eq!(filename::sanitize("???", &config), "conversation");
    assert_eq!(filename::sanitize("...", &config), "conversation");
}

#[test]
fn sanitize_truncates_to_configured_length() {
    let config = NameConfig::new(5);
    assert_eq!(filename::sanitize("abcdefghij", &config), "abcde");
    // Trailing separators left by the cut are trimmed
    assert_eq!(filename::sanitize("abcd-efgh", &config), "abcd");
}

#[test]
fn name_config_enforces_minimum_length() {
    assert_eq!(NameConfig::new(0).stem_max_length, 1);
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn template_parses_tags_and_literals() {
    let template = Template::parse("{date:%Y}_{stem}-log").unwrap();
    assert_eq!(
        template.segments(),
        &[
            Segment::Date("%Y".to_string()),
            Segment::Literal("_".to_string()),
            Segment::Stem,
            Segment::Literal("-log".to_string()),
        ]
    );
}

#[test]
fn template_default_formats() {
    let template = Template::parse("{date}{time}").unwrap();
    assert_eq!(
        template.segments(),
        &[
            Segment::Date("%Y-%m-%d".to_string()),
            Segment::Time("%H%M".to_string()),
        ]
    );
}

#[test]
fn template_syntax_errors() {
    assert_eq!(Template::parse("").unwrap_err(), TemplateError::Empty);
    assert_eq!(
        Template::parse("{stem").unwrap_err(),
        TemplateError::UnclosedBrace
    );
    assert_eq!(
        Template::parse("stem}").unwrap_err(),
        TemplateError::UnmatchedCloseBrace
    );
    assert_eq!(
        Template::parse("{{stem}}").unwrap_err(),
        TemplateError::UnclosedBrace
    );
    assert_eq!(
        Template::parse("{author}").unwrap_err(),
        TemplateError::UnknownTag("author".to_string())
    );
}

#[test]
fn template_rejects_bad_formats() {
    assert!(matches!(
        Template::parse("{date:plain}"),
        Err(TemplateError::InvalidFormat(_))
    ));
    assert!(matches!(
        Template::parse("{date:%Y/%m}"),
        Err(TemplateError::InvalidFormat(_))
    ));
    assert!(matches!(
        Template::parse("{stem:%Y}"),
        Err(TemplateError::InvalidFormat(_))
    ));
}

#[test]
fn template_render_sanitizes_stem() {
    let template = Template::parse("chat-{stem}").unwrap();
    assert_eq!(
        template.render("My Export", &NameConfig::default()),
        "chat-My-Export"
    );
}

#[test]
fn template_render_date_has_expected_shape() {
    let rendered = Template::parse("{date}")
        .unwrap()
        .render("x", &NameConfig::default());
    assert_eq!(rendered.len(), 10);
    assert_eq!(rendered.matches('-').count(), 2);
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn generate_appends_md_extension() {
    let name = filename::generate("chat", "{stem}", &NameConfig::default()).unwrap();
    assert_eq!(name, "chat.md");
}

#[test]
fn generate_keeps_existing_md_extension() {
    let name = filename::generate("chat", "{stem}.md", &NameConfig::default()).unwrap();
    assert_eq!(name, "chat.md");
}

#[test]
fn generate_reports_template_errors() {
    let err = filename::generate("chat", "{nope}", &NameConfig::default()).unwrap_err();
    assert!(matches!(err, GenerateError::Template(TemplateError::UnknownTag(_))));
}

#[test]
fn generate_validates_final_length() {
    let long_literal = "x".repeat(300);
    let err = filename::generate("chat", &long_literal, &NameConfig::default()).unwrap_err();
    assert_eq!(
        err,
        GenerateError::Filename(FilenameError::TooLong {
            length: 303,
            max: 255
        })
    );
}

#[test]
fn validate_length_boundary() {
    assert!(filename::validate_length(&"a".repeat(255)).is_ok());
    assert!(filename::validate_length(&"a".repeat(256)).is_err());
}
