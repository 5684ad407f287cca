//! Tests for the JSON conversation parser against fixtures.

use conv2md::{ContentType, ConversationParseError, ErrorKind, JsonConverter};

use crate::helpers::{fixtures_dir, load_fixture};

#[test]
fn mixed_fixture_fields_are_parsed() {
    let conv = JsonConverter::new().parse(&load_fixture("mixed.json")).unwrap();

    assert_eq!(conv.title.as_deref(), Some("Debugging session"));
    assert_eq!(conv.len(), 3);

    let kinds: Vec<ContentType> = conv.messages.iter().map(|m| m.content_type).collect();
    assert_eq!(
        kinds,
        vec![ContentType::Text, ContentType::Code, ContentType::Image]
    );
    assert_eq!(conv.messages[1].language.as_deref(), Some("rust"));
    assert_eq!(
        conv.messages[0].timestamp.as_deref(),
        Some("2024-08-18T14:30:00Z")
    );
}

#[test]
fn parse_bytes_matches_parse() {
    let text = load_fixture("simple.json");
    let converter = JsonConverter::new();

    assert_eq!(
        converter.parse_bytes(text.as_bytes()).unwrap(),
        converter.parse(&text).unwrap()
    );
}

#[test]
fn malformed_fixture_is_malformed_input() {
    let err = JsonConverter::new()
        .parse(&load_fixture("malformed.json"))
        .unwrap_err();

    assert!(matches!(err, ConversationParseError::InvalidJson(_)));
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn empty_messages_fixture_is_rejected() {
    let err = JsonConverter::new()
        .parse(&load_fixture("empty_messages.json"))
        .unwrap_err();

    assert!(matches!(err, ConversationParseError::EmptyMessages));
    assert_eq!(
        err.to_string(),
        "Conversation messages list cannot be empty"
    );
}

#[test]
fn every_fixture_is_utf8() {
    for entry in std::fs::read_dir(fixtures_dir()).unwrap() {
        let path = entry.unwrap().path();
        let bytes = std::fs::read(&path).unwrap();
        assert!(
            std::str::from_utf8(&bytes).is_ok(),
            "{} is not UTF-8",
            path.display()
        );
    }
}
