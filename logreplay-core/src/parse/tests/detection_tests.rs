use crate::error::ParseError;
use crate::parse::EntryParser;
use pretty_assertions::assert_eq;

const COMBINED: &str =
    r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET /index.html HTTP/1.1" 200 512"#;
const CUSTOM: &str = "1704067200|10.0.0.1|/index.html|200|512";

#[test]
fn first_successful_format_is_locked() {
    let mut parser = EntryParser::default();
    assert!(!parser.is_locked());

    parser.parse(CUSTOM).unwrap();

    assert_eq!(parser.format_name(), Some("custom"));
}

#[test]
fn locked_format_rejects_other_formats() {
    let mut parser = EntryParser::default();
    parser.parse(COMBINED).unwrap();

    let err = parser.parse(CUSTOM).unwrap_err();

    assert!(matches!(err, ParseError::NoMatch { format: "combined" }));
    assert_eq!(parser.format_name(), Some("combined"));
}

#[test]
fn unparsable_lines_before_detection_keep_searching() {
    let mut parser = EntryParser::default();

    assert_eq!(parser.parse("# header").unwrap_err(), ParseError::Unrecognised);
    assert!(!parser.is_locked());

    let entry = parser.parse(COMBINED).unwrap();
    assert_eq!(entry.path, "/index.html");
    assert_eq!(parser.format_name(), Some("combined"));
}

#[test]
fn peek_requires_a_locked_format() {
    let mut parser = EntryParser::default();
    assert_eq!(parser.peek(CUSTOM), None);

    parser.parse(CUSTOM).unwrap();

    assert_eq!(parser.peek(CUSTOM).map(|e| e.timestamp), Some(1_704_067_200));
}

#[test]
fn both_formats_agree_on_shared_fields() {
    let a = EntryParser::default().parse(COMBINED).unwrap();
    let b = EntryParser::default().parse(CUSTOM).unwrap();

    assert_eq!(a.timestamp, b.timestamp);
    assert_eq!(a.hostname, b.hostname);
    assert_eq!(a.path, b.path);
    assert_eq!(a.response_code, b.response_code);
}
