use line_record_parser::{ParseError, Pipeline, Record, Value};

fn utf8(s: &str) -> Value {
    Value::Utf8(s.to_string())
}

#[test]
fn latin1_fixture_decodes_before_splitting() {
    // tests/fixtures/latin1.csv holds ISO-8859-1 bytes (0xE9 = é, 0xEF = ï).
    let result = Pipeline::from_path("tests/fixtures/latin1.csv")
        .delimiter(",")
        .encoding("ISO-8859-1", "UTF-8")
        .parse()
        .unwrap();

    assert_eq!(
        result.into_records().unwrap(),
        vec![
            Record::Row(vec![utf8("café"), utf8("1")]),
            Record::Row(vec![utf8("naïve"), utf8("2")]),
        ]
    );
}

#[test]
fn invalid_bytes_for_declared_encoding_are_replaced_not_fatal() {
    // The same Latin-1 fixture read as UTF-8: 0xE9 is not valid UTF-8, so the
    // run still succeeds with U+FFFD in place of the bad sequence.
    let result = Pipeline::from_path("tests/fixtures/latin1.csv")
        .delimiter(",")
        .parse()
        .unwrap();

    let records = result.into_records().unwrap();
    assert_eq!(records.len(), 2);
    let first = records[0].field(&0.into()).and_then(Value::as_str).unwrap();
    assert!(first.contains('\u{FFFD}'));
    assert_eq!(records[0].field(&1.into()), Some(&utf8("1")));
}

#[test]
fn conversion_applies_to_whole_lines_without_delimiter() {
    let result = Pipeline::from_path("tests/fixtures/latin1.csv")
        .encoding("ISO-8859-1", "UTF-8")
        .parse()
        .unwrap();

    assert_eq!(
        result.into_records().unwrap(),
        vec![Record::Line(utf8("café,1")), Record::Line(utf8("naïve,2"))]
    );
}

#[test]
fn unknown_source_encoding_fails_before_reading() {
    let err = Pipeline::from_text("a,b\n")
        .delimiter(",")
        .encoding("not-a-charset", "UTF-8")
        .parse()
        .unwrap_err();

    assert!(matches!(err, ParseError::UnknownEncoding { .. }));
    assert!(err.to_string().contains("'not-a-charset'"));
}

#[test]
fn unknown_target_encoding_fails_too() {
    let err = Pipeline::from_text("a\n")
        .encoding("UTF-8", "mystery-charset")
        .parse()
        .unwrap_err();
    assert!(err.to_string().contains("'mystery-charset'"));
}

#[test]
fn non_utf8_target_degrades_unrepresentable_characters() {
    // '€' and 'α' cannot be represented in ISO-8859-1; representable text
    // survives the funnel unchanged.
    let result = Pipeline::from_text("café\n")
        .encoding("UTF-8", "ISO-8859-1")
        .parse()
        .unwrap();
    assert_eq!(result.into_records().unwrap(), vec![Record::Line(utf8("café"))]);

    let result = Pipeline::from_text("αβ\n")
        .encoding("UTF-8", "ISO-8859-1")
        .parse()
        .unwrap();
    let records = result.into_records().unwrap();
    let line = records[0].field(&0.into()).and_then(Value::as_str).unwrap();
    assert_ne!(line, "αβ");
}
