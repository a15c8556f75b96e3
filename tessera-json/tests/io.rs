use std::io::Write;

use tessera_format::{EventError, ParseErrorKind};
use tessera_json::{
    WriteOptions, from_file, from_reader, from_str, to_string, to_string_with_options, to_writer,
};
use tessera_testhelpers::test;
use tessera_value::{Value, value};

#[test]
fn round_trip_through_text() {
    let v = value!({
        "name": "tessera",
        "nested": [{ "a": [1, -2, 3.25] }, [], {}],
        "flags": [true, false, null],
        "text": "quote \" backslash \\ newline \n"
    });
    let text = to_string(&v).unwrap();
    assert_eq!(from_str(&text).unwrap(), v);
}

#[test]
fn compact_output() {
    let v = value!({ "a": [1, -1, 0.5], "b": "x/y" });
    assert_eq!(to_string(&v).unwrap(), r#"{"a":[1,-1,0.5],"b":"x/y"}"#);
    assert_eq!(
        to_string_with_options(&v, WriteOptions::new().escape_slash(true)).unwrap(),
        r#"{"a":[1,-1,0.5],"b":"x\/y"}"#
    );
}

#[test]
fn values_json_cannot_express() {
    assert_eq!(
        to_string(&Value::Double(f64::NAN)),
        Err(EventError::NonFiniteNumber)
    );
    assert_eq!(
        to_string_with_options(
            &value!([(f64::INFINITY)]),
            WriteOptions::new().reject_non_finite(false)
        )
        .unwrap(),
        "[null]"
    );
    assert!(matches!(
        to_string(&Value::Binary(vec![1, 2])),
        Err(EventError::Unsupported { .. })
    ));
}

#[test]
fn value_pointers_are_written_as_their_target() {
    let shared = value!([1, 2]);
    let v = value!({ "x": (Value::value_ptr(&shared)) });
    assert_eq!(to_string(&v).unwrap(), r#"{"x":[1,2]}"#);
}

#[test]
fn reader_and_writer() {
    let v = from_reader(&b" [\"r\", 1] "[..]).unwrap();
    assert_eq!(v, value!(["r", 1]));

    let mut sink = Vec::new();
    to_writer(&mut sink, &v).unwrap();
    assert_eq!(sink, br#"["r",1]"#);
}

#[test]
fn parse_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"from": "file"}"#).unwrap();
    file.flush().unwrap();
    assert_eq!(from_file(file.path()).unwrap(), value!({ "from": "file" }));

    let dir = tempfile::tempdir().unwrap();
    let err = from_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::Io(_)));
}
