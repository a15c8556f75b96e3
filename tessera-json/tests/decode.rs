use std::borrow::Cow;

use tessera_format::{DebugEvents, EventError, ParseErrorKind, ParseOptions};
use tessera_json::{from_slice, from_str, from_str_borrowed, from_str_with_options, parse_into};
use tessera_testhelpers::test;
use tessera_value::{DuplicateKeys, ToValue, Value, value};

#[test]
fn mixed_array() {
    let v = from_str("[1,2.5,\"a\\nb\",true,null]").unwrap();
    assert_eq!(v, value!([1, 2.5, "a\nb", true, null]));

    let items = v.get_array().unwrap();
    assert!(items[0].is_unsigned());
    assert!(items[1].is_double());
    assert_eq!(items[2].get_string().unwrap(), "a\nb");
    assert!(items[4].is_null());
}

#[test]
fn duplicate_keys_are_rejected_by_default() {
    let err = from_str(r#"{"a":1,"a":2}"#).unwrap_err();
    assert_eq!(
        err.as_event_error(),
        Some(&EventError::DuplicateKey { key: "a".into() })
    );
    assert_eq!(err.span.offset, 12);
}

#[test]
fn duplicate_key_policies() {
    let text = br#"{"a":1,"b":true,"a":2}"#;

    let mut first = ToValue::with_duplicate_keys(DuplicateKeys::FirstWins);
    parse_into(text, &mut first).unwrap();
    assert_eq!(first.into_value(), value!({ "a": 1, "b": true }));

    let mut last = ToValue::with_duplicate_keys(DuplicateKeys::LastWins);
    parse_into(text, &mut last).unwrap();
    let v = last.into_value();
    assert_eq!(v, value!({ "a": 2, "b": true }));
    let keys: Vec<_> = v.get_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn leading_zero_is_a_syntax_error() {
    let err = from_str("01").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::Syntax {
            expected: Cow::Borrowed("invalid leading zero")
        }
    );
    assert_eq!(err.span.offset, 1);
    assert_eq!(from_str("0").unwrap(), 0u64);
    assert_eq!(from_str("-0").unwrap(), 0i64);
}

#[test]
fn integer_boundaries() {
    assert_eq!(
        from_str("-9223372036854775808").unwrap(),
        Value::Signed(i64::MIN)
    );
    assert_eq!(
        from_str("18446744073709551615").unwrap(),
        Value::Unsigned(u64::MAX)
    );
    assert!(from_str("18446744073709551616").unwrap().is_double());
    assert!(from_str("-9223372036854775809").unwrap().is_double());
    assert_eq!(from_str("1e2").unwrap(), 100.0);
}

#[test]
fn object_keys_keep_input_order() {
    let v = from_str(r#"{"z": 1, "a": {"y": [], "b": {}}, "m": "x"}"#).unwrap();
    let keys: Vec<_> = v.get_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["z", "a", "m"]);
    assert_eq!(v["a"]["y"], value!([]));
}

#[test]
fn borrowed_strings_point_into_the_input() {
    let text = String::from(r#"{"plain": "abc", "escaped": "a\tb"}"#);
    let v = from_str_borrowed(&text).unwrap();
    assert!(v["plain"].is_string_view());
    assert!(v["escaped"].is_string());
    assert_eq!(v["escaped"], "a\tb");

    let owned = v.to_owned_value().unwrap();
    drop(v);
    assert!(owned["plain"].is_string());
}

#[test]
fn errors_carry_positions() {
    let text = b"{\n  \"a\": [1, 2,\n  ]\n}";
    let err = from_slice(text).unwrap_err();
    assert_eq!(err.kind.to_string(), "expected value");
    let position = err.position(text);
    assert_eq!((position.line, position.column), (3, 3));
}

#[test]
fn invalid_utf8_in_strings() {
    let err = from_slice(b"[\"ok\", \"\xc3\x28\"]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
    assert_eq!(err.span.offset, 8);
}

#[test]
fn nesting_limit() {
    let deep = format!("{}{}", "[".repeat(40), "]".repeat(40));
    assert!(from_str(&deep).is_ok());

    let options = ParseOptions::new().max_depth(16);
    let err = from_str_with_options(&deep, &options).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DepthLimitExceeded { limit: 16 });
}

#[test]
fn event_stream() {
    let mut out = String::new();
    parse_into(
        br#"{"k": [1, -1, 0.5, "s"], "e": {}}"#,
        &mut DebugEvents::new(&mut out),
    )
    .unwrap();
    insta::assert_snapshot!(out, @r#"
    begin object
    key: "k"
    begin array
    u64: 1
    element
    i64: -1
    element
    f64: 0.5
    element
    string: "s"
    element
    end array
    member
    key: "e"
    begin object
    end object
    member
    end object
    "#);
}
