use std::io::Write;

use tessera_cbor::{
    CborWriter, from_file, from_reader, from_slice, from_slice_borrowed, parse_into, to_vec,
};
use tessera_format::{DebugEvents, EventError, ParseErrorKind, Tee};
use tessera_testhelpers::test;
use tessera_value::{Value, value};

#[test]
fn definite_array() {
    let v = from_slice(&[0x82, 0x01, 0x02]).unwrap();
    assert_eq!(v, value!([1, 2]));
    assert!(v[0].is_unsigned());
}

#[test]
fn indefinite_array() {
    let definite = from_slice(&[0x82, 0x01, 0x02]).unwrap();
    let indefinite = from_slice(&[0x9f, 0x01, 0x02, 0xff]).unwrap();
    assert_eq!(indefinite, definite);
    assert_eq!(indefinite, Value::Array(vec![Value::Unsigned(1), Value::Unsigned(2)]));
}

#[test]
fn negative_integer_boundaries() {
    let min = [0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    assert_eq!(from_slice(&min).unwrap(), Value::Signed(i64::MIN));

    let beyond = [0x3b, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    let err = from_slice(&beyond).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::NumericOverflow {
            what: "negative integer overflow"
        }
    );
    assert_eq!(err.span.offset, 0);
}

#[test]
fn half_floats_are_unsupported() {
    let err = from_slice(&[0xf9, 0x3c, 0x00]).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::Unsupported { .. }));
}

#[test]
fn indefinite_strings_are_joined() {
    let bytes = [
        0xa1, 0x7f, 0x61, b'k', 0x61, b'y', 0xff, 0x5f, 0x41, 0x01, 0x42, 0x02, 0x03, 0xff,
    ];
    let v = from_slice(&bytes).unwrap();
    assert_eq!(v, value!({ "ky": (vec![1u8, 2, 3]) }));
}

#[test]
fn event_stream() {
    // {"a": [1, -1], "b": h'ff'} with an indefinite outer map
    let bytes = [
        0xbf, 0x61, b'a', 0x82, 0x01, 0x20, 0x61, b'b', 0x41, 0xff, 0xff,
    ];
    let mut out = String::new();
    parse_into(&bytes, &mut DebugEvents::new(&mut out)).unwrap();
    insta::assert_snapshot!(out, @r#"
    begin object
    key: "a"
    begin array 2
    u64: 1
    element
    i64: -1
    element
    end array 2
    member
    key: "b"
    binary: ff
    member
    end object
    "#);
}

#[test]
fn borrowed_strings() {
    let bytes = [0x82, 0x63, b'a', b'b', b'c', 0x42, 0x01, 0x02];
    let v = from_slice_borrowed(&bytes).unwrap();
    assert!(v[0].is_string_view());
    assert!(v[1].is_binary_view());
    assert_eq!(v[1].get_binary_type().unwrap(), [1, 2]);
}

#[test]
fn round_trip() {
    let v = value!({
        "n": [0, 23, 24, 255, 256, 65536, (u64::MAX), -1, -25, (i64::MIN)],
        "f": [1.5, -0.25, (f64::INFINITY)],
        "s": ["", "tessera", "é😀"],
        "b": (vec![0u8, 1, 255]),
        "nested": [[], {}, { "x": [null, true, false] }]
    });
    let bytes = to_vec(&v).unwrap();
    assert_eq!(from_slice(&bytes).unwrap(), v);
}

#[test]
fn writer_and_parser_agree_on_events() {
    let bytes = [0x9f, 0xa1, 0x61, b'k', 0xf6, 0xff];
    let mut out = String::new();
    let mut tee = Tee::new(CborWriter::new(), DebugEvents::new(&mut out));
    parse_into(&bytes, &mut tee).unwrap();
    let (writer, _) = tee.into_inner();
    assert_eq!(writer.into_bytes(), bytes);
}

#[test]
fn binary_and_nan_survive_a_round_trip() {
    let v = value!([(Value::Binary(vec![7])), (f64::NAN)]);
    let bytes = to_vec(&v).unwrap();
    let back = from_slice(&bytes).unwrap();
    assert_eq!(back[0], Value::Binary(vec![7]));
    assert!(back[1].get_double().unwrap().is_nan());
}

#[test]
fn uninitialized_values_cannot_be_encoded() {
    assert_eq!(to_vec(&Value::Uninitialized), Err(EventError::Uninitialized));
}

#[test]
fn reader_and_file() {
    assert_eq!(from_reader(&[0xf5][..]).unwrap(), true);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0xa1, 0x61, b'x', 0x0a]).unwrap();
    file.flush().unwrap();
    assert_eq!(from_file(file.path()).unwrap(), value!({ "x": 10 }));
}
