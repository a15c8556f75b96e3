use std::io::Write;

use tessera_format::{DebugEvents, EventError, ParseErrorKind, Recorder, Tee};
use tessera_msgpack::{
    MsgPackWriter, from_file, from_reader, from_slice, from_slice_borrowed, parse_into, to_vec,
};
use tessera_testhelpers::test;
use tessera_value::{Value, value};

#[test]
fn fixed_and_wide_forms_decode_alike() {
    let fix = from_slice(&[0x92, 0x01, 0xa1, b'a']).unwrap();
    let wide = from_slice(&[0xdc, 0x00, 0x02, 0xcc, 0x01, 0xd9, 0x01, b'a']).unwrap();
    assert_eq!(fix, wide);
    assert_eq!(fix, value!([1, "a"]));
}

#[test]
fn integers_keep_their_sign_class() {
    let v = from_slice(&[0x93, 0x05, 0xd0, 0x05, 0xff]).unwrap();
    assert!(v[0].is_unsigned());
    assert!(v[1].is_signed());
    assert_eq!(v[1], 5);
    assert_eq!(v[2], -1);
}

#[test]
fn extensions_read_as_null() {
    // [ext8 type 1 "ab", fixext4 type 2, 3]
    let bytes = [
        0x93, 0xc7, 0x02, 0x01, b'a', b'b', 0xd6, 0x02, 0, 0, 0, 0, 0x03,
    ];
    assert_eq!(from_slice(&bytes).unwrap(), value!([null, null, 3]));
}

#[test]
fn malformed_input() {
    let err = from_slice(&[0xc1]).unwrap_err();
    assert_eq!(err.kind.to_string(), "reserved byte 0xc1");
    assert_eq!(err.span.offset, 0);

    let err = from_slice(&[0x81, 0x01, 0x01]).unwrap_err();
    assert_eq!(err.kind.to_string(), "unexpected key type");

    let err = from_slice(&[0xdd, 0xff, 0xff, 0xff, 0xff]).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));

    let err = from_slice(&[0xa2, 0xff, 0xfe]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
    assert_eq!(err.span.offset, 1);
}

#[test]
fn duplicate_keys_are_rejected() {
    let bytes = [0x82, 0xa1, b'k', 0x01, 0xa1, b'k', 0x02];
    let err = from_slice(&bytes).unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::Consumer(EventError::DuplicateKey { .. })
    ));
}

#[test]
fn event_stream() {
    // {"a": [1, -1], "b": bin 0xff}
    let bytes = [
        0x82, 0xa1, b'a', 0x92, 0x01, 0xff, 0xa1, b'b', 0xc4, 0x01, 0xff,
    ];
    let mut out = String::new();
    parse_into(&bytes, &mut DebugEvents::new(&mut out)).unwrap();
    insta::assert_snapshot!(out, @r#"
    begin object 2
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
    end object 2
    "#);
}

#[test]
fn borrowed_strings_and_binary() {
    let bytes = [0x92, 0xa3, b'a', b'b', b'c', 0xc4, 0x02, 0x01, 0x02];
    let v = from_slice_borrowed(&bytes).unwrap();
    assert!(v[0].is_string_view());
    assert!(v[1].is_binary_view());
    assert_eq!(v[1].get_binary_type().unwrap(), [1, 2]);
}

#[test]
fn round_trip() {
    let v = value!({
        "n": [0, 127, 128, 65536, (u64::MAX), -1, -32, -33, (i64::MIN)],
        "f": [1.5, -0.25, (f64::INFINITY)],
        "s": ["", "tessera", "é😀"],
        "b": (vec![0u8, 1, 255]),
        "nested": [[], {}, { "x": [null, true, false] }]
    });
    let bytes = to_vec(&v).unwrap();
    assert_eq!(from_slice(&bytes).unwrap(), v);
}

#[test]
fn writer_reproduces_smallest_encodings() {
    let bytes = [0x82, 0xa1, b'k', 0xc0, 0xa1, b'n', 0xd1, 0xff, 0x38];
    let mut tee = Tee::new(MsgPackWriter::new(), Recorder::new());
    parse_into(&bytes, &mut tee).unwrap();
    let (writer, _) = tee.into_inner();
    assert_eq!(writer.into_bytes(), bytes);
}

#[test]
fn unsized_containers_are_counted() {
    let mut w = MsgPackWriter::new();
    tessera_json::parse_into(br#"{"a":[1,2,3],"b":{}}"#, &mut w).unwrap();
    let bytes = w.into_bytes();
    assert_eq!(
        bytes,
        [0x82, 0xa1, b'a', 0x93, 0x01, 0x02, 0x03, 0xa1, b'b', 0x80]
    );
}

#[test]
fn uninitialized_values_cannot_be_encoded() {
    assert_eq!(
        to_vec(&value!([(Value::Uninitialized)])),
        Err(EventError::Uninitialized)
    );
}

#[test]
fn reader_and_file() {
    assert_eq!(from_reader(&[0xc3][..]).unwrap(), true);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0x81, 0xa1, b'x', 0x0a]).unwrap();
    file.flush().unwrap();
    assert_eq!(from_file(file.path()).unwrap(), value!({ "x": 10 }));
}
