//! First bytes of MessagePack items and the headers they introduce.

use std::borrow::Cow;

use tessera_format::{Input, ParseError};

pub(crate) const EOF: &str = "unexpected end of msgpack input";

pub(crate) const NIL: u8 = 0xc0;
pub(crate) const RESERVED: u8 = 0xc1;
pub(crate) const FALSE: u8 = 0xc2;
pub(crate) const TRUE: u8 = 0xc3;
pub(crate) const BIN8: u8 = 0xc4;
pub(crate) const BIN16: u8 = 0xc5;
pub(crate) const BIN32: u8 = 0xc6;
pub(crate) const EXT8: u8 = 0xc7;
pub(crate) const EXT16: u8 = 0xc8;
pub(crate) const EXT32: u8 = 0xc9;
pub(crate) const FLOAT32: u8 = 0xca;
pub(crate) const FLOAT64: u8 = 0xcb;
pub(crate) const UINT8: u8 = 0xcc;
pub(crate) const UINT16: u8 = 0xcd;
pub(crate) const UINT32: u8 = 0xce;
pub(crate) const UINT64: u8 = 0xcf;
pub(crate) const INT8: u8 = 0xd0;
pub(crate) const INT16: u8 = 0xd1;
pub(crate) const INT32: u8 = 0xd2;
pub(crate) const INT64: u8 = 0xd3;
pub(crate) const FIXEXT1: u8 = 0xd4;
pub(crate) const FIXEXT16: u8 = 0xd8;
pub(crate) const STR8: u8 = 0xd9;
pub(crate) const STR16: u8 = 0xda;
pub(crate) const STR32: u8 = 0xdb;
pub(crate) const ARRAY16: u8 = 0xdc;
pub(crate) const ARRAY32: u8 = 0xdd;
pub(crate) const MAP16: u8 = 0xde;
pub(crate) const MAP32: u8 = 0xdf;

pub(crate) const FIXMAP: u8 = 0x80;
pub(crate) const FIXARRAY: u8 = 0x90;
pub(crate) const FIXSTR: u8 = 0xa0;

/// An item header: scalars carry their value, everything else the length
/// of what follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Head {
    Nil,
    Boolean(bool),
    Unsigned(u64),
    Signed(i64),
    Double(f64),
    Str(usize),
    Bin(usize),
    Array(usize),
    Map(usize),
    /// An extension; the payload (type byte included) is this many bytes.
    Ext(usize),
}

fn len(input: &mut Input<'_>, width: usize) -> Result<usize, ParseError> {
    let at = input.offset();
    let n = input.read_be(width, EOF)?;
    usize::try_from(n).map_err(|_| ParseError::overflow(at, "msgpack size exceeds usize"))
}

/// Consume the header of the item at the cursor.
pub(crate) fn head(input: &mut Input<'_>) -> Result<Head, ParseError> {
    let at = input.offset();
    let Some(byte) = input.next_byte() else {
        return Err(ParseError::eof(at, EOF));
    };
    Ok(match byte {
        0x00..=0x7f => Head::Unsigned(u64::from(byte)),
        0x80..=0x8f => Head::Map(usize::from(byte & 0x0f)),
        0x90..=0x9f => Head::Array(usize::from(byte & 0x0f)),
        0xa0..=0xbf => Head::Str(usize::from(byte & 0x1f)),
        0xe0..=0xff => Head::Signed(i64::from(byte as i8)),
        NIL => Head::Nil,
        RESERVED => return Err(ParseError::syntax(at, "reserved byte 0xc1")),
        FALSE => Head::Boolean(false),
        TRUE => Head::Boolean(true),
        BIN8 => Head::Bin(len(input, 1)?),
        BIN16 => Head::Bin(len(input, 2)?),
        BIN32 => Head::Bin(len(input, 4)?),
        EXT8 => Head::Ext(len(input, 1)? + 1),
        EXT16 => Head::Ext(len(input, 2)? + 1),
        EXT32 => Head::Ext(len(input, 4)?.saturating_add(1)),
        FLOAT32 => Head::Double(f64::from(f32::from_bits(input.read_be(4, EOF)? as u32))),
        FLOAT64 => Head::Double(f64::from_bits(input.read_be(8, EOF)?)),
        UINT8 => Head::Unsigned(input.read_be(1, EOF)?),
        UINT16 => Head::Unsigned(input.read_be(2, EOF)?),
        UINT32 => Head::Unsigned(input.read_be(4, EOF)?),
        UINT64 => Head::Unsigned(input.read_be(8, EOF)?),
        INT8 => Head::Signed(i64::from(input.read_be(1, EOF)? as u8 as i8)),
        INT16 => Head::Signed(i64::from(input.read_be(2, EOF)? as u16 as i16)),
        INT32 => Head::Signed(i64::from(input.read_be(4, EOF)? as u32 as i32)),
        INT64 => Head::Signed(input.read_be(8, EOF)? as i64),
        FIXEXT1..=FIXEXT16 => Head::Ext(1 + (1usize << (byte - FIXEXT1))),
        STR8 => Head::Str(len(input, 1)?),
        STR16 => Head::Str(len(input, 2)?),
        STR32 => Head::Str(len(input, 4)?),
        ARRAY16 => Head::Array(len(input, 2)?),
        ARRAY32 => Head::Array(len(input, 4)?),
        MAP16 => Head::Map(len(input, 2)?),
        MAP32 => Head::Map(len(input, 4)?),
    })
}

/// Consume `len` bytes of string data and check them for UTF-8.
pub(crate) fn text<'de>(input: &mut Input<'de>, len: usize) -> Result<Cow<'de, str>, ParseError> {
    let start = input.offset();
    let raw = input.require(len, EOF)?;
    core::str::from_utf8(raw).map(Cow::Borrowed).map_err(|e| {
        ParseError::invalid_utf8(start + e.valid_up_to(), e.error_len().unwrap_or(1))
    })
}

/// Check a container length against the bytes left: every entry takes at
/// least `min_entry` bytes.
pub(crate) fn check_entries(
    input: &Input<'_>,
    at: usize,
    len: usize,
    min_entry: usize,
) -> Result<(), ParseError> {
    if len.saturating_mul(min_entry) > input.remaining() {
        Err(ParseError::eof(at, EOF))
    } else {
        Ok(())
    }
}

/// Consume a map key, which must be a string.
pub(crate) fn key<'de>(input: &mut Input<'de>) -> Result<Cow<'de, str>, ParseError> {
    let at = input.offset();
    match head(input)? {
        Head::Str(len) => text(input, len),
        _ => Err(ParseError::syntax(at, "unexpected key type")),
    }
}

#[cfg(test)]
mod tests {
    use tessera_format::ParseErrorKind;

    use super::*;

    fn head_of(bytes: &[u8]) -> Head {
        let mut input = Input::new(bytes);
        let head = head(&mut input).unwrap();
        assert!(input.is_empty(), "{bytes:02x?} left {} bytes", input.remaining());
        head
    }

    #[test]
    fn integers() {
        assert_eq!(head_of(&[0x7f]), Head::Unsigned(127));
        assert_eq!(head_of(&[0xe0]), Head::Signed(-32));
        assert_eq!(head_of(&[0xff]), Head::Signed(-1));
        assert_eq!(head_of(&[UINT16, 0x01, 0x00]), Head::Unsigned(256));
        assert_eq!(head_of(&[INT8, 0x80]), Head::Signed(-128));
        assert_eq!(head_of(&[INT16, 0xff, 0x7f]), Head::Signed(-129));
        assert_eq!(
            head_of(&[INT64, 0x80, 0, 0, 0, 0, 0, 0, 0]),
            Head::Signed(i64::MIN)
        );
        assert_eq!(
            head_of(&[UINT64, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Head::Unsigned(u64::MAX)
        );
    }

    #[test]
    fn lengths() {
        assert_eq!(head_of(&[0x85]), Head::Map(5));
        assert_eq!(head_of(&[0x9f]), Head::Array(15));
        assert_eq!(head_of(&[0xbf]), Head::Str(31));
        assert_eq!(head_of(&[STR8, 200]), Head::Str(200));
        assert_eq!(head_of(&[ARRAY32, 0, 1, 0, 0]), Head::Array(65536));
        assert_eq!(head_of(&[EXT8, 3]), Head::Ext(4));
        assert_eq!(head_of(&[FIXEXT1]), Head::Ext(2));
        assert_eq!(head_of(&[FIXEXT16]), Head::Ext(17));
    }

    #[test]
    fn floats() {
        assert_eq!(head_of(&[FLOAT32, 0x3f, 0xc0, 0, 0]), Head::Double(1.5));
        assert_eq!(
            head_of(&[FLOAT64, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]),
            Head::Double(1.5)
        );
    }

    #[test]
    fn reserved_and_truncated() {
        let err = head(&mut Input::new(&[RESERVED])).unwrap_err();
        assert_eq!(err.kind.to_string(), "reserved byte 0xc1");
        let err = head(&mut Input::new(&[UINT32, 0])).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn keys_must_be_strings() {
        assert_eq!(key(&mut Input::new(&[0xa1, b'k'])).unwrap(), "k");
        let err = key(&mut Input::new(&[0x01])).unwrap_err();
        assert_eq!(err.kind.to_string(), "unexpected key type");
    }
}
