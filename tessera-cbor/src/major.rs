//! The initial byte of a data item and the argument that follows it.

use std::borrow::Cow;

use tessera_format::{Input, ParseError};

pub(crate) const EOF: &str = "unexpected end of cbor input";

/// Minor value marking an indefinite-length item (and, under major 7, the break).
pub(crate) const INDEFINITE: u8 = 31;

/// Ends an indefinite-length string, array or map.
pub(crate) const BREAK: u8 = 0xff;

/// The top three bits of an initial byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Major {
    Unsigned = 0,
    Negative = 1,
    Binary = 2,
    Text = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Simple = 7,
}

impl Major {
    pub(crate) const fn of(byte: u8) -> Self {
        match byte >> 5 {
            0 => Major::Unsigned,
            1 => Major::Negative,
            2 => Major::Binary,
            3 => Major::Text,
            4 => Major::Array,
            5 => Major::Map,
            6 => Major::Tag,
            _ => Major::Simple,
        }
    }

    /// The initial byte for this major type with `minor` in the low bits.
    pub(crate) const fn with(self, minor: u8) -> u8 {
        ((self as u8) << 5) | minor
    }
}

#[inline]
pub(crate) const fn minor(byte: u8) -> u8 {
    byte & 0x1f
}

/// The initial byte at the cursor, without consuming it.
#[inline]
pub(crate) fn peek(input: &Input<'_>) -> Result<u8, ParseError> {
    input
        .peek()
        .ok_or_else(|| ParseError::eof(input.offset(), EOF))
}

/// Consume the initial byte and its argument, returning the argument.
pub(crate) fn argument(input: &mut Input<'_>) -> Result<u64, ParseError> {
    let at = input.offset();
    match minor(peek(input)?) {
        n @ 0..=23 => {
            input.bump(1);
            Ok(u64::from(n))
        }
        n @ 24..=27 => {
            let width = 1usize << (n - 24);
            if input.remaining() <= width {
                return Err(ParseError::eof(at, EOF));
            }
            input.bump(1);
            input.read_be(width, EOF)
        }
        _ => Err(ParseError::syntax(
            at,
            "unexpected minor for number or length",
        )),
    }
}

/// Consume the initial byte and a length argument.
pub(crate) fn length(input: &mut Input<'_>) -> Result<usize, ParseError> {
    let at = input.offset();
    let n = argument(input)?;
    usize::try_from(n).map_err(|_| ParseError::overflow(at, "cbor size exceeds usize"))
}

/// A container length, checked against the bytes left: every entry takes at
/// least `min_entry` bytes.
pub(crate) fn container_length(input: &mut Input<'_>, min_entry: usize) -> Result<usize, ParseError> {
    let at = input.offset();
    let len = length(input)?;
    if len.saturating_mul(min_entry) > input.remaining() {
        return Err(ParseError::eof(at, EOF));
    }
    Ok(len)
}

/// The value of a negative integer whose argument is `n`: `-1 - n`.
pub(crate) fn negative(at: usize, n: u64) -> Result<i64, ParseError> {
    i64::try_from(n)
        .map(|n| -1 - n)
        .map_err(|_| ParseError::overflow(at, "negative integer overflow"))
}

pub(crate) fn utf8<'de>(raw: &'de [u8], offset: usize) -> Result<&'de str, ParseError> {
    core::str::from_utf8(raw).map_err(|e| {
        ParseError::invalid_utf8(offset + e.valid_up_to(), e.error_len().unwrap_or(1))
    })
}

/// Consume a byte or text string of type `major`, borrowing it when it is
/// definite-length and concatenating the chunks otherwise.
///
/// Chunks of an indefinite text string are each checked for UTF-8.
pub(crate) fn string_bytes<'de>(
    input: &mut Input<'de>,
    major: Major,
) -> Result<Cow<'de, [u8]>, ParseError> {
    if minor(peek(input)?) != INDEFINITE {
        let len = length(input)?;
        return input.require(len, EOF).map(Cow::Borrowed);
    }
    input.bump(1);
    let mut out = Vec::new();
    loop {
        let at = input.offset();
        let byte = peek(input)?;
        if byte == BREAK {
            input.bump(1);
            return Ok(Cow::Owned(out));
        }
        if Major::of(byte) != major || minor(byte) == INDEFINITE {
            return Err(ParseError::syntax(
                at,
                "non-matching fragment in indefinite length string",
            ));
        }
        let len = length(input)?;
        let start = input.offset();
        let chunk = input.require(len, EOF)?;
        if major == Major::Text {
            utf8(chunk, start)?;
        }
        out.extend_from_slice(chunk);
    }
}

/// Consume a text string.
pub(crate) fn text<'de>(input: &mut Input<'de>) -> Result<Cow<'de, str>, ParseError> {
    let at = input.offset();
    match string_bytes(input, Major::Text)? {
        Cow::Borrowed(raw) => utf8(raw, input.offset() - raw.len()).map(Cow::Borrowed),
        Cow::Owned(raw) => String::from_utf8(raw)
            .map(Cow::Owned)
            .map_err(|e| ParseError::invalid_utf8(at, e.utf8_error().error_len().unwrap_or(1))),
    }
}

/// Consume a map key: a text string, or a byte string holding UTF-8.
pub(crate) fn key<'de>(input: &mut Input<'de>) -> Result<Cow<'de, str>, ParseError> {
    let at = input.offset();
    match Major::of(peek(input)?) {
        Major::Text => text(input),
        Major::Binary => match string_bytes(input, Major::Binary)? {
            Cow::Borrowed(raw) => utf8(raw, input.offset() - raw.len()).map(Cow::Borrowed),
            Cow::Owned(raw) => String::from_utf8(raw).map(Cow::Owned).map_err(|e| {
                ParseError::invalid_utf8(at, e.utf8_error().error_len().unwrap_or(1))
            }),
        },
        _ => Err(ParseError::syntax(at, "non-string object key")),
    }
}

/// Consume any tags in front of the next data item.
pub(crate) fn skip_tags(input: &mut Input<'_>) -> Result<(), ParseError> {
    while Major::of(peek(input)?) == Major::Tag {
        argument(input)?;
    }
    Ok(())
}

/// Consume a float of `width` bytes; the cursor is at its initial byte.
pub(crate) fn float(input: &mut Input<'_>, width: usize) -> Result<f64, ParseError> {
    let at = input.offset();
    if input.remaining() <= width {
        return Err(ParseError::eof(at, EOF));
    }
    input.bump(1);
    let bits = input.read_be(width, EOF)?;
    Ok(match width {
        4 => f64::from(f32::from_bits(bits as u32)),
        _ => f64::from_bits(bits),
    })
}
