//! String literals and whitespace.

use std::borrow::Cow;

use tessera_format::{Input, ParseError};

/// Whether a string literal is a value or an object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quoted {
    Value,
    Key,
}

impl Quoted {
    const fn unterminated(self) -> &'static str {
        match self {
            Quoted::Value => "unterminated string",
            Quoted::Key => "unterminated key",
        }
    }
}

/// Skip JSON whitespace: space, tab, line feed and carriage return.
#[inline]
pub(crate) fn skip_ws(input: &mut Input<'_>) {
    while matches!(input.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
        input.bump(1);
    }
}

fn utf8<'de>(raw: &'de [u8], offset: usize) -> Result<&'de str, ParseError> {
    core::str::from_utf8(raw).map_err(|e| {
        ParseError::invalid_utf8(offset + e.valid_up_to(), e.error_len().unwrap_or(1))
    })
}

/// Match a string literal at the cursor, which must be at the opening quote.
///
/// Literals without escapes are borrowed from the input; the others are
/// decoded into an owned string.
pub(crate) fn scan_string<'de>(
    input: &mut Input<'de>,
    quoted: Quoted,
) -> Result<Cow<'de, str>, ParseError> {
    let open = input.offset();
    debug_assert_eq!(input.peek(), Some(b'"'));
    input.bump(1);
    let start = input.offset();
    loop {
        match input.peek() {
            None => return Err(ParseError::eof(open, quoted.unterminated())),
            Some(b'"') => {
                let raw = input.since(start);
                input.bump(1);
                return utf8(raw, start).map(Cow::Borrowed);
            }
            Some(b'\\') => break,
            Some(0x00..=0x1f) => {
                return Err(ParseError::syntax(
                    input.offset(),
                    "invalid character in string",
                ));
            }
            Some(_) => input.bump(1),
        }
    }

    let mut out = String::with_capacity(input.offset() - start + 16);
    out.push_str(utf8(input.since(start), start)?);
    let mut run = input.offset();
    loop {
        match input.peek() {
            None => return Err(ParseError::eof(open, quoted.unterminated())),
            Some(b'"') => {
                out.push_str(utf8(input.since(run), run)?);
                input.bump(1);
                return Ok(Cow::Owned(out));
            }
            Some(b'\\') => {
                out.push_str(utf8(input.since(run), run)?);
                out.push(unescape(input, open, quoted)?);
                run = input.offset();
            }
            Some(0x00..=0x1f) => {
                return Err(ParseError::syntax(
                    input.offset(),
                    "invalid character in string",
                ));
            }
            Some(_) => input.bump(1),
        }
    }
}

/// Decode one escape sequence; the cursor is at the backslash.
fn unescape(input: &mut Input<'_>, open: usize, quoted: Quoted) -> Result<char, ParseError> {
    let at = input.offset();
    input.bump(1);
    let Some(b) = input.next_byte() else {
        return Err(ParseError::eof(open, quoted.unterminated()));
    };
    Ok(match b {
        b'"' => '"',
        b'\\' => '\\',
        b'/' => '/',
        b'b' => '\u{08}',
        b'f' => '\u{0c}',
        b'n' => '\n',
        b'r' => '\r',
        b't' => '\t',
        b'u' => {
            let unit = hex4(input)?;
            match unit {
                0xd800..=0xdbff => {
                    if !input.eat_slice(b"\\u") {
                        return Err(ParseError::syntax(at, "invalid unicode escape"));
                    }
                    let low = hex4(input)?;
                    if !(0xdc00..=0xdfff).contains(&low) {
                        return Err(ParseError::syntax(at, "invalid unicode escape"));
                    }
                    let high = u32::from(unit) - 0xd800;
                    let low = u32::from(low) - 0xdc00;
                    char::from_u32(0x10000 + (high << 10) + low)
                        .ok_or_else(|| ParseError::syntax(at, "invalid unicode escape"))?
                }
                0xdc00..=0xdfff => return Err(ParseError::syntax(at, "invalid unicode escape")),
                _ => char::from_u32(u32::from(unit))
                    .ok_or_else(|| ParseError::syntax(at, "invalid unicode escape"))?,
            }
        }
        _ => return Err(ParseError::syntax(at, "unknown escape sequence")),
    })
}

fn hex4(input: &mut Input<'_>) -> Result<u16, ParseError> {
    let mut unit = 0u16;
    for _ in 0..4 {
        let digit = input
            .peek()
            .and_then(|b| char::from(b).to_digit(16))
            .ok_or_else(|| {
                ParseError::syntax(input.offset(), "incomplete universal character name")
            })?;
        input.bump(1);
        unit = (unit << 4) | digit as u16;
    }
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(text: &str) -> Result<Cow<'_, str>, ParseError> {
        let mut input = Input::new(text.as_bytes());
        scan_string(&mut input, Quoted::Value)
    }

    #[test]
    fn plain_strings_are_borrowed() {
        assert!(matches!(string(r#""plain""#).unwrap(), Cow::Borrowed("plain")));
        assert!(matches!(string(r#""""#).unwrap(), Cow::Borrowed("")));
    }

    #[test]
    fn escapes_are_decoded() {
        let s = string(r#""a\"b\\c\/d\b\f\n\r\té😀""#).unwrap();
        assert!(matches!(s, Cow::Owned(_)));
        assert_eq!(s, "a\"b\\c/d\u{8}\u{c}\n\r\té😀");
    }

    #[test]
    fn escape_errors() {
        let message = |text: &str| string(text).unwrap_err().kind.to_string();
        assert_eq!(message(r#""\x""#), "unknown escape sequence");
        assert_eq!(message(r#""\u12""#), "incomplete universal character name");
        assert_eq!(message(r#""\ud800""#), "invalid unicode escape");
        assert_eq!(message(r#""\udc00""#), "invalid unicode escape");
        assert_eq!(message("\"tab\there\""), "invalid character in string");
        assert_eq!(message(r#""open"#), "unterminated string");
    }

    #[test]
    fn invalid_utf8_is_located() {
        let mut input = Input::new(b"\"ab\xff\"");
        let err = scan_string(&mut input, Quoted::Value).unwrap_err();
        assert_eq!(err.kind, tessera_format::ParseErrorKind::InvalidUtf8);
        assert_eq!(err.span.offset, 3);
    }

    #[test]
    fn keys_report_their_own_eof() {
        let mut input = Input::new(b"\"k");
        let err = scan_string(&mut input, Quoted::Key).unwrap_err();
        assert_eq!(err.kind.to_string(), "unterminated key");
    }
}
