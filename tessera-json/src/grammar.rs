//! The JSON text grammar (RFC 8259), reporting to a [`Consumer`].

use tessera_format::{AtOffset, Consumer, DepthGuard, Input, ParseError, ParseOptions};

use crate::number::{Number, scan_number};
use crate::string::{Quoted, scan_string, skip_ws};
use crate::{debug, trace};

/// Cursor plus nesting bookkeeping, shared by the push grammar and
/// [`JsonPartsParser`](crate::JsonPartsParser).
#[derive(Debug, Clone)]
pub(crate) struct Parser<'de> {
    pub(crate) input: Input<'de>,
    pub(crate) depth: DepthGuard,
}

/// An error at the cursor: end of input if nothing is left, syntax otherwise.
pub(crate) fn expected(input: &Input<'_>, what: &'static str) -> ParseError {
    if input.is_empty() {
        ParseError::eof(input.offset(), what)
    } else {
        ParseError::syntax(input.offset(), what)
    }
}

pub(crate) fn emit_number<'de, C: Consumer<'de> + ?Sized>(
    number: Number,
    consumer: &mut C,
    at: usize,
) -> Result<(), ParseError> {
    match number {
        Number::Unsigned(u) => consumer.number_u64(u),
        Number::Signed(i) => consumer.number_i64(i),
        Number::Double(d) => consumer.number_f64(d),
    }
    .at_offset(at)
}

impl<'de> Parser<'de> {
    pub(crate) fn new(bytes: &'de [u8], options: &ParseOptions) -> Self {
        Parser {
            input: Input::new(bytes),
            depth: DepthGuard::new(options),
        }
    }

    /// Match exactly one JSON text: a value surrounded by whitespace.
    pub(crate) fn text<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
    ) -> Result<(), ParseError> {
        skip_ws(&mut self.input);
        if !self.starts_value() {
            return Err(expected(&self.input, "no valid JSON"));
        }
        self.value(consumer)?;
        self.finish()
    }

    /// Check that only whitespace is left.
    pub(crate) fn finish(&mut self) -> Result<(), ParseError> {
        skip_ws(&mut self.input);
        if self.input.is_empty() {
            Ok(())
        } else {
            debug!(offset = self.input.offset(), "trailing input after JSON value");
            Err(ParseError::syntax(
                self.input.offset(),
                "unexpected character after JSON value",
            ))
        }
    }

    fn starts_value(&self) -> bool {
        matches!(
            self.input.peek(),
            Some(b'"' | b'{' | b'[' | b'n' | b't' | b'f' | b'-' | b'0'..=b'9')
        )
    }

    /// Match one value; the cursor is past any leading whitespace.
    pub(crate) fn value<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
    ) -> Result<(), ParseError> {
        let at = self.input.offset();
        match self.input.peek() {
            Some(b'"') => {
                let s = scan_string(&mut self.input, Quoted::Value)?;
                consumer.string(s).at_offset(at)
            }
            Some(b'{') => self.object(consumer),
            Some(b'[') => self.array(consumer),
            Some(b'n') if self.input.eat_slice(b"null") => consumer.null().at_offset(at),
            Some(b't') if self.input.eat_slice(b"true") => consumer.boolean(true).at_offset(at),
            Some(b'f') if self.input.eat_slice(b"false") => consumer.boolean(false).at_offset(at),
            Some(b'-' | b'0'..=b'9') => {
                let number = scan_number(&mut self.input)?;
                emit_number(number, consumer, at)
            }
            _ => Err(expected(&self.input, "expected value")),
        }
    }

    fn array<C: Consumer<'de> + ?Sized>(&mut self, consumer: &mut C) -> Result<(), ParseError> {
        let at = self.input.offset();
        self.depth.enter(at)?;
        self.input.bump(1);
        trace!(offset = at, depth = self.depth.depth(), "begin array");
        consumer.begin_array(None).at_offset(at)?;

        skip_ws(&mut self.input);
        if !self.input.eat(b']') {
            loop {
                self.value(consumer)?;
                consumer.element().at_offset(self.input.offset())?;
                skip_ws(&mut self.input);
                if self.input.eat(b',') {
                    skip_ws(&mut self.input);
                } else if self.input.eat(b']') {
                    break;
                } else {
                    return Err(expected(&self.input, "incomplete array, expected ']'"));
                }
            }
        }

        let end = self.input.offset() - 1;
        self.depth.leave();
        trace!(offset = end, "end array");
        consumer.end_array(None).at_offset(end)
    }

    fn object<C: Consumer<'de> + ?Sized>(&mut self, consumer: &mut C) -> Result<(), ParseError> {
        let at = self.input.offset();
        self.depth.enter(at)?;
        self.input.bump(1);
        trace!(offset = at, depth = self.depth.depth(), "begin object");
        consumer.begin_object(None).at_offset(at)?;

        skip_ws(&mut self.input);
        if !self.input.eat(b'}') {
            loop {
                self.member_key(consumer)?;
                skip_ws(&mut self.input);
                self.value(consumer)?;
                consumer.member().at_offset(self.input.offset())?;
                skip_ws(&mut self.input);
                if self.input.eat(b',') {
                    skip_ws(&mut self.input);
                } else if self.input.eat(b'}') {
                    break;
                } else {
                    return Err(expected(&self.input, "incomplete object, expected '}'"));
                }
            }
        }

        let end = self.input.offset() - 1;
        self.depth.leave();
        trace!(offset = end, "end object");
        consumer.end_object(None).at_offset(end)
    }

    /// Match a key and the `:` after it.
    fn member_key<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
    ) -> Result<(), ParseError> {
        let at = self.input.offset();
        let key = self.key()?;
        consumer.key(key).at_offset(at)
    }

    /// Match a quoted key and the name separator.
    pub(crate) fn key(&mut self) -> Result<std::borrow::Cow<'de, str>, ParseError> {
        if self.input.peek() != Some(b'"') {
            return Err(expected(&self.input, "expected member"));
        }
        let key = scan_string(&mut self.input, Quoted::Key)?;
        skip_ws(&mut self.input);
        if !self.input.eat(b':') {
            return Err(expected(&self.input, "expected ':'"));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use tessera_format::{Discard, ParseErrorKind};

    use super::*;

    fn check(text: &str) -> Result<(), ParseError> {
        Parser::new(text.as_bytes(), &ParseOptions::default()).text(&mut Discard)
    }

    #[test]
    fn accepts_valid_texts() {
        for text in [
            "null",
            " true ",
            "[]",
            "{}",
            "[1, -2.5e3, \"x\", [[]], {\"a\": {}}]",
            "\r\n\t{\"k\" : [null]}\n",
        ] {
            check(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        }
    }

    #[test]
    fn error_messages() {
        let message = |text: &str| check(text).unwrap_err().kind.to_string();
        assert_eq!(message(""), "no valid JSON");
        assert_eq!(message("  x"), "no valid JSON");
        assert_eq!(message("[1,]"), "expected value");
        assert_eq!(message("[1 2]"), "incomplete array, expected ']'");
        assert_eq!(message("{\"a\":1 \"b\"}"), "incomplete object, expected '}'");
        assert_eq!(message("{1:2}"), "expected member");
        assert_eq!(message("{\"a\" 1}"), "expected ':'");
        assert_eq!(message("nul"), "expected value");
        assert_eq!(message("1 2"), "unexpected character after JSON value");
        assert_eq!(message("01"), "invalid leading zero");
    }

    #[test]
    fn truncated_input_is_eof() {
        for text in ["[", "[1,", "{\"a\":", "{\"a\":1"] {
            let err = check(text).unwrap_err();
            assert!(
                matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }),
                "{text}: {err}"
            );
        }
    }

    #[test]
    fn depth_limit() {
        let options = ParseOptions::new().max_depth(3);
        let ok = Parser::new(b"[[[]]]", &options).text(&mut Discard);
        assert!(ok.is_ok());
        let err = Parser::new(b"[[[[]]]]", &options)
            .text(&mut Discard)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DepthLimitExceeded { limit: 3 });
        assert_eq!(err.span.offset, 3);
    }
}
