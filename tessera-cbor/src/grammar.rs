//! The CBOR data item grammar, reporting to a [`Consumer`].

use tessera_format::{AtOffset, Consumer, DepthGuard, Input, ParseError, ParseOptions};

use crate::major::{
    self, BREAK, INDEFINITE, Major, argument, container_length, minor, negative, peek,
};
use crate::{debug, trace};

/// Cursor plus nesting bookkeeping, shared by the push grammar and
/// [`CborPartsParser`](crate::CborPartsParser).
#[derive(Debug, Clone)]
pub(crate) struct Parser<'de> {
    pub(crate) input: Input<'de>,
    pub(crate) depth: DepthGuard,
}

impl<'de> Parser<'de> {
    pub(crate) fn new(bytes: &'de [u8], options: &ParseOptions) -> Self {
        Parser {
            input: Input::new(bytes),
            depth: DepthGuard::new(options),
        }
    }

    /// Match exactly one data item and nothing after it.
    pub(crate) fn document<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
    ) -> Result<(), ParseError> {
        self.value(consumer)?;
        self.finish()
    }

    pub(crate) fn finish(&self) -> Result<(), ParseError> {
        if self.input.is_empty() {
            Ok(())
        } else {
            debug!(offset = self.input.offset(), "trailing bytes after CBOR item");
            Err(ParseError::syntax(
                self.input.offset(),
                "unexpected bytes after cbor item",
            ))
        }
    }

    /// Match one data item. Tags count towards the nesting limit.
    pub(crate) fn value<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
    ) -> Result<(), ParseError> {
        let at = self.input.offset();
        let byte = peek(&self.input)?;
        match Major::of(byte) {
            Major::Unsigned => {
                let n = argument(&mut self.input)?;
                consumer.number_u64(n).at_offset(at)
            }
            Major::Negative => {
                let n = negative(at, argument(&mut self.input)?)?;
                consumer.number_i64(n).at_offset(at)
            }
            Major::Binary => {
                let bytes = major::string_bytes(&mut self.input, Major::Binary)?;
                consumer.binary(bytes).at_offset(at)
            }
            Major::Text => {
                let text = major::text(&mut self.input)?;
                consumer.string(text).at_offset(at)
            }
            Major::Array => self.array(consumer, byte),
            Major::Map => self.map(consumer, byte),
            Major::Tag => {
                self.depth.enter(at)?;
                argument(&mut self.input)?;
                self.value(consumer)?;
                self.depth.leave();
                Ok(())
            }
            Major::Simple => self.simple(consumer, byte),
        }
    }

    fn simple<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
        byte: u8,
    ) -> Result<(), ParseError> {
        let at = self.input.offset();
        let result = match minor(byte) {
            20 | 21 => {
                self.input.bump(1);
                consumer.boolean(byte == Major::Simple.with(21))
            }
            22 | 23 => {
                self.input.bump(1);
                consumer.null()
            }
            25 => {
                return Err(ParseError::unsupported(
                    at,
                    "half-precision floats are not supported",
                ));
            }
            26 => consumer.number_f64(major::float(&mut self.input, 4)?),
            27 => consumer.number_f64(major::float(&mut self.input, 8)?),
            _ => {
                return Err(ParseError::unsupported(at, "unsupported minor for major 7"));
            }
        };
        result.at_offset(at)
    }

    fn array<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
        byte: u8,
    ) -> Result<(), ParseError> {
        let at = self.input.offset();
        self.depth.enter(at)?;
        if minor(byte) == INDEFINITE {
            self.input.bump(1);
            trace!(offset = at, depth = self.depth.depth(), "begin indefinite array");
            consumer.begin_array(None).at_offset(at)?;
            while !self.at_break()? {
                self.value(consumer)?;
                consumer.element().at_offset(self.input.offset())?;
            }
            self.depth.leave();
            consumer.end_array(None).at_offset(self.input.offset() - 1)
        } else {
            let len = container_length(&mut self.input, 1)?;
            trace!(offset = at, len, depth = self.depth.depth(), "begin array");
            consumer.begin_array(Some(len)).at_offset(at)?;
            for _ in 0..len {
                self.value(consumer)?;
                consumer.element().at_offset(self.input.offset())?;
            }
            self.depth.leave();
            consumer.end_array(Some(len)).at_offset(self.input.offset())
        }
    }

    fn map<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
        byte: u8,
    ) -> Result<(), ParseError> {
        let at = self.input.offset();
        self.depth.enter(at)?;
        if minor(byte) == INDEFINITE {
            self.input.bump(1);
            trace!(offset = at, depth = self.depth.depth(), "begin indefinite map");
            consumer.begin_object(None).at_offset(at)?;
            while !self.at_break()? {
                self.member(consumer)?;
            }
            self.depth.leave();
            consumer.end_object(None).at_offset(self.input.offset() - 1)
        } else {
            let len = container_length(&mut self.input, 2)?;
            trace!(offset = at, len, depth = self.depth.depth(), "begin map");
            consumer.begin_object(Some(len)).at_offset(at)?;
            for _ in 0..len {
                self.member(consumer)?;
            }
            self.depth.leave();
            consumer.end_object(Some(len)).at_offset(self.input.offset())
        }
    }

    fn member<C: Consumer<'de> + ?Sized>(&mut self, consumer: &mut C) -> Result<(), ParseError> {
        let at = self.input.offset();
        let key = major::key(&mut self.input)?;
        consumer.key(key).at_offset(at)?;
        self.value(consumer)?;
        consumer.member().at_offset(self.input.offset())
    }

    /// Consume a break byte if one is next.
    pub(crate) fn at_break(&mut self) -> Result<bool, ParseError> {
        if peek(&self.input)? == BREAK {
            self.input.bump(1);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use tessera_format::{DebugEvents, Discard, ParseErrorKind};

    use super::*;

    fn events(bytes: &[u8]) -> Result<String, ParseError> {
        let mut out = String::new();
        Parser::new(bytes, &ParseOptions::default()).document(&mut DebugEvents::new(&mut out))?;
        Ok(out)
    }

    #[test]
    fn scalars() {
        assert_eq!(events(&[0x00]).unwrap(), "u64: 0\n");
        assert_eq!(events(&[0x20]).unwrap(), "i64: -1\n");
        assert_eq!(events(&[0xf4]).unwrap(), "boolean: false\n");
        assert_eq!(events(&[0xf5]).unwrap(), "boolean: true\n");
        assert_eq!(events(&[0xf6]).unwrap(), "null\n");
        assert_eq!(events(&[0xf7]).unwrap(), "null\n");
        assert_eq!(
            events(&[0xfa, 0x3f, 0xc0, 0x00, 0x00]).unwrap(),
            "f64: 1.5\n"
        );
        assert_eq!(
            events(&[0xfb, 0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18]).unwrap(),
            "f64: 3.141592653589793\n"
        );
        assert_eq!(events(&[0x43, 1, 2, 3]).unwrap(), "binary: 010203\n");
        assert_eq!(events(&[0x62, b'h', b'i']).unwrap(), "string: \"hi\"\n");
    }

    #[test]
    fn tags_are_skipped() {
        assert_eq!(events(&[0xc1, 0x1a, 0, 0, 0, 1]).unwrap(), "u64: 1\n");
        assert_eq!(events(&[0xd8, 0x20, 0xc0, 0x61, b'x']).unwrap(), "string: \"x\"\n");
    }

    #[test]
    fn simple_value_errors() {
        let err = events(&[0xf9, 0x3c, 0x00]).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Unsupported { .. }));
        let err = events(&[0xf8, 0x20]).unwrap_err();
        assert_eq!(err.kind.to_string(), "unsupported minor for major 7");
        let err = events(&[0xff]).unwrap_err();
        assert_eq!(err.kind.to_string(), "unsupported minor for major 7");
    }

    #[test]
    fn map_keys() {
        let out = events(&[0xa1, 0x61, b'a', 0x01]).unwrap();
        assert_eq!(out, "begin object 1\nkey: \"a\"\nu64: 1\nmember\nend object 1\n");
        let err = events(&[0xa1, 0x01, 0x01]).unwrap_err();
        assert_eq!(err.kind.to_string(), "non-string object key");
        assert_eq!(err.span.offset, 1);
    }

    #[test]
    fn truncation_is_eof() {
        for bytes in [
            &[][..],
            &[0x82, 0x01][..],
            &[0x9f, 0x01][..],
            &[0x62, b'a'][..],
            &[0xbf, 0x61, b'a'][..],
            &[0xfb, 0x00][..],
            &[0x7f, 0x61, b'a'][..],
        ] {
            let err = Parser::new(bytes, &ParseOptions::default())
                .document(&mut Discard)
                .unwrap_err();
            assert!(
                matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }),
                "{bytes:02x?}: {err}"
            );
        }
    }

    #[test]
    fn announced_length_beyond_input() {
        let err = events(&[0x9b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn trailing_bytes() {
        let err = events(&[0x01, 0x02]).unwrap_err();
        assert_eq!(err.kind.to_string(), "unexpected bytes after cbor item");
        assert_eq!(err.span.offset, 1);
    }

    #[test]
    fn depth_limit() {
        let options = ParseOptions::new().max_depth(2);
        assert!(Parser::new(&[0x81, 0x80], &options).document(&mut Discard).is_ok());
        let err = Parser::new(&[0x81, 0x81, 0x80], &options)
            .document(&mut Discard)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DepthLimitExceeded { limit: 2 });
    }
}
