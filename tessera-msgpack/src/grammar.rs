//! The MessagePack item grammar, reporting to a [`Consumer`].

use tessera_format::{AtOffset, Consumer, DepthGuard, Input, ParseError, ParseOptions};

use crate::format::{self, EOF, Head, check_entries, head};
use crate::{debug, trace};

/// Cursor plus nesting bookkeeping, shared by the push grammar and
/// [`MsgPackPartsParser`](crate::MsgPackPartsParser).
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

    /// Match exactly one item and nothing after it.
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
            debug!(offset = self.input.offset(), "trailing bytes after MessagePack item");
            Err(ParseError::syntax(
                self.input.offset(),
                "unexpected bytes after msgpack item",
            ))
        }
    }

    /// Match one item.
    ///
    /// Extension items are skipped and reported as `null`.
    pub(crate) fn value<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
    ) -> Result<(), ParseError> {
        let at = self.input.offset();
        match head(&mut self.input)? {
            Head::Nil => consumer.null(),
            Head::Boolean(v) => consumer.boolean(v),
            Head::Unsigned(v) => consumer.number_u64(v),
            Head::Signed(v) => consumer.number_i64(v),
            Head::Double(v) => consumer.number_f64(v),
            Head::Str(len) => {
                let text = format::text(&mut self.input, len)?;
                consumer.string(text)
            }
            Head::Bin(len) => {
                let bytes = self.input.require(len, EOF)?;
                consumer.binary(bytes.into())
            }
            Head::Ext(len) => {
                self.input.require(len, EOF)?;
                trace!(offset = at, len, "skipping extension");
                consumer.null()
            }
            Head::Array(len) => return self.array(consumer, at, len),
            Head::Map(len) => return self.map(consumer, at, len),
        }
        .at_offset(at)
    }

    fn array<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
        at: usize,
        len: usize,
    ) -> Result<(), ParseError> {
        check_entries(&self.input, at, len, 1)?;
        self.depth.enter(at)?;
        trace!(offset = at, len, depth = self.depth.depth(), "begin array");
        consumer.begin_array(Some(len)).at_offset(at)?;
        for _ in 0..len {
            self.value(consumer)?;
            consumer.element().at_offset(self.input.offset())?;
        }
        self.depth.leave();
        consumer.end_array(Some(len)).at_offset(self.input.offset())
    }

    fn map<C: Consumer<'de> + ?Sized>(
        &mut self,
        consumer: &mut C,
        at: usize,
        len: usize,
    ) -> Result<(), ParseError> {
        check_entries(&self.input, at, len, 2)?;
        self.depth.enter(at)?;
        trace!(offset = at, len, depth = self.depth.depth(), "begin map");
        consumer.begin_object(Some(len)).at_offset(at)?;
        for _ in 0..len {
            let key_at = self.input.offset();
            let key = format::key(&mut self.input)?;
            consumer.key(key).at_offset(key_at)?;
            self.value(consumer)?;
            consumer.member().at_offset(self.input.offset())?;
        }
        self.depth.leave();
        consumer.end_object(Some(len)).at_offset(self.input.offset())
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
        assert_eq!(events(&[0xc0]).unwrap(), "null\n");
        assert_eq!(events(&[0xc3]).unwrap(), "boolean: true\n");
        assert_eq!(events(&[0x05]).unwrap(), "u64: 5\n");
        assert_eq!(events(&[0xfb]).unwrap(), "i64: -5\n");
        assert_eq!(events(&[0xa2, b'h', b'i']).unwrap(), "string: \"hi\"\n");
        assert_eq!(events(&[0xc4, 0x02, 0xbe, 0xef]).unwrap(), "binary: beef\n");
    }

    #[test]
    fn extensions_become_null() {
        let out = events(&[0x92, 0xd4, 0x01, 0x02, 0xc7, 0x02, 0x05, 0xaa, 0xbb]).unwrap();
        assert_eq!(out, "begin array 2\nnull\nelement\nnull\nelement\nend array 2\n");
    }

    #[test]
    fn keys_must_be_strings() {
        let err = events(&[0x81, 0x01, 0x02]).unwrap_err();
        assert_eq!(err.kind.to_string(), "unexpected key type");
        assert_eq!(err.span.offset, 1);
    }

    #[test]
    fn truncation_is_eof() {
        for bytes in [
            &[][..],
            &[0x92, 0x01][..],
            &[0xa3, b'a'][..],
            &[0xc4, 0x05, 0x00][..],
            &[0xd4, 0x01][..],
            &[0xcb, 0x00][..],
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
    fn trailing_bytes_and_depth() {
        let err = events(&[0xc0, 0xc0]).unwrap_err();
        assert_eq!(err.kind.to_string(), "unexpected bytes after msgpack item");

        let options = ParseOptions::new().max_depth(1);
        let err = Parser::new(&[0x91, 0x90], &options)
            .document(&mut Discard)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DepthLimitExceeded { limit: 1 });
        assert_eq!(err.span.offset, 1);
    }
}
