//! Pull-style MessagePack decoding.

use std::borrow::Cow;

use tessera_format::{ContainerState, Discard, Marker, ParseError, ParseOptions, PartsParser};

use crate::format::{self, EOF, Head, check_entries, head};
use crate::grammar::Parser;

/// A [`PartsParser`] over a MessagePack item.
///
/// Every MessagePack container announces its entry count, so arrays and
/// maps always hand out a sized [`ContainerState`]. A token of the wrong
/// type fails without consuming anything.
///
/// ```
/// use tessera_format::PartsParser;
/// use tessera_msgpack::MsgPackPartsParser;
///
/// // {"id": 7, "ok": true}
/// let bytes = [0x82, 0xa2, b'i', b'd', 0x07, 0xa2, b'o', b'k', 0xc3];
/// let mut p = MsgPackPartsParser::new(&bytes);
/// let mut object = p.begin_object().unwrap();
/// p.member(&mut object).unwrap();
/// assert_eq!(p.key().unwrap(), "id");
/// assert_eq!(p.number_unsigned().unwrap(), 7);
/// p.member(&mut object).unwrap();
/// assert_eq!(p.key().unwrap(), "ok");
/// assert!(p.boolean().unwrap());
/// p.end_object(object).unwrap();
/// p.finish().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackPartsParser<'de> {
    parser: Parser<'de>,
}

impl<'de> MsgPackPartsParser<'de> {
    /// Start at the beginning of `input`.
    pub fn new(input: &'de [u8]) -> Self {
        MsgPackPartsParser::with_options(input, &ParseOptions::default())
    }

    /// Start at the beginning of `input` with explicit options.
    pub fn with_options(input: &'de [u8], options: &ParseOptions) -> Self {
        MsgPackPartsParser {
            parser: Parser::new(input, options),
        }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.parser.input.offset()
    }

    /// Read the next header and hand it to `f`; if `f` declines, put the
    /// header back and fail with `what`.
    fn token<T>(
        &mut self,
        what: &'static str,
        f: impl FnOnce(Head) -> Option<T>,
    ) -> Result<T, ParseError> {
        let marker = self.mark();
        match f(head(&mut self.parser.input)?) {
            Some(v) => Ok(v),
            None => {
                self.rewind(marker);
                Err(ParseError::syntax(marker.offset(), what))
            }
        }
    }

    fn begin(
        &mut self,
        what: &'static str,
        f: impl FnOnce(Head) -> Option<usize>,
        min_entry: usize,
    ) -> Result<ContainerState, ParseError> {
        let at = self.offset();
        let len = self.token(what, f)?;
        check_entries(&self.parser.input, at, len, min_entry)?;
        self.parser.depth.enter(at)?;
        Ok(ContainerState::sized(len))
    }

    fn next(&mut self, state: &mut ContainerState, end: &'static str) -> Result<(), ParseError> {
        if state.next_sized() == Some(true) {
            Ok(())
        } else {
            Err(ParseError::syntax(self.offset(), end))
        }
    }

    fn next_or_end(&mut self, state: &mut ContainerState) -> bool {
        let more = state.next_sized() == Some(true);
        if !more {
            self.parser.depth.leave();
        }
        more
    }

    fn end(&mut self, state: ContainerState, mismatch: &'static str) -> Result<(), ParseError> {
        if state.size != Some(state.index) {
            return Err(ParseError::syntax(self.offset(), mismatch));
        }
        self.parser.depth.leave();
        Ok(())
    }
}

impl<'de> PartsParser<'de> for MsgPackPartsParser<'de> {
    fn null(&mut self) -> Result<bool, ParseError> {
        match self.parser.input.peek() {
            Some(format::NIL) => {
                self.parser.input.bump(1);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(ParseError::eof(self.offset(), EOF)),
        }
    }

    fn boolean(&mut self) -> Result<bool, ParseError> {
        self.token("expected boolean", |head| match head {
            Head::Boolean(v) => Some(v),
            _ => None,
        })
    }

    fn number_signed(&mut self) -> Result<i64, ParseError> {
        let at = self.offset();
        let n = self.token("expected signed number", |head| match head {
            Head::Signed(v) => Some(Ok(v)),
            Head::Unsigned(v) => Some(i64::try_from(v).map_err(|_| ())),
            _ => None,
        })?;
        n.map_err(|()| ParseError::overflow(at, "positive integer overflow"))
    }

    fn number_unsigned(&mut self) -> Result<u64, ParseError> {
        let at = self.offset();
        let n = self.token("expected positive number", |head| match head {
            Head::Unsigned(v) => Some(Ok(v)),
            Head::Signed(v) => Some(u64::try_from(v).map_err(|_| ())),
            _ => None,
        })?;
        n.map_err(|()| ParseError::overflow(at, "negative number for unsigned"))
    }

    fn number_double(&mut self) -> Result<f64, ParseError> {
        self.token("expected floating point number", |head| match head {
            Head::Double(v) => Some(v),
            Head::Unsigned(v) => Some(v as f64),
            Head::Signed(v) => Some(v as f64),
            _ => None,
        })
    }

    fn string(&mut self) -> Result<Cow<'de, str>, ParseError> {
        let len = self.token("expected string", |head| match head {
            Head::Str(len) => Some(len),
            _ => None,
        })?;
        format::text(&mut self.parser.input, len)
    }

    fn binary(&mut self) -> Result<Cow<'de, [u8]>, ParseError> {
        let len = self.token("expected binary data", |head| match head {
            Head::Bin(len) => Some(len),
            _ => None,
        })?;
        self.parser.input.require(len, EOF).map(Cow::Borrowed)
    }

    fn key(&mut self) -> Result<Cow<'de, str>, ParseError> {
        format::key(&mut self.parser.input)
    }

    fn begin_array(&mut self) -> Result<ContainerState, ParseError> {
        self.begin(
            "expected array",
            |head| match head {
                Head::Array(len) => Some(len),
                _ => None,
            },
            1,
        )
    }

    fn element(&mut self, state: &mut ContainerState) -> Result<(), ParseError> {
        self.next(state, "unexpected array end")
    }

    fn element_or_end_array(&mut self, state: &mut ContainerState) -> Result<bool, ParseError> {
        Ok(self.next_or_end(state))
    }

    fn end_array(&mut self, state: ContainerState) -> Result<(), ParseError> {
        self.end(state, "array size mismatch")
    }

    fn begin_object(&mut self) -> Result<ContainerState, ParseError> {
        self.begin(
            "expected object",
            |head| match head {
                Head::Map(len) => Some(len),
                _ => None,
            },
            2,
        )
    }

    fn member(&mut self, state: &mut ContainerState) -> Result<(), ParseError> {
        self.next(state, "unexpected object end")
    }

    fn member_or_end_object(&mut self, state: &mut ContainerState) -> Result<bool, ParseError> {
        Ok(self.next_or_end(state))
    }

    fn end_object(&mut self, state: ContainerState) -> Result<(), ParseError> {
        self.end(state, "object size mismatch")
    }

    fn skip_value(&mut self) -> Result<(), ParseError> {
        self.parser.value(&mut Discard)
    }

    fn mark(&self) -> Marker {
        self.parser.input.mark().with_depth(self.parser.depth.depth())
    }

    fn rewind(&mut self, marker: Marker) {
        self.parser.input.rewind(marker);
        self.parser.depth.restore(marker);
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.parser.finish()
    }
}

#[cfg(test)]
mod tests {
    use tessera_format::ParseErrorKind;

    use super::*;

    #[test]
    fn walk_an_array() {
        let bytes = [0x93, 0x01, 0xc0, 0xa3, b'a', b'b', b'c'];
        let mut p = MsgPackPartsParser::new(&bytes);
        let mut a = p.begin_array().unwrap();
        p.element(&mut a).unwrap();
        assert!(!p.null().unwrap());
        assert_eq!(p.number_signed().unwrap(), 1);
        p.element(&mut a).unwrap();
        assert!(p.null().unwrap());
        assert!(p.element_or_end_array(&mut a).unwrap());
        assert_eq!(p.string().unwrap(), "abc");
        assert!(!p.element_or_end_array(&mut a).unwrap());
        p.finish().unwrap();
        assert_eq!(a.index, 3);
    }

    #[test]
    fn wrong_token_does_not_consume() {
        let mut p = MsgPackPartsParser::new(&[0xa1, b'x']);
        let err = p.boolean().unwrap_err();
        assert_eq!(err.kind.to_string(), "expected boolean");
        assert_eq!(p.offset(), 0);
        let err = p.begin_array().unwrap_err();
        assert_eq!(err.kind.to_string(), "expected array");
        assert_eq!(p.string().unwrap(), "x");
    }

    #[test]
    fn failed_attempt_restores_depth() {
        let options = ParseOptions::new().max_depth(1);
        let bytes = [0x91, 0xa1, b'a'];
        let mut p = MsgPackPartsParser::with_options(&bytes, &options);
        let err = p
            .attempt(|p| {
                let mut a = p.begin_array()?;
                p.element(&mut a)?;
                p.number_unsigned()
            })
            .unwrap_err();
        assert_eq!(err.kind.to_string(), "expected positive number");
        assert_eq!(p.offset(), 0);

        let mut a = p.begin_array().unwrap();
        p.element(&mut a).unwrap();
        assert_eq!(p.string().unwrap(), "a");
        p.end_array(a).unwrap();
        p.finish().unwrap();
    }

    #[test]
    fn counts_are_enforced() {
        let mut p = MsgPackPartsParser::new(&[0x92, 0x01, 0x02]);
        let mut a = p.begin_array().unwrap();
        p.element(&mut a).unwrap();
        p.skip_value().unwrap();
        let err = p.end_array(a).unwrap_err();
        assert_eq!(err.kind.to_string(), "array size mismatch");

        let mut p = MsgPackPartsParser::new(&[0x80]);
        let mut o = p.begin_object().unwrap();
        let err = p.member(&mut o).unwrap_err();
        assert_eq!(err.kind.to_string(), "unexpected object end");
        p.end_object(o).unwrap();
    }

    #[test]
    fn integer_ranges() {
        let max = [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        let mut p = MsgPackPartsParser::new(&max);
        let err = p.attempt(|p| p.number_signed()).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::NumericOverflow {
                what: "positive integer overflow"
            }
        );
        assert_eq!(p.offset(), 0);
        assert_eq!(p.number_unsigned().unwrap(), u64::MAX);

        let mut p = MsgPackPartsParser::new(&[0xff]);
        assert!(p.attempt(|p| p.number_unsigned()).is_err());
        assert_eq!(p.number_double().unwrap(), -1.0);

        let mut p = MsgPackPartsParser::new(&[0xd0, 0x05]);
        assert_eq!(p.number_unsigned().unwrap(), 5);
    }

    #[test]
    fn binary_and_keys() {
        let mut p = MsgPackPartsParser::new(&[0xc4, 0x02, 0xca, 0xfe]);
        assert_eq!(p.binary().unwrap().as_ref(), &[0xca, 0xfe]);
        p.finish().unwrap();

        let mut p = MsgPackPartsParser::new(&[0x81, 0x01, 0x01]);
        let mut o = p.begin_object().unwrap();
        p.member(&mut o).unwrap();
        let err = p.key().unwrap_err();
        assert_eq!(err.kind.to_string(), "unexpected key type");
    }
}
