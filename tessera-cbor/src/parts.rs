//! Pull-style CBOR decoding.

use std::borrow::Cow;

use tessera_format::{ContainerState, Discard, Marker, ParseError, ParseOptions, PartsParser};

use crate::grammar::Parser;
use crate::major::{
    self, BREAK, INDEFINITE, Major, argument, container_length, minor, negative, peek,
};

const NULL: u8 = Major::Simple.with(22);
const FALSE: u8 = Major::Simple.with(20);
const TRUE: u8 = Major::Simple.with(21);

/// A [`PartsParser`] over a CBOR data item.
///
/// Definite-length containers hand out a sized [`ContainerState`] and are
/// checked against their count; indefinite ones look for the break byte.
///
/// ```
/// use tessera_format::PartsParser;
/// use tessera_cbor::CborPartsParser;
///
/// // {"id": 7, "tags": ["a", "b"]} with an indefinite-length tag list
/// let bytes = [
///     0xa2, 0x62, b'i', b'd', 0x07, 0x64, b't', b'a', b'g', b's',
///     0x9f, 0x61, b'a', 0x61, b'b', 0xff,
/// ];
/// let mut p = CborPartsParser::new(&bytes);
/// let mut object = p.begin_object().unwrap();
/// let mut tags = Vec::new();
/// while p.member_or_end_object(&mut object).unwrap() {
///     match p.key().unwrap().as_ref() {
///         "id" => assert_eq!(p.number_unsigned().unwrap(), 7),
///         "tags" => {
///             let mut array = p.begin_array().unwrap();
///             while p.element_or_end_array(&mut array).unwrap() {
///                 tags.push(p.string().unwrap().into_owned());
///             }
///         }
///         _ => p.skip_value().unwrap(),
///     }
/// }
/// p.finish().unwrap();
/// assert_eq!(tags, ["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct CborPartsParser<'de> {
    parser: Parser<'de>,
}

impl<'de> CborPartsParser<'de> {
    /// Start at the beginning of `input`.
    pub fn new(input: &'de [u8]) -> Self {
        CborPartsParser::with_options(input, &ParseOptions::default())
    }

    /// Start at the beginning of `input` with explicit options.
    pub fn with_options(input: &'de [u8], options: &ParseOptions) -> Self {
        CborPartsParser {
            parser: Parser::new(input, options),
        }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.parser.input.offset()
    }

    /// Skip tags and return the initial byte of the next data item.
    fn item(&mut self) -> Result<u8, ParseError> {
        major::skip_tags(&mut self.parser.input)?;
        peek(&self.parser.input)
    }

    /// Skip tags and check that the next data item has major type `major`.
    fn expect(&mut self, major: Major, what: &'static str) -> Result<u8, ParseError> {
        let byte = self.item()?;
        if Major::of(byte) == major {
            Ok(byte)
        } else {
            Err(ParseError::syntax(self.offset(), what))
        }
    }

    fn begin(&mut self, major: Major, what: &'static str) -> Result<ContainerState, ParseError> {
        let byte = self.expect(major, what)?;
        let at = self.offset();
        let state = if minor(byte) == INDEFINITE {
            self.parser.input.bump(1);
            ContainerState::open_ended()
        } else {
            let min_entry = if major == Major::Map { 2 } else { 1 };
            ContainerState::sized(container_length(&mut self.parser.input, min_entry)?)
        };
        self.parser.depth.enter(at)?;
        Ok(state)
    }

    fn next(&mut self, state: &mut ContainerState, end: &'static str) -> Result<(), ParseError> {
        let more = match state.next_sized() {
            Some(more) => more,
            None => {
                state.index += 1;
                peek(&self.parser.input)? != BREAK
            }
        };
        if more {
            Ok(())
        } else {
            Err(ParseError::syntax(self.offset(), end))
        }
    }

    fn next_or_end(&mut self, state: &mut ContainerState) -> Result<bool, ParseError> {
        let more = match state.next_sized() {
            Some(more) => more,
            None if self.parser.at_break()? => false,
            None => {
                state.index += 1;
                true
            }
        };
        if !more {
            self.parser.depth.leave();
        }
        Ok(more)
    }

    fn end(
        &mut self,
        state: ContainerState,
        mismatch: &'static str,
        not_at_end: &'static str,
    ) -> Result<(), ParseError> {
        match state.size {
            Some(size) if size != state.index => {
                return Err(ParseError::syntax(self.offset(), mismatch));
            }
            Some(_) => {}
            None if self.parser.at_break()? => {}
            None => return Err(ParseError::syntax(self.offset(), not_at_end)),
        }
        self.parser.depth.leave();
        Ok(())
    }
}

impl<'de> PartsParser<'de> for CborPartsParser<'de> {
    fn null(&mut self) -> Result<bool, ParseError> {
        let marker = self.mark();
        if self.item()? == NULL {
            self.parser.input.bump(1);
            Ok(true)
        } else {
            self.rewind(marker);
            Ok(false)
        }
    }

    fn boolean(&mut self) -> Result<bool, ParseError> {
        let byte = self.item()?;
        if byte == FALSE || byte == TRUE {
            self.parser.input.bump(1);
            Ok(byte == TRUE)
        } else {
            Err(ParseError::syntax(self.offset(), "expected boolean"))
        }
    }

    fn number_signed(&mut self) -> Result<i64, ParseError> {
        let byte = self.item()?;
        let at = self.offset();
        match Major::of(byte) {
            Major::Unsigned => i64::try_from(argument(&mut self.parser.input)?)
                .map_err(|_| ParseError::overflow(at, "positive integer overflow")),
            Major::Negative => negative(at, argument(&mut self.parser.input)?),
            _ => Err(ParseError::syntax(at, "expected integer")),
        }
    }

    fn number_unsigned(&mut self) -> Result<u64, ParseError> {
        self.expect(Major::Unsigned, "expected unsigned")?;
        argument(&mut self.parser.input)
    }

    fn number_double(&mut self) -> Result<f64, ParseError> {
        let byte = self.item()?;
        let at = self.offset();
        match Major::of(byte) {
            Major::Unsigned => Ok(argument(&mut self.parser.input)? as f64),
            Major::Negative => Ok(negative(at, argument(&mut self.parser.input)?)? as f64),
            Major::Simple if minor(byte) == 26 => major::float(&mut self.parser.input, 4),
            Major::Simple if minor(byte) == 27 => major::float(&mut self.parser.input, 8),
            Major::Simple if minor(byte) == 25 => Err(ParseError::unsupported(
                at,
                "half-precision floats are not supported",
            )),
            _ => Err(ParseError::syntax(at, "expected floating point number")),
        }
    }

    fn string(&mut self) -> Result<Cow<'de, str>, ParseError> {
        self.expect(Major::Text, "expected string")?;
        major::text(&mut self.parser.input)
    }

    fn binary(&mut self) -> Result<Cow<'de, [u8]>, ParseError> {
        self.expect(Major::Binary, "expected binary")?;
        major::string_bytes(&mut self.parser.input, Major::Binary)
    }

    fn key(&mut self) -> Result<Cow<'de, str>, ParseError> {
        major::key(&mut self.parser.input)
    }

    fn begin_array(&mut self) -> Result<ContainerState, ParseError> {
        self.begin(Major::Array, "expected array")
    }

    fn element(&mut self, state: &mut ContainerState) -> Result<(), ParseError> {
        self.next(state, "unexpected array end")
    }

    fn element_or_end_array(&mut self, state: &mut ContainerState) -> Result<bool, ParseError> {
        self.next_or_end(state)
    }

    fn end_array(&mut self, state: ContainerState) -> Result<(), ParseError> {
        self.end(state, "array size mismatch", "array not at end")
    }

    fn begin_object(&mut self) -> Result<ContainerState, ParseError> {
        self.begin(Major::Map, "expected object")
    }

    fn member(&mut self, state: &mut ContainerState) -> Result<(), ParseError> {
        self.next(state, "unexpected object end")
    }

    fn member_or_end_object(&mut self, state: &mut ContainerState) -> Result<bool, ParseError> {
        self.next_or_end(state)
    }

    fn end_object(&mut self, state: ContainerState) -> Result<(), ParseError> {
        self.end(state, "object size mismatch", "object not at end")
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
