//! Pull-style JSON decoding.

use std::borrow::Cow;

use tessera_format::{
    ContainerState, Discard, Marker, ParseError, ParseOptions, PartsParser,
};

use crate::grammar::{Parser, expected};
use crate::number::{Number, scan_number};
use crate::string::{Quoted, scan_string, skip_ws};

/// A [`PartsParser`] over JSON text.
///
/// ```
/// use tessera_format::PartsParser;
/// use tessera_json::JsonPartsParser;
///
/// let mut p = JsonPartsParser::new(r#"{"id": 7, "tags": ["a", "b"]}"#);
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
pub struct JsonPartsParser<'de> {
    parser: Parser<'de>,
}

impl<'de> JsonPartsParser<'de> {
    /// Start at the beginning of `input`.
    pub fn new(input: &'de str) -> Self {
        JsonPartsParser::from_slice(input.as_bytes())
    }

    /// Start at the beginning of `input`, which should be UTF-8.
    pub fn from_slice(input: &'de [u8]) -> Self {
        JsonPartsParser::with_options(input, &ParseOptions::default())
    }

    /// Start at the beginning of `input` with explicit options.
    pub fn with_options(input: &'de [u8], options: &ParseOptions) -> Self {
        JsonPartsParser {
            parser: Parser::new(input, options),
        }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.parser.input.offset()
    }

    fn ws(&mut self) {
        skip_ws(&mut self.parser.input);
    }

    fn number(&mut self) -> Result<(usize, Number), ParseError> {
        self.ws();
        let at = self.parser.input.offset();
        match self.parser.input.peek() {
            Some(b'-' | b'0'..=b'9') => Ok((at, scan_number(&mut self.parser.input)?)),
            _ => Err(expected(&self.parser.input, "expected number")),
        }
    }

    /// Consume `word` only when it is a whole token.
    fn literal(&mut self, word: &[u8]) -> bool {
        let input = &mut self.parser.input;
        let whole = input.rest().starts_with(word)
            && !matches!(
                input.peek_at(word.len()),
                Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
            );
        if whole {
            input.bump(word.len());
        }
        whole
    }

    fn open(&mut self, bracket: u8, what: &'static str) -> Result<ContainerState, ParseError> {
        self.ws();
        let at = self.parser.input.offset();
        if self.parser.input.peek() != Some(bracket) {
            return Err(expected(&self.parser.input, what));
        }
        self.parser.depth.enter(at)?;
        self.parser.input.bump(1);
        Ok(ContainerState::open_ended())
    }

    fn next_or_close(
        &mut self,
        state: &mut ContainerState,
        close: u8,
        incomplete: &'static str,
    ) -> Result<bool, ParseError> {
        self.ws();
        if self.parser.input.eat(close) {
            self.parser.depth.leave();
            return Ok(false);
        }
        if state.index > 0 && !self.parser.input.eat(b',') {
            return Err(expected(&self.parser.input, incomplete));
        }
        self.ws();
        state.index += 1;
        Ok(true)
    }

    fn close(&mut self, close: u8, incomplete: &'static str) -> Result<(), ParseError> {
        self.ws();
        if !self.parser.input.eat(close) {
            return Err(expected(&self.parser.input, incomplete));
        }
        self.parser.depth.leave();
        Ok(())
    }
}

impl<'de> PartsParser<'de> for JsonPartsParser<'de> {
    fn null(&mut self) -> Result<bool, ParseError> {
        self.ws();
        Ok(self.literal(b"null"))
    }

    fn boolean(&mut self) -> Result<bool, ParseError> {
        self.ws();
        if self.literal(b"true") {
            Ok(true)
        } else if self.literal(b"false") {
            Ok(false)
        } else {
            Err(expected(&self.parser.input, "expected boolean"))
        }
    }

    fn number_signed(&mut self) -> Result<i64, ParseError> {
        match self.number()? {
            (_, Number::Signed(i)) => Ok(i),
            (at, Number::Unsigned(u)) => {
                i64::try_from(u).map_err(|_| ParseError::overflow(at, "positive integer overflow"))
            }
            (at, Number::Double(_)) => Err(ParseError::syntax(at, "expected signed integer")),
        }
    }

    fn number_unsigned(&mut self) -> Result<u64, ParseError> {
        match self.number()? {
            (_, Number::Unsigned(u)) => Ok(u),
            (_, Number::Signed(0)) => Ok(0),
            (at, _) => Err(ParseError::syntax(at, "expected unsigned integer")),
        }
    }

    fn number_double(&mut self) -> Result<f64, ParseError> {
        Ok(match self.number()?.1 {
            Number::Unsigned(u) => u as f64,
            Number::Signed(i) => i as f64,
            Number::Double(d) => d,
        })
    }

    fn string(&mut self) -> Result<Cow<'de, str>, ParseError> {
        self.ws();
        if self.parser.input.peek() != Some(b'"') {
            return Err(expected(&self.parser.input, "expected string"));
        }
        scan_string(&mut self.parser.input, Quoted::Value)
    }

    fn binary(&mut self) -> Result<Cow<'de, [u8]>, ParseError> {
        self.ws();
        Err(ParseError::unsupported(
            self.parser.input.offset(),
            "JSON text has no binary data",
        ))
    }

    fn key(&mut self) -> Result<Cow<'de, str>, ParseError> {
        self.ws();
        let key = self.parser.key()?;
        self.ws();
        Ok(key)
    }

    fn begin_array(&mut self) -> Result<ContainerState, ParseError> {
        self.open(b'[', "expected '['")
    }

    fn element(&mut self, state: &mut ContainerState) -> Result<(), ParseError> {
        let at = self.parser.input.offset();
        if self.element_or_end_array(state)? {
            Ok(())
        } else {
            Err(ParseError::syntax(at, "expected value"))
        }
    }

    fn element_or_end_array(&mut self, state: &mut ContainerState) -> Result<bool, ParseError> {
        self.next_or_close(state, b']', "incomplete array, expected ']'")
    }

    fn end_array(&mut self, _: ContainerState) -> Result<(), ParseError> {
        self.close(b']', "incomplete array, expected ']'")
    }

    fn begin_object(&mut self) -> Result<ContainerState, ParseError> {
        self.open(b'{', "expected '{'")
    }

    fn member(&mut self, state: &mut ContainerState) -> Result<(), ParseError> {
        let at = self.parser.input.offset();
        if self.member_or_end_object(state)? {
            Ok(())
        } else {
            Err(ParseError::syntax(at, "expected member"))
        }
    }

    fn member_or_end_object(&mut self, state: &mut ContainerState) -> Result<bool, ParseError> {
        self.next_or_close(state, b'}', "incomplete object, expected '}'")
    }

    fn end_object(&mut self, _: ContainerState) -> Result<(), ParseError> {
        self.close(b'}', "incomplete object, expected '}'")
    }

    fn skip_value(&mut self) -> Result<(), ParseError> {
        self.ws();
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
    fn pulls_nested_containers() {
        let mut p = JsonPartsParser::new(" [ 1 , [true, null], -3.5 ] ");
        let mut outer = p.begin_array().unwrap();
        p.element(&mut outer).unwrap();
        assert_eq!(p.number_signed().unwrap(), 1);
        p.element(&mut outer).unwrap();
        let mut inner = p.begin_array().unwrap();
        assert!(p.element_or_end_array(&mut inner).unwrap());
        assert!(!p.null().unwrap());
        assert!(p.boolean().unwrap());
        assert!(p.element_or_end_array(&mut inner).unwrap());
        assert!(p.null().unwrap());
        assert!(!p.element_or_end_array(&mut inner).unwrap());
        p.element(&mut outer).unwrap();
        assert_eq!(p.number_double().unwrap(), -3.5);
        p.end_array(outer).unwrap();
        p.finish().unwrap();
        assert_eq!(outer.index, 3);
    }

    #[test]
    fn numeric_pulls_check_their_range() {
        let mut p = JsonPartsParser::new("[18446744073709551615, -1, 2.5]");
        let mut a = p.begin_array().unwrap();
        p.element(&mut a).unwrap();
        let err = p.attempt(|p| p.number_signed()).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NumericOverflow { .. }));
        assert_eq!(p.number_unsigned().unwrap(), u64::MAX);
        p.element(&mut a).unwrap();
        assert!(p.attempt(|p| p.number_unsigned()).is_err());
        assert_eq!(p.number_signed().unwrap(), -1);
        p.element(&mut a).unwrap();
        assert!(p.attempt(|p| p.number_signed()).is_err());
        assert_eq!(p.number_double().unwrap(), 2.5);
    }

    #[test]
    fn skip_and_rewind() {
        let mut p = JsonPartsParser::new(r#"{"skip": {"deep": [1, 2]}, "keep": "x"}"#);
        let mut o = p.begin_object().unwrap();
        p.member(&mut o).unwrap();
        assert_eq!(p.key().unwrap(), "skip");
        p.skip_value().unwrap();
        p.member(&mut o).unwrap();
        let marker = p.mark();
        assert_eq!(p.key().unwrap(), "keep");
        p.rewind(marker);
        assert_eq!(p.key().unwrap(), "keep");
        assert_eq!(p.string().unwrap(), "x");
        p.end_object(o).unwrap();
        p.finish().unwrap();
    }

    #[test]
    fn missing_separator() {
        let mut p = JsonPartsParser::new("[1 2]");
        let mut a = p.begin_array().unwrap();
        p.element(&mut a).unwrap();
        p.number_unsigned().unwrap();
        let err = p.element(&mut a).unwrap_err();
        assert_eq!(err.kind.to_string(), "incomplete array, expected ']'");
    }

    #[test]
    fn failed_attempt_restores_depth() {
        let options = ParseOptions::new().max_depth(1);
        let mut p = JsonPartsParser::with_options(br#"["a"]"#, &options);
        let err = p
            .attempt(|p| {
                let mut a = p.begin_array()?;
                p.element(&mut a)?;
                p.number_unsigned()
            })
            .unwrap_err();
        assert_eq!(err.kind.to_string(), "expected number");
        assert_eq!(p.mark().depth(), 0);

        let mut a = p.begin_array().unwrap();
        p.element(&mut a).unwrap();
        assert_eq!(p.string().unwrap(), "a");
        p.end_array(a).unwrap();
        p.finish().unwrap();
    }

    #[test]
    fn literals_must_end_at_a_delimiter() {
        let mut p = JsonPartsParser::new("[nullx, truey, null]");
        let mut a = p.begin_array().unwrap();
        p.element(&mut a).unwrap();
        assert!(!p.null().unwrap());
        assert_eq!(p.offset(), 1);
        assert!(p.attempt(|p| p.boolean()).is_err());
        assert_eq!(p.offset(), 1);

        let mut p = JsonPartsParser::new("truey");
        let err = p.boolean().unwrap_err();
        assert_eq!(err.kind.to_string(), "expected boolean");
        assert_eq!(err.span.offset, 0);

        let mut p = JsonPartsParser::new(" null ");
        assert!(p.null().unwrap());
        p.finish().unwrap();
    }

    #[test]
    fn no_binary_in_json() {
        let mut p = JsonPartsParser::new("\"AA==\"");
        assert!(matches!(
            p.binary().unwrap_err().kind,
            ParseErrorKind::Unsupported { .. }
        ));
    }
}
