//! Decimal number accumulation and conversion.

use lexical_parse_float::FromLexical as _;
use tessera_format::{Input, ParseError};

/// Significant digits kept before the rest only contributes to rounding.
///
/// 772 digits are enough to decide the correctly rounded double for any
/// decimal input.
pub(crate) const MAX_MANTISSA_DIGITS: usize = 772;

/// Numbers with more digits than this are rejected outright.
const MAX_DIGITS: usize = 1 << 20;

/// Exponents are limited to this many significant digits.
const MAX_EXPONENT_DIGITS: usize = 9;

/// A decoded JSON number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    /// A non-negative integer
    Unsigned(u64),
    /// A negative integer (or `-0`)
    Signed(i64),
    /// Anything with a fraction or exponent, or an integer too large for 64 bits
    Double(f64),
}

/// Digits of a number as the grammar matched them, normalized for conversion.
#[derive(Debug)]
pub(crate) struct NumberState {
    negative: bool,
    mantissa: Vec<u8>,
    exponent10: i64,
    is_float: bool,
    drop: bool,
}

impl NumberState {
    pub(crate) fn new(negative: bool) -> Self {
        NumberState {
            negative,
            mantissa: Vec::new(),
            exponent10: 0,
            is_float: false,
            drop: false,
        }
    }

    /// Record the integer part.
    pub(crate) fn integer_digits(&mut self, digits: &[u8]) -> Result<(), &'static str> {
        if digits.len() > MAX_DIGITS {
            return Err("JSON number with 1 megabyte digits");
        }
        // a lone `0` contributes nothing, so fraction zeros still count as leading
        let start = digits.iter().position(|&d| d != b'0').unwrap_or(digits.len());
        let digits = &digits[start..];
        let kept = digits.len().min(MAX_MANTISSA_DIGITS);
        self.mantissa.extend_from_slice(&digits[..kept]);
        self.exponent10 += (digits.len() - kept) as i64;
        self.drop |= digits[kept..].iter().any(|&d| d != b'0');
        Ok(())
    }

    /// Record the fraction part.
    pub(crate) fn fraction_digits(&mut self, digits: &[u8]) -> Result<(), &'static str> {
        if digits.len() > MAX_DIGITS {
            return Err("JSON number with 1 megabyte digits");
        }
        self.is_float = true;
        let end = digits.iter().rposition(|&d| d != b'0').map_or(0, |i| i + 1);
        let mut digits = &digits[..end];
        if self.mantissa.is_empty() {
            while let [b'0', rest @ ..] = digits {
                digits = rest;
                self.exponent10 -= 1;
            }
        }
        let kept = digits.len().min(MAX_MANTISSA_DIGITS - self.mantissa.len());
        self.mantissa.extend_from_slice(&digits[..kept]);
        self.exponent10 -= kept as i64;
        self.drop |= digits[kept..].iter().any(|&d| d != b'0');
        Ok(())
    }

    /// Record the exponent.
    pub(crate) fn exponent_digits(&mut self, negative: bool, digits: &[u8]) -> Result<(), &'static str> {
        self.is_float = true;
        let start = digits.iter().position(|&d| d != b'0').unwrap_or(digits.len());
        let significant = &digits[start..];
        if significant.len() > MAX_EXPONENT_DIGITS {
            return Err("JSON exponent has more than 9 significant digits");
        }
        let exponent = significant
            .iter()
            .fold(0i64, |acc, &d| acc * 10 + i64::from(d - b'0'));
        self.exponent10 += if negative { -exponent } else { exponent };
        Ok(())
    }

    /// Decide the representation and convert.
    pub(crate) fn finish(mut self) -> Result<Number, &'static str> {
        if !self.is_float && self.mantissa.len() <= 20 {
            if let Some(magnitude) = self.integer() {
                match (self.negative, i64::try_from(magnitude)) {
                    (false, _) => return Ok(Number::Unsigned(magnitude)),
                    (true, Ok(m)) => return Ok(Number::Signed(-m)),
                    (true, Err(_)) if magnitude == 1 << 63 => return Ok(Number::Signed(i64::MIN)),
                    (true, Err(_)) => {}
                }
            }
        }
        if self.drop {
            self.mantissa.push(b'1');
            self.exponent10 -= 1;
        }
        if self.mantissa.is_empty() {
            self.mantissa.push(b'0');
        }
        self.mantissa.push(b'e');
        self.mantissa
            .extend_from_slice(itoa::Buffer::new().format(self.exponent10).as_bytes());
        let magnitude = f64::from_lexical(&self.mantissa).map_err(|_| "invalid double value")?;
        if !magnitude.is_finite() {
            return Err("invalid double value");
        }
        Ok(Number::Double(if self.negative { -magnitude } else { magnitude }))
    }

    fn integer(&self) -> Option<u64> {
        self.mantissa.iter().try_fold(0u64, |acc, &d| {
            acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
        })
    }
}

fn eat_digits(input: &mut Input<'_>) -> usize {
    let start = input.offset();
    while matches!(input.peek(), Some(b'0'..=b'9')) {
        input.bump(1);
    }
    input.offset() - start
}

fn fail(input: &Input<'_>, expected: &'static str) -> ParseError {
    if input.is_empty() {
        ParseError::eof(input.offset(), expected)
    } else {
        ParseError::syntax(input.offset(), expected)
    }
}

/// Match a number at the cursor and decode it.
///
/// The cursor must be at `-` or a digit.
pub(crate) fn scan_number(input: &mut Input<'_>) -> Result<Number, ParseError> {
    let start = input.offset();
    let mut state = NumberState::new(input.eat(b'-'));

    let integer_start = input.offset();
    match input.peek() {
        Some(b'0') => {
            input.bump(1);
            if matches!(input.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::syntax(input.offset(), "invalid leading zero"));
            }
        }
        Some(b'1'..=b'9') => {
            eat_digits(input);
        }
        _ => return Err(fail(input, "incomplete number")),
    }
    state
        .integer_digits(input.since(integer_start))
        .map_err(|e| ParseError::syntax(start, e))?;

    if input.eat(b'.') {
        let fraction_start = input.offset();
        if eat_digits(input) == 0 {
            return Err(fail(input, "expected at least one fraction digit"));
        }
        state
            .fraction_digits(input.since(fraction_start))
            .map_err(|e| ParseError::syntax(start, e))?;
    }

    if matches!(input.peek(), Some(b'e' | b'E')) {
        input.bump(1);
        let negative = input.eat(b'-');
        if !negative {
            input.eat(b'+');
        }
        let exponent_start = input.offset();
        if eat_digits(input) == 0 {
            return Err(fail(input, "expected at least one exponent digit"));
        }
        state
            .exponent_digits(negative, input.since(exponent_start))
            .map_err(|e| ParseError::syntax(exponent_start, e))?;
    }

    state.finish().map_err(|e| ParseError::syntax(start, e))
}
