//! Error types shared by every tessera format.
//!
//! There are two layers:
//!
//! - [`EventError`] is raised by a [`Consumer`](crate::Consumer) while it
//!   handles an event (duplicate keys, out-of-order events, things a writer
//!   cannot express).
//! - [`ParseError`] is what every `parse`/`from_*` entry point returns. It
//!   carries a [`Span`] into the input, and wraps consumer errors so that
//!   everything surfacing from a single parse is uniformly typed and
//!   positioned.

use core::fmt::{self, Display};
use std::borrow::Cow;

/// Error raised by a consumer while handling a structural event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// An object received the same key twice.
    DuplicateKey {
        /// The key that appeared more than once
        key: String,
    },
    /// A double that the target cannot represent (NaN or infinity).
    NonFiniteNumber,
    /// The consumer cannot express this event.
    Unsupported {
        /// What was not supported
        what: &'static str,
    },
    /// An event arrived at a point where it is not allowed.
    OutOfOrder {
        /// The offending event
        event: &'static str,
        /// What was expected instead
        expected: &'static str,
    },
    /// A value that has not been initialized (or was moved out of) was
    /// asked to produce events.
    Uninitialized,
    /// Free-form error from a user consumer.
    Custom(String),
}

impl EventError {
    /// Build a free-form consumer error.
    pub fn custom(message: impl Into<String>) -> Self {
        EventError::Custom(message.into())
    }

    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            EventError::DuplicateKey { .. } => "event::duplicate_key",
            EventError::NonFiniteNumber => "event::non_finite_number",
            EventError::Unsupported { .. } => "event::unsupported",
            EventError::OutOfOrder { .. } => "event::out_of_order",
            EventError::Uninitialized => "event::uninitialized",
            EventError::Custom(_) => "event::custom",
        }
    }
}

impl Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::DuplicateKey { key } => write!(f, "duplicate JSON object key `{key}`"),
            EventError::NonFiniteNumber => write!(f, "non-finite double value"),
            EventError::Unsupported { what } => write!(f, "{what} is not supported"),
            EventError::OutOfOrder { event, expected } => {
                write!(f, "unexpected `{event}` event, expected {expected}")
            }
            EventError::Uninitialized => write!(f, "attempt to produce events from an empty value"),
            EventError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EventError {}

/// A byte range in the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the start of the span
    pub offset: usize,
    /// Length of the span in bytes
    pub len: usize,
}

impl Span {
    /// Create a new span.
    pub const fn new(offset: usize, len: usize) -> Self {
        Span { offset, len }
    }

    /// Byte offset one past the end of the span.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

#[cfg(feature = "miette")]
impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.offset.into(), span.len)
    }
}

/// A 1-based line/column position, computed on demand from a [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in bytes
    pub column: usize,
}

impl Position {
    /// Locate `offset` within `input`.
    pub fn locate(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = match before.iter().rposition(|&b| b == b'\n') {
            Some(nl) => offset - nl,
            None => offset + 1,
        };
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Error returned by every parse entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The specific kind of error
    pub kind: ParseErrorKind,
    /// Where in the input the error was detected
    pub span: Span,
}

/// Specific error kinds for parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Malformed input.
    Syntax {
        /// Human-readable expectation message
        expected: Cow<'static, str>,
    },
    /// Input ended in the middle of a value.
    UnexpectedEof {
        /// What was being parsed
        expected: &'static str,
    },
    /// A text string is not valid UTF-8.
    InvalidUtf8,
    /// A number does not fit the 64-bit representation it must be decoded to.
    NumericOverflow {
        /// What overflowed
        what: &'static str,
    },
    /// Valid input using a feature this implementation does not support.
    Unsupported {
        /// What was not supported
        what: Cow<'static, str>,
    },
    /// Containers nested deeper than [`ParseOptions::max_depth`](crate::ParseOptions).
    DepthLimitExceeded {
        /// The configured limit
        limit: usize,
    },
    /// The consumer rejected an event.
    Consumer(EventError),
    /// Reading the input failed.
    Io(String),
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Syntax { expected } => write!(f, "{expected}"),
            ParseErrorKind::UnexpectedEof { expected } => write!(f, "{expected}"),
            ParseErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
            ParseErrorKind::NumericOverflow { what } => write!(f, "{what}"),
            ParseErrorKind::Unsupported { what } => write!(f, "{what}"),
            ParseErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting depth exceeds the limit of {limit}")
            }
            ParseErrorKind::Consumer(e) => write!(f, "{e}"),
            ParseErrorKind::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl ParseErrorKind {
    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::Syntax { .. } => "parse::syntax",
            ParseErrorKind::UnexpectedEof { .. } => "parse::unexpected_eof",
            ParseErrorKind::InvalidUtf8 => "parse::invalid_utf8",
            ParseErrorKind::NumericOverflow { .. } => "parse::numeric_overflow",
            ParseErrorKind::Unsupported { .. } => "parse::unsupported",
            ParseErrorKind::DepthLimitExceeded { .. } => "parse::depth_limit_exceeded",
            ParseErrorKind::Consumer(e) => e.code(),
            ParseErrorKind::Io(_) => "parse::io",
        }
    }

    /// Get a label describing where/what the error points to.
    pub fn label(&self) -> String {
        match self {
            ParseErrorKind::Syntax { expected } => expected.to_string(),
            ParseErrorKind::UnexpectedEof { .. } => "input ends here".into(),
            ParseErrorKind::InvalidUtf8 => "invalid UTF-8 here".into(),
            ParseErrorKind::NumericOverflow { .. } => "number out of range".into(),
            ParseErrorKind::Unsupported { .. } => "unsupported here".into(),
            ParseErrorKind::DepthLimitExceeded { .. } => "nested too deeply".into(),
            ParseErrorKind::Consumer(_) => "rejected by consumer".into(),
            ParseErrorKind::Io(_) => "I/O error".into(),
        }
    }
}

impl ParseError {
    /// Create a new error at the given span.
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }

    /// A syntax error at `offset`.
    pub fn syntax(offset: usize, expected: impl Into<Cow<'static, str>>) -> Self {
        ParseError::new(
            ParseErrorKind::Syntax {
                expected: expected.into(),
            },
            Span::new(offset, 1),
        )
    }

    /// Input ended at `offset` while parsing `expected`.
    pub const fn eof(offset: usize, expected: &'static str) -> Self {
        ParseError::new(ParseErrorKind::UnexpectedEof { expected }, Span::new(offset, 0))
    }

    /// Invalid UTF-8 in the `len` bytes starting at `offset`.
    pub const fn invalid_utf8(offset: usize, len: usize) -> Self {
        ParseError::new(ParseErrorKind::InvalidUtf8, Span::new(offset, len))
    }

    /// A numeric overflow at `offset`.
    pub const fn overflow(offset: usize, what: &'static str) -> Self {
        ParseError::new(ParseErrorKind::NumericOverflow { what }, Span::new(offset, 1))
    }

    /// An unsupported feature at `offset`.
    pub fn unsupported(offset: usize, what: impl Into<Cow<'static, str>>) -> Self {
        ParseError::new(
            ParseErrorKind::Unsupported { what: what.into() },
            Span::new(offset, 1),
        )
    }

    /// The nesting limit was hit at `offset`.
    pub const fn depth(offset: usize, limit: usize) -> Self {
        ParseError::new(ParseErrorKind::DepthLimitExceeded { limit }, Span::new(offset, 1))
    }

    /// Wrap a consumer error raised while the cursor was at `offset`.
    pub const fn consumer(offset: usize, error: EventError) -> Self {
        ParseError::new(ParseErrorKind::Consumer(error), Span::new(offset, 0))
    }

    /// Wrap an I/O error.
    pub fn io(error: std::io::Error) -> Self {
        ParseError::new(ParseErrorKind::Io(error.to_string()), Span::default())
    }

    /// Line and column of the error within `input`.
    pub fn position(&self, input: &[u8]) -> Position {
        Position::locate(input, self.span.offset)
    }

    /// The consumer error, if a consumer rejected an event.
    pub fn as_event_error(&self) -> Option<&EventError> {
        match &self.kind {
            ParseErrorKind::Consumer(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.span.offset)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Consumer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(error: std::io::Error) -> Self {
        ParseError::io(error)
    }
}

#[cfg(feature = "miette")]
impl miette::Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(miette::LabeledSpan::at(
            self.span,
            self.kind.label(),
        ))))
    }
}

/// Attach an input offset to consumer results.
pub trait AtOffset<T> {
    /// Convert an [`EventError`] into a [`ParseError`] positioned at `offset`.
    fn at_offset(self, offset: usize) -> Result<T, ParseError>;
}

impl<T> AtOffset<T> for Result<T, EventError> {
    #[inline]
    fn at_offset(self, offset: usize) -> Result<T, ParseError> {
        self.map_err(|e| ParseError::consumer(offset, e))
    }
}
