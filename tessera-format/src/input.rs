//! A byte cursor over in-memory input, with mark/rewind checkpoints.

use crate::{ParseError, Span};

/// Byte cursor shared by all grammars.
///
/// The cursor never copies: every slice it hands out borrows from the
/// input it was created from, so parsers can emit borrowed strings.
#[derive(Debug, Clone)]
pub struct Input<'de> {
    bytes: &'de [u8],
    pos: usize,
}

/// A saved cursor position, restored with [`Input::rewind`].
///
/// Parsers that track nesting also stash their depth here, so a rewind
/// undoes containers entered since the mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pos: usize,
    depth: usize,
}

impl Marker {
    /// The byte offset this marker points at.
    pub const fn offset(self) -> usize {
        self.pos
    }

    /// The nesting depth recorded with this marker.
    pub const fn depth(self) -> usize {
        self.depth
    }

    /// Record the nesting depth at the time of the mark.
    pub const fn with_depth(self, depth: usize) -> Self {
        Marker {
            pos: self.pos,
            depth,
        }
    }
}

impl<'de> Input<'de> {
    /// Create a cursor at the start of `bytes`.
    pub const fn new(bytes: &'de [u8]) -> Self {
        Input { bytes, pos: 0 }
    }

    /// Current byte offset.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    /// The complete input.
    #[inline]
    pub const fn bytes(&self) -> &'de [u8] {
        self.bytes
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn rest(&self) -> &'de [u8] {
        &self.bytes[self.pos..]
    }

    /// Number of bytes not yet consumed.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Whether all input has been consumed.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Look at the next byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Look `n` bytes ahead without consuming anything.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    /// Consume and return the next byte.
    #[inline]
    pub fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Skip `n` bytes. The caller must have checked they exist.
    #[inline]
    pub fn bump(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.pos += n;
    }

    /// Consume `n` bytes, or return `None` (without consuming) if fewer remain.
    #[inline]
    pub fn take(&mut self, n: usize) -> Option<&'de [u8]> {
        if n > self.remaining() {
            return None;
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    /// Consume the next byte if it equals `b`.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `literal` if the input continues with it.
    pub fn eat_slice(&mut self, literal: &[u8]) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Input between `from` and the current position.
    #[inline]
    pub fn since(&self, from: usize) -> &'de [u8] {
        &self.bytes[from..self.pos]
    }

    /// Consume `n` bytes or fail with an end-of-input error naming `expected`.
    #[inline]
    pub fn require(&mut self, n: usize, expected: &'static str) -> Result<&'de [u8], ParseError> {
        let at = self.pos;
        self.take(n).ok_or_else(|| ParseError::eof(at, expected))
    }

    /// Read a big-endian unsigned integer of `width` bytes (1, 2, 4 or 8).
    pub fn read_be(&mut self, width: usize, expected: &'static str) -> Result<u64, ParseError> {
        let bytes = self.require(width, expected)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    /// Span of `len` bytes starting at the current position.
    #[inline]
    pub const fn span(&self, len: usize) -> Span {
        Span::new(self.pos, len)
    }

    /// Save the current position.
    #[inline]
    pub const fn mark(&self) -> Marker {
        Marker {
            pos: self.pos,
            depth: 0,
        }
    }

    /// Restore a position previously returned by [`Input::mark`].
    #[inline]
    pub fn rewind(&mut self, marker: Marker) {
        debug_assert!(marker.pos <= self.bytes.len());
        self.pos = marker.pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_does_not_consume_on_short_input() {
        let mut input = Input::new(b"abc");
        assert_eq!(input.take(2), Some(&b"ab"[..]));
        assert_eq!(input.take(2), None);
        assert_eq!(input.offset(), 2);
        assert_eq!(input.next_byte(), Some(b'c'));
        assert!(input.is_empty());
    }

    #[test]
    fn mark_and_rewind() {
        let mut input = Input::new(b"null");
        let m = input.mark();
        assert!(input.eat_slice(b"nu"));
        assert_eq!(input.since(m.offset()), b"nu");
        input.rewind(m);
        assert_eq!(input.offset(), 0);
        assert!(!input.eat_slice(b"true"));
    }

    #[test]
    fn big_endian_reads() {
        let mut input = Input::new(&[0x01, 0x02, 0xff, 0xff, 0xff, 0xff, 0x07]);
        assert_eq!(input.read_be(2, "u16").unwrap(), 0x0102);
        assert_eq!(input.read_be(4, "u32").unwrap(), 0xffff_ffff);
        let err = input.read_be(8, "u64").unwrap_err();
        assert_eq!(err.span.offset, 6);
    }
}
