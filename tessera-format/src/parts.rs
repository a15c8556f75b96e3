//! Pull-style decoding, one token at a time.

use std::borrow::Cow;

use crate::{Marker, ParseError};

/// Iteration state for an array or object being pulled.
///
/// Formats with counted containers (CBOR definite lengths, MessagePack)
/// carry `size`; formats that end containers with a terminator (JSON text,
/// indefinite-length CBOR) leave it `None` and look for the terminator
/// instead. `index` counts the entries consumed so far in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerState {
    /// Entries consumed so far
    pub index: usize,
    /// Announced entry count, if the format provides one
    pub size: Option<usize>,
}

impl ContainerState {
    /// State for a container with a known entry count.
    pub const fn sized(size: usize) -> Self {
        ContainerState {
            index: 0,
            size: Some(size),
        }
    }

    /// State for a container ended by a terminator.
    pub const fn open_ended() -> Self {
        ContainerState {
            index: 0,
            size: None,
        }
    }

    /// For sized containers: whether another entry remains, counting it if so.
    pub fn next_sized(&mut self) -> Option<bool> {
        let size = self.size?;
        if self.index < size {
            self.index += 1;
            Some(true)
        } else {
            Some(false)
        }
    }
}

/// A parser offering one-token-at-a-time decoding.
///
/// Binding layers use this to decode straight into native structures
/// without materializing a value tree. Every method consumes exactly the
/// token it names or fails; `null` is the exception and only consumes when
/// the next value is a null.
pub trait PartsParser<'de> {
    /// Consume a `null` if one is next; returns whether it did.
    fn null(&mut self) -> Result<bool, ParseError>;

    /// Consume a boolean.
    fn boolean(&mut self) -> Result<bool, ParseError>;

    /// Consume an integer that fits `i64`.
    fn number_signed(&mut self) -> Result<i64, ParseError>;

    /// Consume a non-negative integer that fits `u64`.
    fn number_unsigned(&mut self) -> Result<u64, ParseError>;

    /// Consume any number as a double.
    fn number_double(&mut self) -> Result<f64, ParseError>;

    /// Consume a text string.
    fn string(&mut self) -> Result<Cow<'de, str>, ParseError>;

    /// Consume a byte string.
    fn binary(&mut self) -> Result<Cow<'de, [u8]>, ParseError>;

    /// Consume an object key (including any separator that follows it).
    fn key(&mut self) -> Result<Cow<'de, str>, ParseError>;

    /// Consume the start of an array.
    fn begin_array(&mut self) -> Result<ContainerState, ParseError>;

    /// Prepare for the next array element; fails if the array has ended.
    fn element(&mut self, state: &mut ContainerState) -> Result<(), ParseError>;

    /// Prepare for the next array element, or consume the end of the array.
    ///
    /// Returns `true` if an element follows.
    fn element_or_end_array(&mut self, state: &mut ContainerState) -> Result<bool, ParseError>;

    /// Consume the end of an array, checking the entry count.
    fn end_array(&mut self, state: ContainerState) -> Result<(), ParseError>;

    /// Consume the start of an object.
    fn begin_object(&mut self) -> Result<ContainerState, ParseError>;

    /// Prepare for the next object member; fails if the object has ended.
    fn member(&mut self, state: &mut ContainerState) -> Result<(), ParseError>;

    /// Prepare for the next object member, or consume the end of the object.
    ///
    /// Returns `true` if a member follows.
    fn member_or_end_object(&mut self, state: &mut ContainerState) -> Result<bool, ParseError>;

    /// Consume the end of an object, checking the entry count.
    fn end_object(&mut self, state: ContainerState) -> Result<(), ParseError>;

    /// Consume and ignore the next complete value.
    fn skip_value(&mut self) -> Result<(), ParseError>;

    /// Save the current position.
    fn mark(&self) -> Marker;

    /// Return to a position saved with [`PartsParser::mark`].
    fn rewind(&mut self, marker: Marker);

    /// Check that all input has been consumed.
    fn finish(&mut self) -> Result<(), ParseError>;

    /// Run `f`, rewinding to the current position if it fails.
    ///
    /// This is the checkpoint used for "try this alternative" decoding.
    fn attempt<T, F>(&mut self, f: F) -> Result<T, ParseError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, ParseError>,
    {
        let marker = self.mark();
        let result = f(self);
        if result.is_err() {
            self.rewind(marker);
        }
        result
    }
}
