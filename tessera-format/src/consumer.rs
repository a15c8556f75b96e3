//! The push-style event sink every grammar drives.

use std::borrow::Cow;

use crate::EventError;

/// Receiver of structural events.
///
/// A grammar matches exactly one value and reports it as a sequence of
/// calls: scalars map to a single call, arrays to `begin_array`, then each
/// element's events followed by `element`, then `end_array`, and objects to
/// `begin_object`, then `key`, the value's events and `member` per entry,
/// then `end_object`.
///
/// Size arguments are capacity hints; `None` means the producer did not
/// know the count up front (JSON text, indefinite-length CBOR).
///
/// Strings and binaries are handed out as [`Cow`] so that a producer can
/// lend slices of its input for the `'de` lifetime; consumers that keep
/// data past the parse call `into_owned`.
pub trait Consumer<'de> {
    /// A `null`.
    fn null(&mut self) -> Result<(), EventError>;

    /// A boolean.
    fn boolean(&mut self, v: bool) -> Result<(), EventError>;

    /// A signed integer.
    fn number_i64(&mut self, v: i64) -> Result<(), EventError>;

    /// An unsigned integer.
    fn number_u64(&mut self, v: u64) -> Result<(), EventError>;

    /// A double.
    fn number_f64(&mut self, v: f64) -> Result<(), EventError>;

    /// A text string.
    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError>;

    /// A byte string.
    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError>;

    /// Start of an array.
    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError>;

    /// End of one array element.
    fn element(&mut self) -> Result<(), EventError>;

    /// End of an array.
    fn end_array(&mut self, size: Option<usize>) -> Result<(), EventError>;

    /// Start of an object.
    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError>;

    /// Key of the next object member.
    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError>;

    /// End of one object member.
    fn member(&mut self) -> Result<(), EventError>;

    /// End of an object.
    fn end_object(&mut self, size: Option<usize>) -> Result<(), EventError>;
}

macro_rules! forward_consumer {
    ($de:lifetime) => {
        #[inline]
        fn null(&mut self) -> Result<(), EventError> {
            (**self).null()
        }
        #[inline]
        fn boolean(&mut self, v: bool) -> Result<(), EventError> {
            (**self).boolean(v)
        }
        #[inline]
        fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
            (**self).number_i64(v)
        }
        #[inline]
        fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
            (**self).number_u64(v)
        }
        #[inline]
        fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
            (**self).number_f64(v)
        }
        #[inline]
        fn string(&mut self, v: Cow<$de, str>) -> Result<(), EventError> {
            (**self).string(v)
        }
        #[inline]
        fn binary(&mut self, v: Cow<$de, [u8]>) -> Result<(), EventError> {
            (**self).binary(v)
        }
        #[inline]
        fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
            (**self).begin_array(size)
        }
        #[inline]
        fn element(&mut self) -> Result<(), EventError> {
            (**self).element()
        }
        #[inline]
        fn end_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
            (**self).end_array(size)
        }
        #[inline]
        fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
            (**self).begin_object(size)
        }
        #[inline]
        fn key(&mut self, v: Cow<$de, str>) -> Result<(), EventError> {
            (**self).key(v)
        }
        #[inline]
        fn member(&mut self) -> Result<(), EventError> {
            (**self).member()
        }
        #[inline]
        fn end_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
            (**self).end_object(size)
        }
    };
}

impl<'de, C: Consumer<'de> + ?Sized> Consumer<'de> for &mut C {
    forward_consumer!('de);
}

impl<'de, C: Consumer<'de> + ?Sized> Consumer<'de> for Box<C> {
    forward_consumer!('de);
}
