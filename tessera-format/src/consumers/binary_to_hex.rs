use core::fmt::Write as _;
use std::borrow::Cow;

use crate::{Consumer, EventError};

/// Adapter that turns binary events into lowercase hex strings.
///
/// Lets text formats without a byte-string type (JSON) carry binary data.
#[derive(Debug, Clone, Default)]
pub struct BinaryToHex<C> {
    inner: C,
}

impl<C> BinaryToHex<C> {
    /// Wrap `inner`.
    pub fn new(inner: C) -> Self {
        BinaryToHex { inner }
    }

    /// Return the wrapped consumer.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<'de, C: Consumer<'de>> Consumer<'de> for BinaryToHex<C> {
    fn null(&mut self) -> Result<(), EventError> {
        self.inner.null()
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.inner.boolean(v)
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.inner.number_i64(v)
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.inner.number_u64(v)
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.inner.number_f64(v)
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.inner.string(v)
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        let mut hex = String::with_capacity(v.len() * 2);
        for b in v.iter() {
            let _ = write!(hex, "{b:02x}");
        }
        self.inner.string(Cow::Owned(hex))
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.inner.begin_array(size)
    }

    fn element(&mut self) -> Result<(), EventError> {
        self.inner.element()
    }

    fn end_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.inner.end_array(size)
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.inner.begin_object(size)
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.inner.key(v)
    }

    fn member(&mut self) -> Result<(), EventError> {
        self.inner.member()
    }

    fn end_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.inner.end_object(size)
    }
}
