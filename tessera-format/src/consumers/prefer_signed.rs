use std::borrow::Cow;

use crate::{Consumer, EventError};

/// Adapter that reports unsigned integers as signed whenever they fit.
///
/// Producers such as JSON and CBOR report every non-negative integer as
/// `u64`; consumers that prefer a single integer representation wrap
/// themselves in this adapter.
#[derive(Debug, Clone, Default)]
pub struct PreferSigned<C> {
    inner: C,
}

impl<C> PreferSigned<C> {
    /// Wrap `inner`.
    pub fn new(inner: C) -> Self {
        PreferSigned { inner }
    }

    /// Return the wrapped consumer.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<'de, C: Consumer<'de>> Consumer<'de> for PreferSigned<C> {
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
        match i64::try_from(v) {
            Ok(v) => self.inner.number_i64(v),
            Err(_) => self.inner.number_u64(v),
        }
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.inner.number_f64(v)
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.inner.string(v)
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        self.inner.binary(v)
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
