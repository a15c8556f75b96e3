use std::borrow::Cow;

use crate::{Consumer, EventError};

/// Consumer that forwards every event to two consumers, first `A` then `B`.
///
/// Borrowed strings are cloned for `A` and moved into `B`.
#[derive(Debug, Clone, Default)]
pub struct Tee<A, B> {
    /// First receiver
    pub a: A,
    /// Second receiver
    pub b: B,
}

impl<A, B> Tee<A, B> {
    /// Pair two consumers.
    pub fn new(a: A, b: B) -> Self {
        Tee { a, b }
    }

    /// Split the tee back into its consumers.
    pub fn into_inner(self) -> (A, B) {
        (self.a, self.b)
    }
}

impl<'de, A: Consumer<'de>, B: Consumer<'de>> Consumer<'de> for Tee<A, B> {
    fn null(&mut self) -> Result<(), EventError> {
        self.a.null()?;
        self.b.null()
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.a.boolean(v)?;
        self.b.boolean(v)
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.a.number_i64(v)?;
        self.b.number_i64(v)
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.a.number_u64(v)?;
        self.b.number_u64(v)
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.a.number_f64(v)?;
        self.b.number_f64(v)
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.a.string(v.clone())?;
        self.b.string(v)
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        self.a.binary(v.clone())?;
        self.b.binary(v)
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.a.begin_array(size)?;
        self.b.begin_array(size)
    }

    fn element(&mut self) -> Result<(), EventError> {
        self.a.element()?;
        self.b.element()
    }

    fn end_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.a.end_array(size)?;
        self.b.end_array(size)
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.a.begin_object(size)?;
        self.b.begin_object(size)
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.a.key(v.clone())?;
        self.b.key(v)
    }

    fn member(&mut self) -> Result<(), EventError> {
        self.a.member()?;
        self.b.member()
    }

    fn end_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.a.end_object(size)?;
        self.b.end_object(size)
    }
}
