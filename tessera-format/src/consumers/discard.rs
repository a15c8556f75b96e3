use std::borrow::Cow;

use crate::{Consumer, EventError};

/// Consumer that accepts and ignores every event.
///
/// Used to skip values and to check input for well-formedness.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<'de> Consumer<'de> for Discard {
    fn null(&mut self) -> Result<(), EventError> {
        Ok(())
    }
    fn boolean(&mut self, _: bool) -> Result<(), EventError> {
        Ok(())
    }
    fn number_i64(&mut self, _: i64) -> Result<(), EventError> {
        Ok(())
    }
    fn number_u64(&mut self, _: u64) -> Result<(), EventError> {
        Ok(())
    }
    fn number_f64(&mut self, _: f64) -> Result<(), EventError> {
        Ok(())
    }
    fn string(&mut self, _: Cow<'de, str>) -> Result<(), EventError> {
        Ok(())
    }
    fn binary(&mut self, _: Cow<'de, [u8]>) -> Result<(), EventError> {
        Ok(())
    }
    fn begin_array(&mut self, _: Option<usize>) -> Result<(), EventError> {
        Ok(())
    }
    fn element(&mut self) -> Result<(), EventError> {
        Ok(())
    }
    fn end_array(&mut self, _: Option<usize>) -> Result<(), EventError> {
        Ok(())
    }
    fn begin_object(&mut self, _: Option<usize>) -> Result<(), EventError> {
        Ok(())
    }
    fn key(&mut self, _: Cow<'de, str>) -> Result<(), EventError> {
        Ok(())
    }
    fn member(&mut self) -> Result<(), EventError> {
        Ok(())
    }
    fn end_object(&mut self, _: Option<usize>) -> Result<(), EventError> {
        Ok(())
    }
}
