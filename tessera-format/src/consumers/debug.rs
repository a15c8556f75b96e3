use core::fmt::{self, Write};
use std::borrow::Cow;

use crate::{Consumer, EventError};

/// Consumer that writes one line per event, for debugging and snapshot tests.
///
/// ```
/// use tessera_format::{Consumer, DebugEvents};
///
/// let mut out = String::new();
/// let mut debug = DebugEvents::new(&mut out);
/// debug.begin_array(Some(1)).unwrap();
/// debug.boolean(true).unwrap();
/// debug.element().unwrap();
/// debug.end_array(Some(1)).unwrap();
/// assert_eq!(out, "begin array 1\nboolean: true\nelement\nend array 1\n");
/// ```
#[derive(Debug)]
pub struct DebugEvents<W> {
    out: W,
}

impl<W: Write> DebugEvents<W> {
    /// Write events to `out`.
    pub fn new(out: W) -> Self {
        DebugEvents { out }
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) -> Result<(), EventError> {
        self.out
            .write_fmt(args)
            .and_then(|()| self.out.write_char('\n'))
            .map_err(|_| EventError::custom("failed to write debug output"))
    }

    fn sized(&mut self, what: &str, size: Option<usize>) -> Result<(), EventError> {
        match size {
            Some(n) => self.line(format_args!("{what} {n}")),
            None => self.line(format_args!("{what}")),
        }
    }
}

impl<'de, W: Write> Consumer<'de> for DebugEvents<W> {
    fn null(&mut self) -> Result<(), EventError> {
        self.line(format_args!("null"))
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.line(format_args!("boolean: {v}"))
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.line(format_args!("i64: {v}"))
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.line(format_args!("u64: {v}"))
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.line(format_args!("f64: {v:?}"))
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.line(format_args!("string: \"{}\"", v.escape_debug()))
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        let mut hex = String::with_capacity(v.len() * 2);
        for b in v.iter() {
            let _ = write!(hex, "{b:02x}");
        }
        self.line(format_args!("binary: {hex}"))
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.sized("begin array", size)
    }

    fn element(&mut self) -> Result<(), EventError> {
        self.line(format_args!("element"))
    }

    fn end_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.sized("end array", size)
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.sized("begin object", size)
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.line(format_args!("key: \"{}\"", v.escape_debug()))
    }

    fn member(&mut self) -> Result<(), EventError> {
        self.line(format_args!("member"))
    }

    fn end_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.sized("end object", size)
    }
}
