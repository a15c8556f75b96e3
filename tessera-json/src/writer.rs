//! Compact JSON output.

use core::fmt::{self, Write};
use std::borrow::Cow;

use tessera_format::{Consumer, EventError};

/// Options for [`JsonWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Escape `/` as `\/` (default: false)
    pub escape_slash: bool,

    /// Fail on NaN and infinities instead of writing `null` (default: true)
    pub reject_non_finite: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions::new()
    }
}

impl WriteOptions {
    /// Create new default options.
    pub const fn new() -> Self {
        WriteOptions {
            escape_slash: false,
            reject_non_finite: true,
        }
    }

    /// Escape forward slashes, for embedding output in HTML `<script>` tags.
    pub const fn escape_slash(mut self, escape: bool) -> Self {
        self.escape_slash = escape;
        self
    }

    /// Choose between failing on non-finite doubles and writing `null`.
    pub const fn reject_non_finite(mut self, reject: bool) -> Self {
        self.reject_non_finite = reject;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Ctx {
    Array { first: bool },
    Object { first: bool },
}

/// Consumer that writes compact JSON text.
///
/// ```
/// use std::borrow::Cow;
/// use tessera_format::Consumer;
/// use tessera_json::JsonWriter;
///
/// let mut out = String::new();
/// let mut w = JsonWriter::new(&mut out);
/// w.begin_object(None).unwrap();
/// w.key(Cow::Borrowed("a")).unwrap();
/// w.number_f64(0.5).unwrap();
/// w.member().unwrap();
/// w.end_object(None).unwrap();
/// assert_eq!(out, r#"{"a":0.5}"#);
/// ```
#[derive(Debug)]
pub struct JsonWriter<W> {
    out: W,
    stack: Vec<Ctx>,
    options: WriteOptions,
}

fn write_failed(_: fmt::Error) -> EventError {
    EventError::custom("failed to write JSON output")
}

impl<W: Write> JsonWriter<W> {
    /// Write into `out` with default options.
    pub fn new(out: W) -> Self {
        JsonWriter::with_options(out, WriteOptions::default())
    }

    /// Write into `out` with the given options.
    pub const fn with_options(out: W, options: WriteOptions) -> Self {
        JsonWriter {
            out,
            stack: Vec::new(),
            options,
        }
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn before_value(&mut self) -> Result<(), EventError> {
        if let Some(Ctx::Array { first }) = self.stack.last_mut() {
            if !*first {
                self.out.write_char(',').map_err(write_failed)?;
            }
            *first = false;
        }
        Ok(())
    }

    fn raw(&mut self, s: &str) -> Result<(), EventError> {
        self.before_value()?;
        self.out.write_str(s).map_err(write_failed)
    }

    fn write_json_string(&mut self, s: &str) -> fmt::Result {
        self.out.write_char('"')?;
        let mut run = 0;
        for (i, c) in s.char_indices() {
            let escaped = match c {
                '"' => "\\\"",
                '\\' => "\\\\",
                '\n' => "\\n",
                '\r' => "\\r",
                '\t' => "\\t",
                '\u{08}' => "\\b",
                '\u{0C}' => "\\f",
                '/' if self.options.escape_slash => "\\/",
                c if c.is_ascii_control() => "",
                _ => continue,
            };
            self.out.write_str(&s[run..i])?;
            if escaped.is_empty() {
                write!(self.out, "\\u{:04x}", c as u32)?;
            } else {
                self.out.write_str(escaped)?;
            }
            run = i + c.len_utf8();
        }
        self.out.write_str(&s[run..])?;
        self.out.write_char('"')
    }

    fn open(&mut self, bracket: char, ctx: Ctx) -> Result<(), EventError> {
        self.before_value()?;
        self.out.write_char(bracket).map_err(write_failed)?;
        self.stack.push(ctx);
        Ok(())
    }

    fn close(&mut self, bracket: char) -> Result<(), EventError> {
        self.stack.pop();
        self.out.write_char(bracket).map_err(write_failed)
    }
}

impl<'de, W: Write> Consumer<'de> for JsonWriter<W> {
    fn null(&mut self) -> Result<(), EventError> {
        self.raw("null")
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.raw(if v { "true" } else { "false" })
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.raw(itoa::Buffer::new().format(v))
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.raw(itoa::Buffer::new().format(v))
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        if !v.is_finite() {
            if self.options.reject_non_finite {
                return Err(EventError::NonFiniteNumber);
            }
            return self.raw("null");
        }
        self.raw(ryu::Buffer::new().format_finite(v))
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.before_value()?;
        self.write_json_string(&v).map_err(write_failed)
    }

    fn binary(&mut self, _: Cow<'de, [u8]>) -> Result<(), EventError> {
        Err(EventError::Unsupported {
            what: "binary data in JSON text",
        })
    }

    fn begin_array(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.open('[', Ctx::Array { first: true })
    }

    fn element(&mut self) -> Result<(), EventError> {
        Ok(())
    }

    fn end_array(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.close(']')
    }

    fn begin_object(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.open('{', Ctx::Object { first: true })
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        if let Some(Ctx::Object { first }) = self.stack.last_mut() {
            if !*first {
                self.out.write_char(',').map_err(write_failed)?;
            }
            *first = false;
        }
        self.write_json_string(&v).map_err(write_failed)?;
        self.out.write_char(':').map_err(write_failed)
    }

    fn member(&mut self) -> Result<(), EventError> {
        Ok(())
    }

    fn end_object(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.close('}')
    }
}
