#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

//! JSON text for tessera.
//!
//! Parsing follows RFC 8259 strictly and reports what it matches to any
//! [`Consumer`]; the `from_*` functions plug in a value builder for you.
//! Integers keep their signedness (`-1` is a signed integer, `1` an
//! unsigned one), and numbers with a fraction or exponent are converted
//! with correct rounding however many digits they have.
//!
//! ```
//! let v = tessera_json::from_str(r#"{"name": "tessera", "ids": [1, -2, 3.5]}"#).unwrap();
//! assert_eq!(v["ids"][1], -2);
//! assert_eq!(tessera_json::to_string(&v).unwrap(), r#"{"name":"tessera","ids":[1,-2,3.5]}"#);
//! ```

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(any(test, feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(any(test, feature = "tracing")))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(any(test, feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(any(test, feature = "tracing")))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;

mod grammar;
mod number;
mod parts;
mod string;
mod writer;

use std::io::Read;
use std::path::Path;

pub use parts::JsonPartsParser;
pub use tessera_format::{Consumer, ParseError, ParseOptions};
use tessera_format::EventError;
use tessera_value::{ToValue, ToViewValue, Value};
pub use writer::{JsonWriter, WriteOptions};

/// Parse JSON text, reporting every event to `consumer`.
///
/// Strings without escapes are lent to the consumer for `'de`.
pub fn parse_into<'de, C: Consumer<'de> + ?Sized>(
    input: &'de [u8],
    consumer: &mut C,
) -> Result<(), ParseError> {
    parse_into_with_options(input, consumer, &ParseOptions::default())
}

/// [`parse_into`] with explicit options.
pub fn parse_into_with_options<'de, C: Consumer<'de> + ?Sized>(
    input: &'de [u8],
    consumer: &mut C,
    options: &ParseOptions,
) -> Result<(), ParseError> {
    trace!(len = input.len(), max_depth = options.max_depth, "parsing JSON");
    grammar::Parser::new(input, options)
        .text(consumer)
        .inspect_err(|_e| {
            debug!(error = %_e, "JSON parse failed");
        })
}

/// Parse JSON text into an owned value.
pub fn from_str(input: &str) -> Result<Value<'static>, ParseError> {
    from_slice(input.as_bytes())
}

/// [`from_str`] with explicit options.
pub fn from_str_with_options(
    input: &str,
    options: &ParseOptions,
) -> Result<Value<'static>, ParseError> {
    from_slice_with_options(input.as_bytes(), options)
}

/// Parse JSON bytes into an owned value.
pub fn from_slice(input: &[u8]) -> Result<Value<'static>, ParseError> {
    from_slice_with_options(input, &ParseOptions::default())
}

/// [`from_slice`] with explicit options.
pub fn from_slice_with_options(
    input: &[u8],
    options: &ParseOptions,
) -> Result<Value<'static>, ParseError> {
    let mut builder = ToValue::new();
    parse_into_with_options(input, &mut builder, options)?;
    Ok(builder.into_value())
}

/// Parse JSON text into a value that borrows unescaped strings from `input`.
pub fn from_str_borrowed(input: &str) -> Result<Value<'_>, ParseError> {
    from_slice_borrowed(input.as_bytes())
}

/// [`from_str_borrowed`] with explicit options.
pub fn from_str_borrowed_with_options<'de>(
    input: &'de str,
    options: &ParseOptions,
) -> Result<Value<'de>, ParseError> {
    from_slice_borrowed_with_options(input.as_bytes(), options)
}

/// Parse JSON bytes into a value that borrows unescaped strings from `input`.
pub fn from_slice_borrowed(input: &[u8]) -> Result<Value<'_>, ParseError> {
    from_slice_borrowed_with_options(input, &ParseOptions::default())
}

/// [`from_slice_borrowed`] with explicit options.
pub fn from_slice_borrowed_with_options<'de>(
    input: &'de [u8],
    options: &ParseOptions,
) -> Result<Value<'de>, ParseError> {
    let mut builder = ToViewValue::new();
    parse_into_with_options(input, &mut builder, options)?;
    Ok(builder.into_value())
}

/// Read everything from `reader` and parse it.
pub fn from_reader<R: Read>(reader: R) -> Result<Value<'static>, ParseError> {
    from_reader_with_options(reader, &ParseOptions::default())
}

/// [`from_reader`] with explicit options.
pub fn from_reader_with_options<R: Read>(
    mut reader: R,
    options: &ParseOptions,
) -> Result<Value<'static>, ParseError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    from_slice_with_options(&buf, options)
}

/// Read and parse a file.
pub fn from_file(path: impl AsRef<Path>) -> Result<Value<'static>, ParseError> {
    from_file_with_options(path, &ParseOptions::default())
}

/// [`from_file`] with explicit options.
pub fn from_file_with_options(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<Value<'static>, ParseError> {
    let path = path.as_ref();
    trace!(path = %path.display(), "reading JSON file");
    let buf = std::fs::read(path)?;
    from_slice_with_options(&buf, options)
}

/// Write `value` as compact JSON.
pub fn to_string(value: &Value<'_>) -> Result<String, EventError> {
    to_string_with_options(value, WriteOptions::default())
}

/// [`to_string`] with explicit options.
pub fn to_string_with_options(
    value: &Value<'_>,
    options: WriteOptions,
) -> Result<String, EventError> {
    let mut out = String::new();
    value.produce(&mut JsonWriter::with_options(&mut out, options))?;
    Ok(out)
}

/// Write `value` as compact JSON into an I/O sink.
pub fn to_writer<W: std::io::Write>(mut writer: W, value: &Value<'_>) -> std::io::Result<()> {
    let text = to_string(value).map_err(std::io::Error::other)?;
    writer.write_all(text.as_bytes())
}
