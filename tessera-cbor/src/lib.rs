#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

//! CBOR (RFC 8949) for tessera.
//!
//! The grammar reports every data item to a [`Consumer`]; the `from_*`
//! functions plug in a value builder for you. Definite-length arrays and
//! maps pass their length to the consumer as a size hint, indefinite-length
//! ones pass `None`. Tags are read and dropped. Map keys must be text
//! strings (byte strings holding UTF-8 are accepted too).
//!
//! ```
//! use tessera_value::value;
//!
//! let v = tessera_cbor::from_slice(&[0x9f, 0x01, 0x02, 0xff]).unwrap();
//! assert_eq!(v, value!([1, 2]));
//! assert_eq!(tessera_cbor::to_vec(&v).unwrap(), [0x82, 0x01, 0x02]);
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
mod major;
mod parts;
mod writer;

use std::io::Read;
use std::path::Path;

pub use parts::CborPartsParser;
use tessera_format::EventError;
pub use tessera_format::{Consumer, ParseError, ParseOptions};
use tessera_value::{ToValue, ToViewValue, Value};
pub use writer::CborWriter;

/// Parse one CBOR data item, reporting every event to `consumer`.
///
/// Definite-length strings are lent to the consumer for `'de`.
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
    trace!(len = input.len(), max_depth = options.max_depth, "parsing CBOR");
    grammar::Parser::new(input, options)
        .document(consumer)
        .inspect_err(|_e| {
            debug!(error = %_e, "CBOR parse failed");
        })
}

/// Parse CBOR bytes into an owned value.
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

/// Parse CBOR bytes into a value that borrows definite-length strings from `input`.
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
    trace!(path = %path.display(), "reading CBOR file");
    let buf = std::fs::read(path)?;
    from_slice_with_options(&buf, options)
}

/// Encode `value` as CBOR.
pub fn to_vec(value: &Value<'_>) -> Result<Vec<u8>, EventError> {
    let mut writer = CborWriter::new();
    value.produce(&mut writer)?;
    Ok(writer.into_bytes())
}
