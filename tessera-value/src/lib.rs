#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

//! A JSON-family value type.
//!
//! [`Value`] holds null, booleans, signed and unsigned integers, doubles,
//! strings, binary data, arrays and objects, plus four kinds that borrow
//! instead of own:
//!
//! - **views** ([`Value::StringView`], [`Value::BinaryView`]) alias text or
//!   bytes owned elsewhere, usually the buffer a value was parsed from;
//! - **value pointers** ([`Value::ValuePtr`]) share another value in place;
//! - **opaque pointers** ([`Value::OpaquePtr`]) refer to a native object
//!   implementing [`Opaque`] that produces its own events on demand.
//!
//! Values are built by hand, with [`value!`], or from any format parser via
//! the [`ToValue`] and [`ToViewValue`] consumers, and turned back into events
//! with [`Value::produce`]. Navigation accepts indices, keys and JSON
//! [`Pointer`]s.
//!
//! ```
//! use tessera_value::{Pointer, Value, value};
//!
//! let mut v = value!({ "servers": [{ "port": 8080 }] });
//! let port: Pointer = "/servers/0/port".parse().unwrap();
//! assert_eq!(v.at(&port).unwrap(), &8080);
//!
//! v["servers"][0]["host"] = Value::from("localhost");
//! assert_eq!(v.pointer(&"/servers/0/host".parse().unwrap()).unwrap(), "localhost");
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

#[allow(unused_imports)]
pub(crate) use trace;

mod macros;

mod value_type;
pub use value_type::ValueType;

mod error;
pub use error::ValueError;

mod value;
pub use value::{Array, Object, Value};

mod opaque;
pub use opaque::{Opaque, OpaquePtr};

mod to_value;
pub use to_value::{DuplicateKeys, ToValue, ToViewValue};

mod produce;

mod pointer;
pub use pointer::{Pointer, Token};

mod navigate;
pub use navigate::ValueIndex;

mod compare;
mod from;
