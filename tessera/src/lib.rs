#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

//! A JSON-family value model and the grammars that feed it.
//!
//! [`Value`] holds anything JSON, CBOR or MessagePack can say (plus raw
//! binary and borrowed views). Every grammar reports what it reads to a
//! [`Consumer`]; building a [`Value`] is just one consumer among others,
//! and the writers are consumers too, so converting between formats never
//! needs an intermediate tree.
//!
//! Each format lives in its own module behind a cargo feature of the same
//! name (all enabled by default).
//!
//! ```
//! # #[cfg(all(feature = "json", feature = "cbor"))] {
//! use tessera::{Value, value};
//!
//! let v: Value = tessera::json::from_str(r#"{"id": 7, "tags": ["a"]}"#).unwrap();
//! assert_eq!(v, value!({ "id": 7, "tags": ["a"] }));
//!
//! // JSON text straight to CBOR, without building a value
//! let mut cbor = tessera::cbor::CborWriter::new();
//! tessera::json::parse_into(b"[1, 2]", &mut cbor).unwrap();
//! assert_eq!(cbor.into_bytes(), [0x9f, 0x01, 0x02, 0xff]);
//! # }
//! ```

pub use tessera_format::{
    AtOffset, BinaryToHex, Consumer, ContainerState, DEFAULT_MAX_DEPTH, DebugEvents, DepthGuard,
    Discard, Event, EventError, Input, Marker, ParseError, ParseErrorKind, ParseOptions,
    PartsParser, Position, PreferSigned, Recorder, Span, Tee, ValidateEventOrder,
};
pub use tessera_value::{
    Array, DuplicateKeys, Object, Opaque, OpaquePtr, Pointer, ToValue, ToViewValue, Token, Value,
    ValueError, ValueIndex, ValueType, value,
};

/// JSON text.
#[cfg(feature = "json")]
pub use tessera_json as json;

/// CBOR (RFC 8949).
#[cfg(feature = "cbor")]
pub use tessera_cbor as cbor;

/// MessagePack.
#[cfg(feature = "msgpack")]
pub use tessera_msgpack as msgpack;
