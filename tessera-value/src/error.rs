//! Errors raised by the value model.

use core::fmt::{self, Display};

use crate::ValueType;

/// Error raised when a value is accessed or navigated in a way its current
/// contents do not allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value holds a different kind than the operation requires.
    TypeMismatch {
        /// The kind the operation needs
        expected: ValueType,
        /// The kind actually held
        actual: ValueType,
    },
    /// Array index past the end.
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The array length
        len: usize,
    },
    /// Object has no member with this key.
    KeyNotFound {
        /// The missing key
        key: String,
    },
    /// Object already has a member with this key.
    DuplicateKey {
        /// The key that already exists
        key: String,
    },
    /// A pointer token tried to step into a scalar.
    InvalidPath {
        /// The token that could not be resolved
        token: String,
        /// The kind found where a container was needed
        actual: ValueType,
    },
    /// A JSON Pointer string is malformed or not usable for the operation.
    InvalidPointer {
        /// The pointer text
        pointer: String,
        /// What is wrong with it
        reason: &'static str,
    },
    /// A pointer token used on an array is not a valid index.
    InvalidArrayIndex {
        /// The offending token
        token: String,
    },
}

impl ValueError {
    pub(crate) const fn mismatch(expected: ValueType, actual: ValueType) -> Self {
        ValueError::TypeMismatch { expected, actual }
    }

    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            ValueError::TypeMismatch { .. } => "value::type_mismatch",
            ValueError::IndexOutOfRange { .. } => "value::index_out_of_range",
            ValueError::KeyNotFound { .. } => "value::key_not_found",
            ValueError::DuplicateKey { .. } => "value::duplicate_key",
            ValueError::InvalidPath { .. } => "value::invalid_path",
            ValueError::InvalidPointer { .. } => "value::invalid_pointer",
            ValueError::InvalidArrayIndex { .. } => "value::invalid_array_index",
        }
    }
}

impl Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::TypeMismatch { expected, actual } => {
                write!(f, "invalid value type, expected {expected} but found {actual}")
            }
            ValueError::IndexOutOfRange { index, len } => {
                write!(f, "array index {index} out of range for array of length {len}")
            }
            ValueError::KeyNotFound { key } => write!(f, "object key `{key}` not found"),
            ValueError::DuplicateKey { key } => write!(f, "duplicate object key `{key}`"),
            ValueError::InvalidPath { token, actual } => write!(
                f,
                "unable to resolve token `{token}`: value type is {actual}, neither object nor array"
            ),
            ValueError::InvalidPointer { pointer, reason } => {
                write!(f, "invalid JSON Pointer `{pointer}`: {reason}")
            }
            ValueError::InvalidArrayIndex { token } => {
                write!(f, "invalid token `{token}` for array access")
            }
        }
    }
}

impl std::error::Error for ValueError {}
