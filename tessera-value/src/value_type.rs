use core::fmt;

/// The kind of a [`Value`](crate::Value).
///
/// Declaration order is significant: values of unrelated kinds are ordered
/// by their kind, after merging the representations that compare by content
/// (see [`ValueType::rank`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// Freshly constructed, never assigned.
    Uninitialized,
    /// Moved out of with [`Value::take`](crate::Value::take).
    Discarded,
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// `i64`
    Signed,
    /// `u64`
    Unsigned,
    /// `f64`
    Double,
    /// Owned text
    String,
    /// Borrowed text
    StringView,
    /// Owned bytes
    Binary,
    /// Borrowed bytes
    BinaryView,
    /// Sequence of values
    Array,
    /// Key/value map
    Object,
    /// Reference to another value
    ValuePtr,
    /// Reference to a native object that produces events on demand
    OpaquePtr,
}

impl ValueType {
    /// Lowercase name, as used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Uninitialized => "uninitialized",
            ValueType::Discarded => "discarded",
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Signed => "signed",
            ValueType::Unsigned => "unsigned",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::StringView => "string_view",
            ValueType::Binary => "binary",
            ValueType::BinaryView => "binary_view",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::ValuePtr => "value_ptr",
            ValueType::OpaquePtr => "opaque_ptr",
        }
    }

    /// The kind used when ordering values of different kinds.
    ///
    /// The three numeric kinds share one rank, as do owned and borrowed
    /// strings and owned and borrowed binaries.
    pub const fn rank(self) -> ValueType {
        match self {
            ValueType::Unsigned | ValueType::Double => ValueType::Signed,
            ValueType::StringView => ValueType::String,
            ValueType::BinaryView => ValueType::Binary,
            other => other,
        }
    }

    /// Signed, unsigned or double.
    pub const fn is_number(self) -> bool {
        matches!(self, ValueType::Signed | ValueType::Unsigned | ValueType::Double)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
