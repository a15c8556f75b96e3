//! The [`Value`] sum type: kinds, predicates, accessors and assignment.

use indexmap::IndexMap;

use crate::{Opaque, OpaquePtr, ValueError, ValueType, trace};

/// Members of an object value, in insertion order.
pub type Object<'a> = IndexMap<String, Value<'a>>;

/// Elements of an array value.
pub type Array<'a> = Vec<Value<'a>>;

/// A JSON-family value.
///
/// Besides the usual JSON kinds, a value can hold integers with their
/// signedness preserved, binary data, and four borrowing kinds:
///
/// - [`Value::StringView`] and [`Value::BinaryView`] alias bytes owned
///   elsewhere, typically the input buffer of a parse;
/// - [`Value::ValuePtr`] aliases another value, so a template can be shared
///   between several trees without copying;
/// - [`Value::OpaquePtr`] aliases a native object that knows how to produce
///   events for itself, deferring conversion until someone reads it.
///
/// All four borrow for `'a`, so a value can never outlive what it points
/// to. Reads ([`Value::get_boolean`], comparisons, [`Value::produce`]) see
/// through value pointers; mutation does not.
///
/// [`Value::Uninitialized`] is the [`Default`]. Moving out with
/// [`Value::take`] leaves [`Value::Discarded`] behind; reading a discarded
/// value is a logic error that debug builds catch with an assertion.
#[derive(Debug, Clone, Default)]
pub enum Value<'a> {
    /// Freshly constructed, never assigned.
    #[default]
    Uninitialized,
    /// Moved out of; only assignment or drop is allowed.
    Discarded,
    /// `null`
    Null,
    /// A boolean
    Boolean(bool),
    /// A signed integer
    Signed(i64),
    /// An unsigned integer
    Unsigned(u64),
    /// A double
    Double(f64),
    /// Owned text
    String(String),
    /// Borrowed text
    StringView(&'a str),
    /// Owned bytes
    Binary(Vec<u8>),
    /// Borrowed bytes
    BinaryView(&'a [u8]),
    /// An array
    Array(Array<'a>),
    /// An object with unique keys
    Object(Object<'a>),
    /// A reference to another value
    ValuePtr(&'a Value<'a>),
    /// A reference to a native object that produces its own events
    OpaquePtr(OpaquePtr<'a>),
}

macro_rules! predicates {
    ($($(#[$meta:meta])* $name:ident => $variant:ident;)*) => {
        $(
            $(#[$meta])*
            #[inline]
            pub const fn $name(&self) -> bool {
                matches!(self, Value::$variant { .. })
            }
        )*
    };
}

impl<'a> Value<'a> {
    /// A value pointing at `target`.
    pub const fn value_ptr(target: &'a Value<'a>) -> Self {
        Value::ValuePtr(target)
    }

    /// A value pointing at a native object.
    pub fn opaque(target: &'a dyn Opaque) -> Self {
        Value::OpaquePtr(OpaquePtr::new(target))
    }

    /// An empty array.
    pub const fn empty_array() -> Self {
        Value::Array(Vec::new())
    }

    /// An empty object.
    pub fn empty_object() -> Self {
        Value::Object(IndexMap::new())
    }

    /// The kind currently held.
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Uninitialized => ValueType::Uninitialized,
            Value::Discarded => ValueType::Discarded,
            Value::Null => ValueType::Null,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Signed(_) => ValueType::Signed,
            Value::Unsigned(_) => ValueType::Unsigned,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::StringView(_) => ValueType::StringView,
            Value::Binary(_) => ValueType::Binary,
            Value::BinaryView(_) => ValueType::BinaryView,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
            Value::ValuePtr(_) => ValueType::ValuePtr,
            Value::OpaquePtr(_) => ValueType::OpaquePtr,
        }
    }

    predicates! {
        /// Never assigned.
        is_uninitialized => Uninitialized;
        /// Moved out of.
        is_discarded => Discarded;
        /// `null`.
        is_null => Null;
        /// A boolean.
        is_boolean => Boolean;
        /// A signed integer.
        is_signed => Signed;
        /// An unsigned integer.
        is_unsigned => Unsigned;
        /// A double.
        is_double => Double;
        /// Owned text.
        is_string => String;
        /// Borrowed text.
        is_string_view => StringView;
        /// Owned bytes.
        is_binary => Binary;
        /// Borrowed bytes.
        is_binary_view => BinaryView;
        /// An array.
        is_array => Array;
        /// An object.
        is_object => Object;
        /// A value pointer.
        is_value_ptr => ValuePtr;
        /// An opaque pointer.
        is_opaque_ptr => OpaquePtr;
    }

    /// Signed or unsigned integer.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Signed(_) | Value::Unsigned(_))
    }

    /// Any of the numeric kinds.
    pub const fn is_number(&self) -> bool {
        self.value_type().is_number()
    }

    /// Owned or borrowed text.
    pub const fn is_string_type(&self) -> bool {
        matches!(self, Value::String(_) | Value::StringView(_))
    }

    /// Owned or borrowed bytes.
    pub const fn is_binary_type(&self) -> bool {
        matches!(self, Value::Binary(_) | Value::BinaryView(_))
    }

    /// Neither uninitialized nor discarded.
    pub const fn is_initialized(&self) -> bool {
        !matches!(self, Value::Uninitialized | Value::Discarded)
    }

    /// Follow value pointers until reaching a value that is not one.
    pub fn skip_value_ptr(&self) -> &Value<'a> {
        let mut current = self;
        while let Value::ValuePtr(target) = current {
            current = target;
        }
        current
    }

    #[inline]
    #[track_caller]
    pub(crate) fn check_live(&self) {
        debug_assert!(
            !self.is_discarded(),
            "attempt to use a discarded value (it was moved out of)"
        );
    }

    #[inline]
    #[track_caller]
    fn read(&self) -> &Value<'a> {
        self.check_live();
        let target = self.skip_value_ptr();
        target.check_live();
        target
    }

    #[inline]
    fn mismatch(&self, expected: ValueType) -> ValueError {
        ValueError::mismatch(expected, self.value_type())
    }

    /// The boolean held, seeing through value pointers.
    #[track_caller]
    pub fn get_boolean(&self) -> Result<bool, ValueError> {
        match self.read() {
            Value::Boolean(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Boolean)),
        }
    }

    /// The signed integer held, seeing through value pointers.
    #[track_caller]
    pub fn get_signed(&self) -> Result<i64, ValueError> {
        match self.read() {
            Value::Signed(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Signed)),
        }
    }

    /// The unsigned integer held, seeing through value pointers.
    #[track_caller]
    pub fn get_unsigned(&self) -> Result<u64, ValueError> {
        match self.read() {
            Value::Unsigned(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Unsigned)),
        }
    }

    /// The double held, seeing through value pointers.
    #[track_caller]
    pub fn get_double(&self) -> Result<f64, ValueError> {
        match self.read() {
            Value::Double(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Double)),
        }
    }

    /// The owned string held, seeing through value pointers.
    #[track_caller]
    pub fn get_string(&self) -> Result<&str, ValueError> {
        match self.read() {
            Value::String(v) => Ok(v),
            other => Err(other.mismatch(ValueType::String)),
        }
    }

    /// The string view held, seeing through value pointers.
    #[track_caller]
    pub fn get_string_view(&self) -> Result<&'a str, ValueError> {
        match self.read() {
            Value::StringView(v) => Ok(v),
            other => Err(other.mismatch(ValueType::StringView)),
        }
    }

    /// The text held, owned or borrowed, seeing through value pointers.
    #[track_caller]
    pub fn get_string_type(&self) -> Result<&str, ValueError> {
        match self.read() {
            Value::String(v) => Ok(v),
            Value::StringView(v) => Ok(v),
            other => Err(other.mismatch(ValueType::String)),
        }
    }

    /// The owned bytes held, seeing through value pointers.
    #[track_caller]
    pub fn get_binary(&self) -> Result<&[u8], ValueError> {
        match self.read() {
            Value::Binary(v) => Ok(v),
            other => Err(other.mismatch(ValueType::Binary)),
        }
    }

    /// The binary view held, seeing through value pointers.
    #[track_caller]
    pub fn get_binary_view(&self) -> Result<&'a [u8], ValueError> {
        match self.read() {
            Value::BinaryView(v) => Ok(v),
            other => Err(other.mismatch(ValueType::BinaryView)),
        }
    }

    /// The bytes held, owned or borrowed, seeing through value pointers.
    #[track_caller]
    pub fn get_binary_type(&self) -> Result<&[u8], ValueError> {
        match self.read() {
            Value::Binary(v) => Ok(v),
            Value::BinaryView(v) => Ok(v),
            other => Err(other.mismatch(ValueType::Binary)),
        }
    }

    /// The array held, seeing through value pointers.
    #[track_caller]
    pub fn get_array(&self) -> Result<&Array<'a>, ValueError> {
        match self.read() {
            Value::Array(v) => Ok(v),
            other => Err(other.mismatch(ValueType::Array)),
        }
    }

    /// The array held, for mutation. Value pointers are not followed.
    #[track_caller]
    pub fn get_array_mut(&mut self) -> Result<&mut Array<'a>, ValueError> {
        self.check_live();
        match self {
            Value::Array(v) => Ok(v),
            other => Err(other.mismatch(ValueType::Array)),
        }
    }

    /// The object held, seeing through value pointers.
    #[track_caller]
    pub fn get_object(&self) -> Result<&Object<'a>, ValueError> {
        match self.read() {
            Value::Object(v) => Ok(v),
            other => Err(other.mismatch(ValueType::Object)),
        }
    }

    /// The object held, for mutation. Value pointers are not followed.
    #[track_caller]
    pub fn get_object_mut(&mut self) -> Result<&mut Object<'a>, ValueError> {
        self.check_live();
        match self {
            Value::Object(v) => Ok(v),
            other => Err(other.mismatch(ValueType::Object)),
        }
    }

    /// The value pointed at. Only this accessor does not follow the pointer.
    #[track_caller]
    pub fn get_value_ptr(&self) -> Result<&'a Value<'a>, ValueError> {
        self.check_live();
        match self {
            Value::ValuePtr(v) => Ok(v),
            other => Err(other.mismatch(ValueType::ValuePtr)),
        }
    }

    /// The opaque pointer held, seeing through value pointers.
    #[track_caller]
    pub fn get_opaque_ptr(&self) -> Result<OpaquePtr<'a>, ValueError> {
        match self.read() {
            Value::OpaquePtr(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::OpaquePtr)),
        }
    }

    /// The boolean held, if any.
    pub fn as_bool(&self) -> Option<bool> {
        self.get_boolean().ok()
    }

    /// The number held, if it is an integer representable as `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self.read() {
            Value::Signed(v) => Some(*v),
            Value::Unsigned(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// The number held, if it is an integer representable as `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self.read() {
            Value::Signed(v) => u64::try_from(*v).ok(),
            Value::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    /// The number held, converted to `f64` (possibly rounding large integers).
    pub fn as_f64(&self) -> Option<f64> {
        match self.read() {
            Value::Signed(v) => Some(*v as f64),
            Value::Unsigned(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// The text held, owned or borrowed.
    pub fn as_str(&self) -> Option<&str> {
        self.get_string_type().ok()
    }

    /// The bytes held, owned or borrowed.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.get_binary_type().ok()
    }

    /// The array held.
    pub fn as_array(&self) -> Option<&Array<'a>> {
        self.get_array().ok()
    }

    /// The array held, for mutation.
    pub fn as_array_mut(&mut self) -> Option<&mut Array<'a>> {
        self.get_array_mut().ok()
    }

    /// The object held.
    pub fn as_object(&self) -> Option<&Object<'a>> {
        self.get_object().ok()
    }

    /// The object held, for mutation.
    pub fn as_object_mut(&mut self) -> Option<&mut Object<'a>> {
        self.get_object_mut().ok()
    }

    /// Replace the contents with `v`.
    pub fn assign(&mut self, v: impl Into<Value<'a>>) {
        *self = v.into();
    }

    /// Replace the contents with `null`.
    pub fn assign_null(&mut self) {
        *self = Value::Null;
    }

    /// Replace the contents with a boolean.
    pub fn assign_boolean(&mut self, v: bool) {
        *self = Value::Boolean(v);
    }

    /// Replace the contents with a signed integer.
    pub fn assign_signed(&mut self, v: i64) {
        *self = Value::Signed(v);
    }

    /// Replace the contents with an unsigned integer.
    pub fn assign_unsigned(&mut self, v: u64) {
        *self = Value::Unsigned(v);
    }

    /// Replace the contents with a double.
    pub fn assign_double(&mut self, v: f64) {
        *self = Value::Double(v);
    }

    /// Replace the contents with owned text.
    pub fn assign_string(&mut self, v: impl Into<String>) {
        *self = Value::String(v.into());
    }

    /// Replace the contents with borrowed text.
    pub fn assign_string_view(&mut self, v: &'a str) {
        *self = Value::StringView(v);
    }

    /// Replace the contents with owned bytes.
    pub fn assign_binary(&mut self, v: impl Into<Vec<u8>>) {
        *self = Value::Binary(v.into());
    }

    /// Replace the contents with borrowed bytes.
    pub fn assign_binary_view(&mut self, v: &'a [u8]) {
        *self = Value::BinaryView(v);
    }

    /// Replace the contents with an array.
    pub fn assign_array(&mut self, v: Array<'a>) {
        *self = Value::Array(v);
    }

    /// Replace the contents with an object.
    pub fn assign_object(&mut self, v: Object<'a>) {
        *self = Value::Object(v);
    }

    /// Replace the contents with a pointer to `target`.
    pub fn assign_value_ptr(&mut self, target: &'a Value<'a>) {
        *self = Value::ValuePtr(target);
    }

    /// Replace the contents with a pointer to a native object.
    pub fn assign_opaque_ptr(&mut self, target: &'a dyn Opaque) {
        *self = Value::opaque(target);
    }

    #[inline]
    #[track_caller]
    fn check_empty(&self) {
        debug_assert!(
            !self.is_initialized(),
            "emplace into a value that already holds {}",
            self.value_type()
        );
    }

    /// Store `null` into a value known to be empty.
    #[track_caller]
    pub fn emplace_null(&mut self) {
        self.check_empty();
        *self = Value::Null;
    }

    /// Store a boolean into a value known to be empty.
    #[track_caller]
    pub fn emplace_boolean(&mut self, v: bool) {
        self.check_empty();
        *self = Value::Boolean(v);
    }

    /// Store a signed integer into a value known to be empty.
    #[track_caller]
    pub fn emplace_signed(&mut self, v: i64) {
        self.check_empty();
        *self = Value::Signed(v);
    }

    /// Store an unsigned integer into a value known to be empty.
    #[track_caller]
    pub fn emplace_unsigned(&mut self, v: u64) {
        self.check_empty();
        *self = Value::Unsigned(v);
    }

    /// Store a double into a value known to be empty.
    #[track_caller]
    pub fn emplace_double(&mut self, v: f64) {
        self.check_empty();
        *self = Value::Double(v);
    }

    /// Store owned text into a value known to be empty.
    #[track_caller]
    pub fn emplace_string(&mut self, v: impl Into<String>) -> &mut String {
        self.check_empty();
        *self = Value::String(v.into());
        match self {
            Value::String(s) => s,
            _ => unreachable!(),
        }
    }

    /// Store borrowed text into a value known to be empty.
    #[track_caller]
    pub fn emplace_string_view(&mut self, v: &'a str) {
        self.check_empty();
        *self = Value::StringView(v);
    }

    /// Store owned bytes into a value known to be empty.
    #[track_caller]
    pub fn emplace_binary(&mut self, v: impl Into<Vec<u8>>) -> &mut Vec<u8> {
        self.check_empty();
        *self = Value::Binary(v.into());
        match self {
            Value::Binary(b) => b,
            _ => unreachable!(),
        }
    }

    /// Store borrowed bytes into a value known to be empty.
    #[track_caller]
    pub fn emplace_binary_view(&mut self, v: &'a [u8]) {
        self.check_empty();
        *self = Value::BinaryView(v);
    }

    /// Store an empty array into a value known to be empty.
    #[track_caller]
    pub fn emplace_array(&mut self) -> &mut Array<'a> {
        self.check_empty();
        *self = Value::Array(Vec::new());
        match self {
            Value::Array(a) => a,
            _ => unreachable!(),
        }
    }

    /// Store an empty object into a value known to be empty.
    #[track_caller]
    pub fn emplace_object(&mut self) -> &mut Object<'a> {
        self.check_empty();
        *self = Value::Object(IndexMap::new());
        match self {
            Value::Object(o) => o,
            _ => unreachable!(),
        }
    }

    /// Store a value pointer into a value known to be empty.
    #[track_caller]
    pub fn emplace_value_ptr(&mut self, target: &'a Value<'a>) {
        self.check_empty();
        *self = Value::ValuePtr(target);
    }

    /// Store an opaque pointer into a value known to be empty.
    #[track_caller]
    pub fn emplace_opaque_ptr(&mut self, target: &'a dyn Opaque) {
        self.check_empty();
        *self = Value::opaque(target);
    }

    /// Move the contents out, leaving [`Value::Discarded`] behind.
    pub fn take(&mut self) -> Value<'a> {
        core::mem::replace(self, Value::Discarded)
    }

    /// Drop the contents, leaving [`Value::Discarded`] behind.
    pub fn discard(&mut self) {
        *self = Value::Discarded;
    }

    /// Drop the contents, leaving [`Value::Uninitialized`] behind.
    pub fn reset(&mut self) {
        *self = Value::Uninitialized;
    }

    /// Make this value an array if it is empty, and return the array.
    ///
    /// Fails with [`ValueError::TypeMismatch`] if the value holds anything
    /// other than an array.
    pub fn prepare_array(&mut self) -> Result<&mut Array<'a>, ValueError> {
        if !self.is_initialized() {
            trace!(from = %self.value_type(), "auto-vivifying array");
            *self = Value::Array(Vec::new());
        }
        match self {
            Value::Array(a) => Ok(a),
            other => Err(other.mismatch(ValueType::Array)),
        }
    }

    /// Make this value an object if it is empty, and return the object.
    ///
    /// Fails with [`ValueError::TypeMismatch`] if the value holds anything
    /// other than an object.
    pub fn prepare_object(&mut self) -> Result<&mut Object<'a>, ValueError> {
        if !self.is_initialized() {
            trace!(from = %self.value_type(), "auto-vivifying object");
            *self = Value::Object(IndexMap::new());
        }
        match self {
            Value::Object(o) => Ok(o),
            other => Err(other.mismatch(ValueType::Object)),
        }
    }

    /// Append to an array, turning an empty value into one first.
    pub fn push_back(&mut self, v: impl Into<Value<'a>>) -> Result<(), ValueError> {
        self.prepare_array()?.push(v.into());
        Ok(())
    }

    /// Like [`Value::push_back`], returning the new element.
    pub fn emplace_back(&mut self, v: impl Into<Value<'a>>) -> Result<&mut Value<'a>, ValueError> {
        let array = self.prepare_array()?;
        array.push(v.into());
        let last = array.len() - 1;
        Ok(&mut array[last])
    }

    /// Add a member to an object, turning an empty value into one first.
    ///
    /// Fails with [`ValueError::DuplicateKey`] if the key is already present;
    /// the object is left unchanged in that case.
    pub fn emplace(
        &mut self,
        key: impl Into<String>,
        v: impl Into<Value<'a>>,
    ) -> Result<&mut Value<'a>, ValueError> {
        let object = self.prepare_object()?;
        match object.entry(key.into()) {
            indexmap::map::Entry::Occupied(e) => Err(ValueError::DuplicateKey {
                key: e.key().clone(),
            }),
            indexmap::map::Entry::Vacant(e) => Ok(e.insert(v.into())),
        }
    }

    /// Set a member of an object, replacing any previous value under the
    /// same key (which keeps its position). Returns the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        v: impl Into<Value<'a>>,
    ) -> Result<Option<Value<'a>>, ValueError> {
        Ok(self.prepare_object()?.insert(key.into(), v.into()))
    }

    /// Remove a member from an object, preserving the order of the others.
    pub fn erase(&mut self, key: &str) -> Result<Value<'a>, ValueError> {
        self.get_object_mut()?
            .shift_remove(key)
            .ok_or_else(|| ValueError::KeyNotFound { key: key.into() })
    }

    /// Remove an element from an array.
    pub fn erase_index(&mut self, index: usize) -> Result<Value<'a>, ValueError> {
        let array = self.get_array_mut()?;
        if index >= array.len() {
            return Err(ValueError::IndexOutOfRange {
                index,
                len: array.len(),
            });
        }
        Ok(array.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_follow_tag() {
        let v = Value::Unsigned(3);
        assert!(v.is_unsigned());
        assert!(v.is_integer());
        assert!(v.is_number());
        assert!(!v.is_signed());
        assert!(Value::StringView("x").is_string_type());
        assert!(Value::Binary(vec![1]).is_binary_type());
        assert!(!Value::Uninitialized.is_initialized());
    }

    #[test]
    fn checked_accessors_report_both_kinds() {
        let v = Value::Boolean(true);
        assert_eq!(v.get_boolean(), Ok(true));
        assert_eq!(
            v.get_signed(),
            Err(ValueError::TypeMismatch {
                expected: ValueType::Signed,
                actual: ValueType::Boolean,
            })
        );
    }

    #[test]
    fn accessors_see_through_value_ptr() {
        let target = Value::String("hello".into());
        let ptr = Value::value_ptr(&target);
        let ptr2 = Value::value_ptr(&ptr);
        assert_eq!(ptr2.get_string(), Ok("hello"));
        assert!(std::ptr::eq(ptr2.skip_value_ptr(), &target));
        assert!(ptr.get_value_ptr().is_ok());
    }

    #[test]
    fn take_leaves_discarded() {
        let mut v = Value::Signed(1);
        let moved = v.take();
        assert!(moved.is_signed());
        assert!(v.is_discarded());
        v.assign_boolean(false);
        assert_eq!(v.get_boolean(), Ok(false));
    }

    #[test]
    fn emplace_on_empty_values() {
        let mut v = Value::default();
        v.emplace_array().push(Value::Null);
        assert_eq!(v.get_array().map(Vec::len), Ok(1));

        let mut w = Value::Discarded;
        w.emplace_object();
        assert!(w.is_object());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "emplace into a value that already holds boolean")]
    fn emplace_on_live_value_panics_in_debug() {
        let mut v = Value::Boolean(true);
        v.emplace_null();
    }
}
