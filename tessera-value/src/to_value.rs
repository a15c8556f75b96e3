//! Consumers that build a [`Value`] tree from events.

use std::borrow::Cow;

use tessera_format::{Consumer, EventError};

use crate::Value;

/// What to do when an object receives the same key twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail with [`EventError::DuplicateKey`].
    #[default]
    Error,
    /// Keep the first value and drop later ones.
    FirstWins,
    /// Keep the last value (at the position of the first).
    LastWins,
}

/// The container stack shared by [`ToValue`] and [`ToViewValue`].
#[derive(Debug)]
struct Builder<'a> {
    value: Value<'a>,
    stack: Vec<Value<'a>>,
    keys: Vec<String>,
    duplicates: DuplicateKeys,
}

impl<'a> Builder<'a> {
    fn new(duplicates: DuplicateKeys) -> Self {
        Builder {
            value: Value::Uninitialized,
            stack: Vec::new(),
            keys: Vec::new(),
            duplicates,
        }
    }

    fn scalar(&mut self, v: Value<'a>) -> Result<(), EventError> {
        self.value = v;
        Ok(())
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.stack
            .push(Value::Array(Vec::with_capacity(size.unwrap_or(0))));
        Ok(())
    }

    fn element(&mut self) -> Result<(), EventError> {
        let Some(Value::Array(array)) = self.stack.last_mut() else {
            return Err(EventError::OutOfOrder {
                event: "element",
                expected: "an open array",
            });
        };
        array.push(core::mem::take(&mut self.value));
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), EventError> {
        match self.stack.pop() {
            Some(array @ Value::Array(_)) => {
                self.value = array;
                Ok(())
            }
            other => {
                self.stack.extend(other);
                Err(EventError::OutOfOrder {
                    event: "end_array",
                    expected: "an open array",
                })
            }
        }
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.stack.push(Value::Object(indexmap::IndexMap::with_capacity(
            size.unwrap_or(0),
        )));
        Ok(())
    }

    fn key(&mut self, key: String) -> Result<(), EventError> {
        self.keys.push(key);
        Ok(())
    }

    fn member(&mut self) -> Result<(), EventError> {
        let (Some(Value::Object(object)), Some(key)) = (self.stack.last_mut(), self.keys.pop())
        else {
            return Err(EventError::OutOfOrder {
                event: "member",
                expected: "an open object and a key",
            });
        };
        let value = core::mem::take(&mut self.value);
        match object.entry(key) {
            indexmap::map::Entry::Vacant(e) => {
                e.insert(value);
            }
            indexmap::map::Entry::Occupied(mut e) => match self.duplicates {
                DuplicateKeys::Error => {
                    return Err(EventError::DuplicateKey {
                        key: e.key().clone(),
                    });
                }
                DuplicateKeys::FirstWins => {}
                DuplicateKeys::LastWins => {
                    e.insert(value);
                }
            },
        }
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), EventError> {
        match self.stack.pop() {
            Some(object @ Value::Object(_)) => {
                self.value = object;
                Ok(())
            }
            other => {
                self.stack.extend(other);
                Err(EventError::OutOfOrder {
                    event: "end_object",
                    expected: "an open object",
                })
            }
        }
    }
}

/// Consumer that builds an owned [`Value`], copying all strings and bytes.
///
/// ```
/// use tessera_format::Consumer;
/// use tessera_value::{ToValue, Value};
///
/// let mut b = ToValue::new();
/// b.begin_array(None).unwrap();
/// b.number_u64(1).unwrap();
/// b.element().unwrap();
/// b.end_array(None).unwrap();
/// assert_eq!(b.into_value(), Value::Array(vec![Value::Unsigned(1)]));
/// ```
#[derive(Debug)]
pub struct ToValue {
    builder: Builder<'static>,
}

impl Default for ToValue {
    fn default() -> Self {
        ToValue::new()
    }
}

impl ToValue {
    /// A builder that rejects duplicate keys.
    pub fn new() -> Self {
        ToValue::with_duplicate_keys(DuplicateKeys::Error)
    }

    /// A builder with the given duplicate-key policy.
    pub fn with_duplicate_keys(duplicates: DuplicateKeys) -> Self {
        ToValue {
            builder: Builder::new(duplicates),
        }
    }

    /// The value built so far (the last completed value).
    pub fn value(&self) -> &Value<'static> {
        &self.builder.value
    }

    /// Take the built value.
    pub fn into_value(self) -> Value<'static> {
        self.builder.value
    }
}

impl<'de> Consumer<'de> for ToValue {
    fn null(&mut self) -> Result<(), EventError> {
        self.builder.scalar(Value::Null)
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.builder.scalar(Value::Boolean(v))
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.builder.scalar(Value::Signed(v))
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.builder.scalar(Value::Unsigned(v))
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.builder.scalar(Value::Double(v))
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.builder.scalar(Value::String(v.into_owned()))
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        self.builder.scalar(Value::Binary(v.into_owned()))
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.builder.begin_array(size)
    }

    fn element(&mut self) -> Result<(), EventError> {
        self.builder.element()
    }

    fn end_array(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.builder.end_array()
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.builder.begin_object(size)
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.builder.key(v.into_owned())
    }

    fn member(&mut self) -> Result<(), EventError> {
        self.builder.member()
    }

    fn end_object(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.builder.end_object()
    }
}

/// Consumer that builds a [`Value`] borrowing from the input where it can.
///
/// Strings and bytes that a parser lends for `'de` become
/// [`Value::StringView`] / [`Value::BinaryView`]; those that had to be
/// decoded (escaped JSON strings, chunked CBOR strings) are owned.
#[derive(Debug)]
pub struct ToViewValue<'de> {
    builder: Builder<'de>,
}

impl Default for ToViewValue<'_> {
    fn default() -> Self {
        ToViewValue::new()
    }
}

impl<'de> ToViewValue<'de> {
    /// A builder that rejects duplicate keys.
    pub fn new() -> Self {
        ToViewValue::with_duplicate_keys(DuplicateKeys::Error)
    }

    /// A builder with the given duplicate-key policy.
    pub fn with_duplicate_keys(duplicates: DuplicateKeys) -> Self {
        ToViewValue {
            builder: Builder::new(duplicates),
        }
    }

    /// The value built so far.
    pub fn value(&self) -> &Value<'de> {
        &self.builder.value
    }

    /// Take the built value.
    pub fn into_value(self) -> Value<'de> {
        self.builder.value
    }
}

impl<'de> Consumer<'de> for ToViewValue<'de> {
    fn null(&mut self) -> Result<(), EventError> {
        self.builder.scalar(Value::Null)
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.builder.scalar(Value::Boolean(v))
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.builder.scalar(Value::Signed(v))
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.builder.scalar(Value::Unsigned(v))
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.builder.scalar(Value::Double(v))
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.builder.scalar(match v {
            Cow::Borrowed(s) => Value::StringView(s),
            Cow::Owned(s) => Value::String(s),
        })
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        self.builder.scalar(match v {
            Cow::Borrowed(b) => Value::BinaryView(b),
            Cow::Owned(b) => Value::Binary(b),
        })
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.builder.begin_array(size)
    }

    fn element(&mut self) -> Result<(), EventError> {
        self.builder.element()
    }

    fn end_array(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.builder.end_array()
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.builder.begin_object(size)
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.builder.key(v.into_owned())
    }

    fn member(&mut self) -> Result<(), EventError> {
        self.builder.member()
    }

    fn end_object(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.builder.end_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duplicate_object<'de, C: Consumer<'de>>(c: &mut C) -> Result<(), EventError> {
        c.begin_object(None)?;
        c.key(Cow::Borrowed("a"))?;
        c.number_u64(1)?;
        c.member()?;
        c.key(Cow::Borrowed("a"))?;
        c.number_u64(2)?;
        c.member()?;
        c.end_object(None)
    }

    #[test]
    fn duplicate_key_policies() {
        let mut strict = ToValue::new();
        assert_eq!(
            duplicate_object(&mut strict),
            Err(EventError::DuplicateKey { key: "a".into() })
        );

        let mut first = ToValue::with_duplicate_keys(DuplicateKeys::FirstWins);
        duplicate_object(&mut first).unwrap();
        assert_eq!(first.into_value()["a"], 1u64);

        let mut last = ToValue::with_duplicate_keys(DuplicateKeys::LastWins);
        duplicate_object(&mut last).unwrap();
        assert_eq!(last.into_value()["a"], 2u64);
    }

    #[test]
    fn views_borrow_from_input() {
        let input = String::from("borrowed");
        let mut b = ToViewValue::new();
        b.string(Cow::Borrowed(input.as_str())).unwrap();
        assert!(b.value().is_string_view());
        b.string(Cow::Owned("owned".into())).unwrap();
        assert!(b.into_value().is_string());
    }

    #[test]
    fn stray_element_is_rejected() {
        let mut b = ToValue::new();
        b.null().unwrap();
        assert!(matches!(b.element(), Err(EventError::OutOfOrder { .. })));
    }
}
