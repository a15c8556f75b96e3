//! Walking a [`Value`] as a stream of events.

use std::borrow::Cow;

use tessera_format::{Consumer, EventError};

use crate::{Object, Value};

impl<'a> Value<'a> {
    /// Emit this value's events into `consumer`.
    ///
    /// Strings and bytes are lent to the consumer, value pointers are
    /// followed, and opaque pointers produce their own events. Sizes are
    /// always reported for arrays and objects.
    ///
    /// Fails with [`EventError::Uninitialized`] if the value, or anything
    /// inside it, is uninitialized or discarded.
    pub fn produce<'v, C: Consumer<'v>>(&'v self, consumer: &mut C) -> Result<(), EventError> {
        self.produce_dyn(consumer)
    }

    pub(crate) fn produce_dyn<'v>(
        &'v self,
        consumer: &mut dyn Consumer<'v>,
    ) -> Result<(), EventError> {
        match self {
            Value::Uninitialized | Value::Discarded => Err(EventError::Uninitialized),
            Value::Null => consumer.null(),
            Value::Boolean(v) => consumer.boolean(*v),
            Value::Signed(v) => consumer.number_i64(*v),
            Value::Unsigned(v) => consumer.number_u64(*v),
            Value::Double(v) => consumer.number_f64(*v),
            Value::String(v) => consumer.string(Cow::Borrowed(v.as_str())),
            Value::StringView(v) => consumer.string(Cow::Borrowed(v)),
            Value::Binary(v) => consumer.binary(Cow::Borrowed(v.as_slice())),
            Value::BinaryView(v) => consumer.binary(Cow::Borrowed(v)),
            Value::Array(array) => {
                consumer.begin_array(Some(array.len()))?;
                for element in array {
                    element.produce_dyn(consumer)?;
                    consumer.element()?;
                }
                consumer.end_array(Some(array.len()))
            }
            Value::Object(object) => {
                consumer.begin_object(Some(object.len()))?;
                for (key, member) in object {
                    consumer.key(Cow::Borrowed(key.as_str()))?;
                    member.produce_dyn(consumer)?;
                    consumer.member()?;
                }
                consumer.end_object(Some(object.len()))
            }
            Value::ValuePtr(target) => target.produce_dyn(consumer),
            Value::OpaquePtr(opaque) => opaque.get().produce(consumer),
        }
    }

    /// Deep-copy into a value that borrows nothing.
    ///
    /// Views become owned strings and bytes, value pointers are replaced by
    /// copies of their targets, and opaque pointers are materialized.
    pub fn to_owned_value(&self) -> Result<Value<'static>, EventError> {
        Ok(match self {
            Value::Uninitialized => Value::Uninitialized,
            Value::Discarded => Value::Discarded,
            Value::Null => Value::Null,
            Value::Boolean(v) => Value::Boolean(*v),
            Value::Signed(v) => Value::Signed(*v),
            Value::Unsigned(v) => Value::Unsigned(*v),
            Value::Double(v) => Value::Double(*v),
            Value::String(v) => Value::String(v.clone()),
            Value::StringView(v) => Value::String((*v).to_owned()),
            Value::Binary(v) => Value::Binary(v.clone()),
            Value::BinaryView(v) => Value::Binary(v.to_vec()),
            Value::Array(array) => Value::Array(
                array
                    .iter()
                    .map(Value::to_owned_value)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(object) => Value::Object(
                object
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.to_owned_value()?)))
                    .collect::<Result<Object<'static>, EventError>>()?,
            ),
            Value::ValuePtr(target) => target.to_owned_value()?,
            Value::OpaquePtr(opaque) => opaque.to_value()?,
        })
    }
}
