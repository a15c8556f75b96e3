//! Native objects that produce their own events.

use core::fmt;

use tessera_format::{Consumer, EventError};

use crate::{ToValue, Value};

/// A native object that can describe itself as structural events.
///
/// Storing a reference to one in a [`Value::OpaquePtr`] defers conversion:
/// nothing is materialized until an encoder, a comparison or
/// [`Value::to_owned_value`] visits it.
///
/// ```
/// use std::borrow::Cow;
/// use tessera_format::{Consumer, EventError};
/// use tessera_value::{Opaque, Value};
///
/// #[derive(Debug)]
/// struct Celsius(f64);
///
/// impl Opaque for Celsius {
///     fn produce<'c>(&'c self, c: &mut dyn Consumer<'c>) -> Result<(), EventError> {
///         c.begin_object(Some(1))?;
///         c.key(Cow::Borrowed("celsius"))?;
///         c.number_f64(self.0)?;
///         c.member()?;
///         c.end_object(Some(1))
///     }
/// }
///
/// let t = Celsius(21.5);
/// let v = Value::opaque(&t);
/// assert_eq!(v.to_owned_value().unwrap()["celsius"], 21.5);
/// ```
pub trait Opaque: fmt::Debug + Sync {
    /// Emit exactly one value's worth of events.
    fn produce<'c>(&'c self, consumer: &mut dyn Consumer<'c>) -> Result<(), EventError>;
}

/// A borrowed [`Opaque`] object, as stored in [`Value::OpaquePtr`].
#[derive(Clone, Copy)]
pub struct OpaquePtr<'a> {
    target: &'a dyn Opaque,
}

impl<'a> OpaquePtr<'a> {
    /// Point at `target`.
    pub const fn new(target: &'a dyn Opaque) -> Self {
        OpaquePtr { target }
    }

    /// The object pointed at.
    pub const fn get(&self) -> &'a dyn Opaque {
        self.target
    }

    /// Let the object emit its events into `consumer`.
    pub fn produce(&self, consumer: &mut dyn Consumer<'a>) -> Result<(), EventError> {
        self.target.produce(consumer)
    }

    /// Materialize the object as an owned value.
    pub fn to_value(&self) -> Result<Value<'static>, EventError> {
        let mut builder = ToValue::new();
        self.target.produce(&mut builder)?;
        Ok(builder.into_value())
    }

    /// Whether two pointers refer to the same object.
    pub fn ptr_eq(&self, other: &OpaquePtr<'_>) -> bool {
        core::ptr::addr_eq(self.target, other.target)
    }
}

impl fmt::Debug for OpaquePtr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaquePtr").field(&self.target).finish()
    }
}
