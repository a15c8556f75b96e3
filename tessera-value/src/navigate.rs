//! Structural navigation: indices, keys and JSON Pointers.

use core::ops::{Index, IndexMut};

use crate::{Pointer, Token, Value, ValueError};

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl Sealed for crate::Pointer {}
    impl<T: ?Sized + Sealed> Sealed for &T {}
}

/// Something a [`Value`] can be indexed by: an array index (`usize`), an
/// object key (`&str`, `String`) or a [`Pointer`].
///
/// Sealed; used by [`Value::at`], [`Value::find`] and the `[]` operators.
pub trait ValueIndex: private::Sealed {
    #[doc(hidden)]
    fn lookup<'v, 'a>(&self, v: &'v Value<'a>) -> Result<&'v Value<'a>, ValueError>;

    #[doc(hidden)]
    fn lookup_mut<'v, 'a>(&self, v: &'v mut Value<'a>) -> Result<&'v mut Value<'a>, ValueError>;

    #[doc(hidden)]
    fn lookup_or_insert<'v, 'a>(
        &self,
        v: &'v mut Value<'a>,
    ) -> Result<&'v mut Value<'a>, ValueError>;
}

fn element<'v, 'a>(v: &'v Value<'a>, index: usize) -> Result<&'v Value<'a>, ValueError> {
    let array = v.get_array()?;
    array.get(index).ok_or(ValueError::IndexOutOfRange {
        index,
        len: array.len(),
    })
}

fn element_mut<'v, 'a>(v: &'v mut Value<'a>, index: usize) -> Result<&'v mut Value<'a>, ValueError> {
    let array = v.get_array_mut()?;
    let len = array.len();
    array
        .get_mut(index)
        .ok_or(ValueError::IndexOutOfRange { index, len })
}

fn member<'v, 'a>(v: &'v Value<'a>, key: &str) -> Result<&'v Value<'a>, ValueError> {
    v.get_object()?
        .get(key)
        .ok_or_else(|| ValueError::KeyNotFound { key: key.into() })
}

fn member_mut<'v, 'a>(v: &'v mut Value<'a>, key: &str) -> Result<&'v mut Value<'a>, ValueError> {
    v.get_object_mut()?
        .get_mut(key)
        .ok_or_else(|| ValueError::KeyNotFound { key: key.into() })
}

impl ValueIndex for usize {
    fn lookup<'v, 'a>(&self, v: &'v Value<'a>) -> Result<&'v Value<'a>, ValueError> {
        element(v, *self)
    }

    fn lookup_mut<'v, 'a>(&self, v: &'v mut Value<'a>) -> Result<&'v mut Value<'a>, ValueError> {
        element_mut(v, *self)
    }

    fn lookup_or_insert<'v, 'a>(
        &self,
        v: &'v mut Value<'a>,
    ) -> Result<&'v mut Value<'a>, ValueError> {
        element_mut(v, *self)
    }
}

impl ValueIndex for str {
    fn lookup<'v, 'a>(&self, v: &'v Value<'a>) -> Result<&'v Value<'a>, ValueError> {
        member(v, self)
    }

    fn lookup_mut<'v, 'a>(&self, v: &'v mut Value<'a>) -> Result<&'v mut Value<'a>, ValueError> {
        member_mut(v, self)
    }

    fn lookup_or_insert<'v, 'a>(
        &self,
        v: &'v mut Value<'a>,
    ) -> Result<&'v mut Value<'a>, ValueError> {
        Ok(v.prepare_object()?.entry(self.to_owned()).or_default())
    }
}

impl ValueIndex for String {
    fn lookup<'v, 'a>(&self, v: &'v Value<'a>) -> Result<&'v Value<'a>, ValueError> {
        self.as_str().lookup(v)
    }

    fn lookup_mut<'v, 'a>(&self, v: &'v mut Value<'a>) -> Result<&'v mut Value<'a>, ValueError> {
        self.as_str().lookup_mut(v)
    }

    fn lookup_or_insert<'v, 'a>(
        &self,
        v: &'v mut Value<'a>,
    ) -> Result<&'v mut Value<'a>, ValueError> {
        self.as_str().lookup_or_insert(v)
    }
}

impl ValueIndex for Pointer {
    fn lookup<'v, 'a>(&self, v: &'v Value<'a>) -> Result<&'v Value<'a>, ValueError> {
        v.pointer(self)
    }

    fn lookup_mut<'v, 'a>(&self, v: &'v mut Value<'a>) -> Result<&'v mut Value<'a>, ValueError> {
        v.pointer_mut(self)
    }

    fn lookup_or_insert<'v, 'a>(
        &self,
        v: &'v mut Value<'a>,
    ) -> Result<&'v mut Value<'a>, ValueError> {
        v.get_or_create(self)
    }
}

impl<T: ?Sized + ValueIndex> ValueIndex for &T {
    fn lookup<'v, 'a>(&self, v: &'v Value<'a>) -> Result<&'v Value<'a>, ValueError> {
        (**self).lookup(v)
    }

    fn lookup_mut<'v, 'a>(&self, v: &'v mut Value<'a>) -> Result<&'v mut Value<'a>, ValueError> {
        (**self).lookup_mut(v)
    }

    fn lookup_or_insert<'v, 'a>(
        &self,
        v: &'v mut Value<'a>,
    ) -> Result<&'v mut Value<'a>, ValueError> {
        (**self).lookup_or_insert(v)
    }
}

/// One step of a pointer walk through a shared value.
fn step<'v, 'a>(v: &'v Value<'a>, token: &Token) -> Result<&'v Value<'a>, ValueError> {
    match v.skip_value_ptr() {
        Value::Array(array) => {
            let index = token.index().ok_or_else(|| ValueError::InvalidArrayIndex {
                token: token.key().into(),
            })?;
            array.get(index).ok_or(ValueError::IndexOutOfRange {
                index,
                len: array.len(),
            })
        }
        Value::Object(object) => object
            .get(token.key())
            .ok_or_else(|| ValueError::KeyNotFound {
                key: token.key().into(),
            }),
        other => Err(ValueError::InvalidPath {
            token: token.key().into(),
            actual: other.value_type(),
        }),
    }
}

/// One step of a pointer walk through a mutable value.
fn step_mut<'v, 'a>(v: &'v mut Value<'a>, token: &Token) -> Result<&'v mut Value<'a>, ValueError> {
    match v {
        Value::Array(array) => {
            let index = token.index().ok_or_else(|| ValueError::InvalidArrayIndex {
                token: token.key().into(),
            })?;
            let len = array.len();
            array
                .get_mut(index)
                .ok_or(ValueError::IndexOutOfRange { index, len })
        }
        Value::Object(object) => {
            object
                .get_mut(token.key())
                .ok_or_else(|| ValueError::KeyNotFound {
                    key: token.key().into(),
                })
        }
        other => Err(ValueError::InvalidPath {
            token: token.key().into(),
            actual: other.value_type(),
        }),
    }
}

fn walk_mut<'v, 'a>(
    mut v: &'v mut Value<'a>,
    tokens: &[Token],
) -> Result<&'v mut Value<'a>, ValueError> {
    for token in tokens {
        v = step_mut(v, token)?;
    }
    Ok(v)
}

fn root_error(pointer: &Pointer, reason: &'static str) -> ValueError {
    ValueError::InvalidPointer {
        pointer: pointer.to_string(),
        reason,
    }
}

impl<'a> Value<'a> {
    /// Look up an array element, object member or pointer target.
    ///
    /// Fails with [`ValueError::IndexOutOfRange`], [`ValueError::KeyNotFound`],
    /// [`ValueError::TypeMismatch`] (indexing a scalar) or, for pointers,
    /// [`ValueError::InvalidPath`].
    #[track_caller]
    pub fn at<I: ValueIndex>(&self, index: I) -> Result<&Value<'a>, ValueError> {
        self.check_live();
        index.lookup(self)
    }

    /// Mutable counterpart of [`Value::at`]. Value pointers are not followed.
    #[track_caller]
    pub fn at_mut<I: ValueIndex>(&mut self, index: I) -> Result<&mut Value<'a>, ValueError> {
        self.check_live();
        index.lookup_mut(self)
    }

    /// Like [`Value::at`], returning `None` instead of an error.
    pub fn find<I: ValueIndex>(&self, index: I) -> Option<&Value<'a>> {
        self.at(index).ok()
    }

    /// Like [`Value::at_mut`], returning `None` instead of an error.
    pub fn find_mut<I: ValueIndex>(&mut self, index: I) -> Option<&mut Value<'a>> {
        self.at_mut(index).ok()
    }

    /// Resolve a JSON Pointer, seeing through value pointers.
    pub fn pointer(&self, pointer: &Pointer) -> Result<&Value<'a>, ValueError> {
        let mut v = self;
        for token in pointer.tokens() {
            v = step(v, token)?;
        }
        Ok(v)
    }

    /// Resolve a JSON Pointer for mutation.
    pub fn pointer_mut(&mut self, pointer: &Pointer) -> Result<&mut Value<'a>, ValueError> {
        walk_mut(self, pointer.tokens())
    }

    /// Resolve a JSON Pointer, creating its last step if it is missing.
    ///
    /// All but the last token must resolve. A missing last object member is
    /// inserted as `null`; the last token `-` on an array appends a `null`.
    pub fn get_or_create(&mut self, pointer: &Pointer) -> Result<&mut Value<'a>, ValueError> {
        let Some((last, parents)) = pointer.split_last() else {
            return Ok(self);
        };
        let parent = walk_mut(self, parents)?;
        match parent {
            Value::Array(_) if last.is_end() => {
                let Value::Array(array) = parent else {
                    unreachable!()
                };
                array.push(Value::Null);
                let end = array.len() - 1;
                Ok(&mut array[end])
            }
            Value::Object(object) => Ok(object.entry(last.key().to_owned()).or_insert(Value::Null)),
            parent => step_mut(parent, last),
        }
    }

    /// Insert `v` at the place a JSON Pointer refers to, returning it.
    ///
    /// On arrays the value is inserted before the indexed element (`-` or
    /// the array length append); on objects it is added or replaces the
    /// existing member. The root pointer replaces the whole value.
    pub fn insert_at(
        &mut self,
        pointer: &Pointer,
        v: impl Into<Value<'a>>,
    ) -> Result<&mut Value<'a>, ValueError> {
        let v = v.into();
        let Some((last, parents)) = pointer.split_last() else {
            *self = v;
            return Ok(self);
        };
        match walk_mut(self, parents)? {
            Value::Array(array) => {
                let index = if last.is_end() {
                    array.len()
                } else {
                    last.index().ok_or_else(|| ValueError::InvalidArrayIndex {
                        token: last.key().into(),
                    })?
                };
                if index > array.len() {
                    return Err(ValueError::IndexOutOfRange {
                        index,
                        len: array.len(),
                    });
                }
                array.insert(index, v);
                Ok(&mut array[index])
            }
            Value::Object(object) => {
                let slot = object.entry(last.key().to_owned()).or_default();
                *slot = v;
                Ok(slot)
            }
            other => Err(ValueError::InvalidPath {
                token: last.key().into(),
                actual: other.value_type(),
            }),
        }
    }

    /// Remove and return the value a JSON Pointer refers to.
    ///
    /// The root pointer cannot be erased.
    pub fn erase_at(&mut self, pointer: &Pointer) -> Result<Value<'a>, ValueError> {
        let Some((last, parents)) = pointer.split_last() else {
            return Err(root_error(pointer, "the root value cannot be erased"));
        };
        match walk_mut(self, parents)? {
            Value::Array(array) => {
                let index = last.index().ok_or_else(|| ValueError::InvalidArrayIndex {
                    token: last.key().into(),
                })?;
                if index >= array.len() {
                    return Err(ValueError::IndexOutOfRange {
                        index,
                        len: array.len(),
                    });
                }
                Ok(array.remove(index))
            }
            Value::Object(object) => {
                object
                    .shift_remove(last.key())
                    .ok_or_else(|| ValueError::KeyNotFound {
                        key: last.key().into(),
                    })
            }
            other => Err(ValueError::InvalidPath {
                token: last.key().into(),
                actual: other.value_type(),
            }),
        }
    }
}

impl<'a, I: ValueIndex> Index<I> for Value<'a> {
    type Output = Value<'a>;

    /// Panics where [`Value::at`] would fail.
    #[track_caller]
    fn index(&self, index: I) -> &Value<'a> {
        match self.at(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<'a, I: ValueIndex> IndexMut<I> for Value<'a> {
    /// Get-or-create access.
    ///
    /// Keys auto-vivify an empty value into an object and insert missing
    /// members as [`Value::Uninitialized`], ready to be assigned. Indices
    /// must already exist. Pointers behave like [`Value::get_or_create`].
    #[track_caller]
    fn index_mut(&mut self, index: I) -> &mut Value<'a> {
        self.check_live();
        match index.lookup_or_insert(self) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

