use std::borrow::Cow;

use crate::{Consumer, Discard, EventError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    TopLevelValue,
    ArrayValueOrEnd,
    ArrayElement,
    ObjectKeyOrEnd,
    ObjectValue,
    ObjectMember,
    Nothing,
}

impl Expect {
    const fn describe(self) -> &'static str {
        match self {
            Expect::TopLevelValue => "any value",
            Expect::ArrayValueOrEnd => "any value or end_array",
            Expect::ArrayElement => "element",
            Expect::ObjectKeyOrEnd => "key or end_object",
            Expect::ObjectValue => "any value",
            Expect::ObjectMember => "member",
            Expect::Nothing => "nothing",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    resume: Expect,
    size: Option<usize>,
    count: usize,
}

/// Adapter that checks events arrive in a legal order before forwarding them.
///
/// Size hints are checked too: a container that announced `Some(n)` at its
/// beginning must contain exactly `n` entries and must end with the same
/// hint.
#[derive(Debug, Clone)]
pub struct ValidateEventOrder<C = Discard> {
    inner: C,
    state: Expect,
    stack: Vec<Frame>,
}

impl Default for ValidateEventOrder<Discard> {
    fn default() -> Self {
        ValidateEventOrder::new(Discard)
    }
}

impl<C> ValidateEventOrder<C> {
    /// Wrap `inner`.
    pub fn new(inner: C) -> Self {
        ValidateEventOrder {
            inner,
            state: Expect::TopLevelValue,
            stack: Vec::new(),
        }
    }

    /// Whether exactly one complete top-level value has been seen.
    pub fn is_complete(&self) -> bool {
        self.state == Expect::Nothing
    }

    /// Return the wrapped consumer.
    pub fn into_inner(self) -> C {
        self.inner
    }

    fn reject(&self, event: &'static str) -> EventError {
        EventError::OutOfOrder {
            event,
            expected: self.state.describe(),
        }
    }

    fn value(&mut self, event: &'static str) -> Result<(), EventError> {
        self.state = match self.state {
            Expect::TopLevelValue => Expect::Nothing,
            Expect::ArrayValueOrEnd => Expect::ArrayElement,
            Expect::ObjectValue => Expect::ObjectMember,
            _ => return Err(self.reject(event)),
        };
        Ok(())
    }

    fn open(&mut self, event: &'static str, inside: Expect, size: Option<usize>) -> Result<(), EventError> {
        let resume = match self.state {
            Expect::TopLevelValue => Expect::Nothing,
            Expect::ArrayValueOrEnd => Expect::ArrayElement,
            Expect::ObjectValue => Expect::ObjectMember,
            _ => return Err(self.reject(event)),
        };
        self.stack.push(Frame {
            resume,
            size,
            count: 0,
        });
        self.state = inside;
        Ok(())
    }

    fn close(&mut self, event: &'static str, size: Option<usize>) -> Result<(), EventError> {
        let Some(frame) = self.stack.pop() else {
            return Err(self.reject(event));
        };
        if let Some(expected) = frame.size {
            if frame.count != expected || size.is_some_and(|n| n != expected) {
                return Err(EventError::OutOfOrder {
                    event,
                    expected: "as many entries as announced",
                });
            }
        }
        self.state = frame.resume;
        Ok(())
    }

    fn count_entry(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.count += 1;
        }
    }
}

impl<'de, C: Consumer<'de>> Consumer<'de> for ValidateEventOrder<C> {
    fn null(&mut self) -> Result<(), EventError> {
        self.value("null")?;
        self.inner.null()
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.value("boolean")?;
        self.inner.boolean(v)
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.value("number_i64")?;
        self.inner.number_i64(v)
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.value("number_u64")?;
        self.inner.number_u64(v)
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.value("number_f64")?;
        self.inner.number_f64(v)
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.value("string")?;
        self.inner.string(v)
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        self.value("binary")?;
        self.inner.binary(v)
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.open("begin_array", Expect::ArrayValueOrEnd, size)?;
        self.inner.begin_array(size)
    }

    fn element(&mut self) -> Result<(), EventError> {
        if self.state != Expect::ArrayElement {
            return Err(self.reject("element"));
        }
        self.count_entry();
        self.state = Expect::ArrayValueOrEnd;
        self.inner.element()
    }

    fn end_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        if self.state != Expect::ArrayValueOrEnd {
            return Err(self.reject("end_array"));
        }
        self.close("end_array", size)?;
        self.inner.end_array(size)
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.open("begin_object", Expect::ObjectKeyOrEnd, size)?;
        self.inner.begin_object(size)
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        if self.state != Expect::ObjectKeyOrEnd {
            return Err(self.reject("key"));
        }
        self.state = Expect::ObjectValue;
        self.inner.key(v)
    }

    fn member(&mut self) -> Result<(), EventError> {
        if self.state != Expect::ObjectMember {
            return Err(self.reject("member"));
        }
        self.count_entry();
        self.state = Expect::ObjectKeyOrEnd;
        self.inner.member()
    }

    fn end_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        if self.state != Expect::ObjectKeyOrEnd {
            return Err(self.reject("end_object"));
        }
        self.close("end_object", size)?;
        self.inner.end_object(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_containers() {
        let mut v = ValidateEventOrder::new(Discard);
        v.begin_object(Some(1)).unwrap();
        v.key("a".into()).unwrap();
        v.begin_array(None).unwrap();
        v.null().unwrap();
        v.element().unwrap();
        v.end_array(None).unwrap();
        v.member().unwrap();
        assert!(!v.is_complete());
        v.end_object(Some(1)).unwrap();
        assert!(v.is_complete());
    }

    #[test]
    fn rejects_missing_element() {
        let mut v = ValidateEventOrder::new(Discard);
        v.begin_array(None).unwrap();
        v.boolean(true).unwrap();
        let err = v.boolean(false).unwrap_err();
        assert_eq!(
            err,
            EventError::OutOfOrder {
                event: "boolean",
                expected: "element"
            }
        );
    }

    #[test]
    fn rejects_second_top_level_value() {
        let mut v = ValidateEventOrder::new(Discard);
        v.null().unwrap();
        assert!(v.null().is_err());
    }

    #[test]
    fn rejects_size_mismatch() {
        let mut v = ValidateEventOrder::new(Discard);
        v.begin_array(Some(2)).unwrap();
        v.number_u64(1).unwrap();
        v.element().unwrap();
        assert!(v.end_array(Some(2)).is_err());
    }
}
