//! Equality and ordering across kinds.
//!
//! Numbers compare by mathematical value regardless of representation, so
//! `Signed(5)`, `Unsigned(5)` and `Double(5.0)` are all equal. Views compare
//! like their owned counterparts and value pointers are seen through. Values
//! of different kinds order by [`ValueType::rank`](crate::ValueType::rank).

use core::cmp::Ordering;

use crate::Value;

/// Compare an integer with a double exactly.
fn cmp_int_f64(i: i128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    // Every i64 and u64 fits well inside ±2^127.
    const BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if f >= BOUND {
        return Some(Ordering::Less);
    }
    if f < -BOUND {
        return Some(Ordering::Greater);
    }
    let truncated = f.trunc();
    #[allow(clippy::cast_possible_truncation)]
    let whole = truncated as i128;
    match i.cmp(&whole) {
        Ordering::Equal if f > truncated => Some(Ordering::Less),
        Ordering::Equal if f < truncated => Some(Ordering::Greater),
        ord => Some(ord),
    }
}

/// A number widened far enough to compare any two representations.
#[derive(Clone, Copy)]
enum Num {
    Int(i128),
    Float(f64),
}

impl Num {
    fn of(v: &Value<'_>) -> Option<Num> {
        match *v {
            Value::Signed(i) => Some(Num::Int(i.into())),
            Value::Unsigned(u) => Some(Num::Int(u.into())),
            Value::Double(f) => Some(Num::Float(f)),
            _ => None,
        }
    }

    fn partial_cmp(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
            (Num::Int(a), Num::Float(b)) => cmp_int_f64(a, b),
            (Num::Float(a), Num::Int(b)) => cmp_int_f64(b, a).map(Ordering::reverse),
        }
    }
}

fn text<'v>(v: &'v Value<'_>) -> Option<&'v str> {
    match v {
        Value::String(s) => Some(s),
        Value::StringView(s) => Some(s),
        _ => None,
    }
}

fn bytes<'v>(v: &'v Value<'_>) -> Option<&'v [u8]> {
    match v {
        Value::Binary(b) => Some(b),
        Value::BinaryView(b) => Some(b),
        _ => None,
    }
}

fn cmp_seq(a: &[Value<'_>], b: &[Value<'_>]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b) {
        match cmp_values(x, y)? {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
    }
    Some(a.len().cmp(&b.len()))
}

fn cmp_objects(a: &crate::Object<'_>, b: &crate::Object<'_>) -> Option<Ordering> {
    let mut left: Vec<_> = a.iter().collect();
    let mut right: Vec<_> = b.iter().collect();
    left.sort_unstable_by(|x, y| x.0.cmp(y.0));
    right.sort_unstable_by(|x, y| x.0.cmp(y.0));
    let mut left = left.into_iter();
    let mut right = right.into_iter();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Some(Ordering::Equal),
            (None, Some(_)) => return Some(Ordering::Less),
            (Some(_), None) => return Some(Ordering::Greater),
            (Some((ka, va)), Some((kb, vb))) => match ka.cmp(kb) {
                Ordering::Equal => match cmp_values(va, vb)? {
                    Ordering::Equal => {}
                    ord => return Some(ord),
                },
                ord => return Some(ord),
            },
        }
    }
}

fn cmp_ranks(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    Some(a.value_type().rank().cmp(&b.value_type().rank()))
}

/// Total-ish ordering between two values; `None` only involves NaN.
fn cmp_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    let a = a.skip_value_ptr();
    let b = b.skip_value_ptr();
    a.check_live();
    b.check_live();

    if let (Some(x), Some(y)) = (Num::of(a), Num::of(b)) {
        return x.partial_cmp(y);
    }
    if let (Some(x), Some(y)) = (text(a), text(b)) {
        return Some(x.cmp(y));
    }
    if let (Some(x), Some(y)) = (bytes(a), bytes(b)) {
        return Some(x.cmp(y));
    }
    match (a, b) {
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        (Value::Array(x), Value::Array(y)) => cmp_seq(x, y),
        (Value::Object(x), Value::Object(y)) => cmp_objects(x, y),
        (Value::OpaquePtr(x), Value::OpaquePtr(y)) if x.ptr_eq(y) => Some(Ordering::Equal),
        (Value::OpaquePtr(x), _) => match x.to_value() {
            Ok(x) => cmp_values(&x, b),
            Err(_) => cmp_ranks(a, b),
        },
        (_, Value::OpaquePtr(y)) => match y.to_value() {
            Ok(y) => cmp_values(a, &y),
            Err(_) => cmp_ranks(a, b),
        },
        _ => cmp_ranks(a, b),
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        cmp_values(self, other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Value<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        cmp_values(self, other)
    }
}

macro_rules! compare_with {
    ($($ty:ty => |$v:ident| $conv:expr;)*) => {
        $(
            impl PartialEq<$ty> for Value<'_> {
                fn eq(&self, other: &$ty) -> bool {
                    let $v = *other;
                    let other: Value<'_> = $conv;
                    cmp_values(self, &other) == Some(Ordering::Equal)
                }
            }

            impl PartialEq<Value<'_>> for $ty {
                fn eq(&self, other: &Value<'_>) -> bool {
                    other == self
                }
            }

            impl PartialOrd<$ty> for Value<'_> {
                fn partial_cmp(&self, other: &$ty) -> Option<Ordering> {
                    let $v = *other;
                    let other: Value<'_> = $conv;
                    cmp_values(self, &other)
                }
            }

            impl PartialOrd<Value<'_>> for $ty {
                fn partial_cmp(&self, other: &Value<'_>) -> Option<Ordering> {
                    other.partial_cmp(self).map(Ordering::reverse)
                }
            }
        )*
    };
}

compare_with! {
    bool => |v| Value::Boolean(v);
    i8 => |v| Value::Signed(v.into());
    i16 => |v| Value::Signed(v.into());
    i32 => |v| Value::Signed(v.into());
    i64 => |v| Value::Signed(v);
    isize => |v| Value::Signed(v as i64);
    u8 => |v| Value::Unsigned(v.into());
    u16 => |v| Value::Unsigned(v.into());
    u32 => |v| Value::Unsigned(v.into());
    u64 => |v| Value::Unsigned(v);
    usize => |v| Value::Unsigned(v as u64);
    f32 => |v| Value::Double(v.into());
    f64 => |v| Value::Double(v);
}

impl PartialEq<str> for Value<'_> {
    fn eq(&self, other: &str) -> bool {
        text(self.skip_value_ptr()) == Some(other)
    }
}

impl PartialEq<&str> for Value<'_> {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl PartialEq<String> for Value<'_> {
    fn eq(&self, other: &String) -> bool {
        *self == *other.as_str()
    }
}

impl PartialEq<Value<'_>> for str {
    fn eq(&self, other: &Value<'_>) -> bool {
        other == self
    }
}

impl PartialEq<Value<'_>> for &str {
    fn eq(&self, other: &Value<'_>) -> bool {
        other == *self
    }
}

impl PartialEq<Value<'_>> for String {
    fn eq(&self, other: &Value<'_>) -> bool {
        other == self
    }
}

impl PartialEq<[u8]> for Value<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        bytes(self.skip_value_ptr()) == Some(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(Value::Signed(5), Value::Unsigned(5));
        assert_eq!(Value::Unsigned(5), Value::Double(5.0));
        assert!(Value::Signed(5) < Value::Double(5.5));
        assert!(Value::Signed(-1) < Value::Unsigned(0));
        assert!(Value::Unsigned(u64::MAX) > Value::Signed(i64::MAX));
        assert!(Value::Double(-0.5) < Value::Signed(0));
        assert!(Value::Double(-0.5) > Value::Signed(-1));
    }

    #[test]
    fn large_integers_are_not_rounded() {
        // 2^53 + 1 is not representable as a double.
        let big = (1u64 << 53) + 1;
        assert!(Value::Unsigned(big) > Value::Double((1u64 << 53) as f64));
        assert!(Value::Unsigned(u64::MAX) < Value::Double(1e30));
        assert!(Value::Signed(i64::MIN) > Value::Double(f64::NEG_INFINITY));
    }

    #[test]
    fn nan_is_unordered() {
        let nan = Value::Double(f64::NAN);
        assert_ne!(nan, nan.clone());
        assert_eq!(nan.partial_cmp(&Value::Signed(0)), None);
    }

    #[test]
    fn views_equal_owned() {
        let s = String::from("x");
        assert_eq!(Value::StringView(&s), Value::String("x".into()));
        assert_eq!(Value::BinaryView(b"ab"), Value::Binary(b"ab".to_vec()));
        assert_eq!(Value::StringView("x"), "x");
    }

    #[test]
    fn objects_ignore_member_order() {
        let mut a = Value::Uninitialized;
        a.insert("x", 1u64).unwrap();
        a.insert("y", 2u64).unwrap();
        let mut b = Value::Uninitialized;
        b.insert("y", 2i64).unwrap();
        b.insert("x", 1.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn kinds_order_by_rank() {
        assert!(Value::Null < Value::Boolean(false));
        assert!(Value::Boolean(true) < Value::Signed(0));
        assert!(Value::Double(1e300) < Value::String(String::new()));
        assert!(Value::StringView("zzz") < Value::Binary(Vec::new()));
        assert!(Value::Array(Vec::new()) < Value::empty_object());
    }

    #[test]
    fn pointers_are_transparent() {
        let target = Value::Signed(3);
        assert_eq!(Value::value_ptr(&target), Value::Unsigned(3));
    }
}
