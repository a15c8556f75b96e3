/// Build a [`Value`](crate::Value) from JSON-like syntax.
///
/// Anything that is not `null`, an array or an object is converted with
/// [`From`], so `"text"` becomes a [`Value::StringView`](crate::Value::StringView)
/// and `1` a signed integer. Object keys are string literals or
/// parenthesized expressions.
///
/// ```
/// use tessera_value::{Value, value};
///
/// let name = "tessera";
/// let v = value!({
///     "name": name,
///     "tags": ["json", "cbor", null],
///     "version": { "major": 0, "minor": -3 },
/// });
/// assert_eq!(v["tags"][1], "cbor");
/// assert_eq!(v["version"]["minor"], -3);
/// assert!(v["tags"][2].is_null());
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([]) => {
        $crate::Value::Array($crate::Array::new())
    };
    ([ $($tt:tt)+ ]) => {
        $crate::Value::Array($crate::__value_array!([] $($tt)+))
    };
    ({}) => {
        $crate::Value::Object($crate::Object::new())
    };
    ({ $($tt:tt)+ }) => {{
        let mut object = $crate::Object::new();
        $crate::__value_object!(object $($tt)+);
        $crate::Value::Object(object)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! __value_array {
    ([$($done:expr,)*]) => {
        ::std::vec![$($done,)*]
    };
    ([$($done:expr,)*] $($rest:tt)+) => {
        $crate::__value_array!(@element [$($done,)*] () $($rest)+)
    };
    (@element [$($done:expr,)*] ($($current:tt)+) , $($rest:tt)*) => {
        $crate::__value_array!([$($done,)* $crate::value!($($current)+),] $($rest)*)
    };
    (@element [$($done:expr,)*] ($($current:tt)*) $next:tt $($rest:tt)*) => {
        $crate::__value_array!(@element [$($done,)*] ($($current)* $next) $($rest)*)
    };
    (@element [$($done:expr,)*] ($($current:tt)+)) => {
        $crate::__value_array!([$($done,)* $crate::value!($($current)+),])
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! __value_object {
    ($object:ident) => {};
    ($object:ident $key:tt : $($rest:tt)+) => {
        $crate::__value_object!(@member $object [$key] () $($rest)+)
    };
    (@member $object:ident [$key:tt] ($($current:tt)+) , $($rest:tt)*) => {
        $object.insert(::std::string::String::from($key), $crate::value!($($current)+));
        $crate::__value_object!($object $($rest)*);
    };
    (@member $object:ident [$key:tt] ($($current:tt)*) $next:tt $($rest:tt)*) => {
        $crate::__value_object!(@member $object [$key] ($($current)* $next) $($rest)*)
    };
    (@member $object:ident [$key:tt] ($($current:tt)+)) => {
        $object.insert(::std::string::String::from($key), $crate::value!($($current)+));
    };
}

#[cfg(test)]
mod tests {
    use crate::{Value, ValueType};

    #[test]
    fn scalars_and_empties() {
        assert!(value!(null).is_null());
        assert_eq!(value!(true), true);
        assert_eq!(value!(-7), -7i64);
        assert_eq!(value!([]).value_type(), ValueType::Array);
        assert_eq!(value!({}).value_type(), ValueType::Object);
    }

    #[test]
    fn nested_literals() {
        let v: Value<'_> = value!([1, [2, 3], { "k": [null] }, 1.5,]);
        let array = v.get_array().unwrap();
        assert_eq!(array.len(), 4);
        assert_eq!(array[1][1], 3);
        assert!(array[2]["k"][0].is_null());
        assert_eq!(array[3], 1.5);
    }

    #[test]
    fn object_keys_keep_order() {
        let key = String::from("dynamic");
        let v = value!({ "b": 1, "a": 2, (key.as_str()): 3 });
        let keys: Vec<_> = v.get_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a", "dynamic"]);
    }
}
