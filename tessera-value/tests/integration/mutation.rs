use tessera_testhelpers::test;
use tessera_value::{Value, ValueError, ValueType, value};

#[test]
fn push_back_vivifies_an_empty_value() {
    let mut v = Value::Uninitialized;
    v.push_back(1u64).unwrap();
    assert_eq!(v.value_type(), ValueType::Array);
    assert_eq!(v.get_array().unwrap().len(), 1);
}

#[test]
fn push_back_on_a_scalar_is_a_type_mismatch() {
    let mut v = Value::Boolean(true);
    assert_eq!(
        v.push_back(1u64),
        Err(ValueError::TypeMismatch {
            expected: ValueType::Array,
            actual: ValueType::Boolean,
        })
    );
    assert_eq!(v, true);
}

#[test]
fn emplace_refuses_duplicates() {
    let mut v = Value::Uninitialized;
    v.emplace("a", 1).unwrap();
    assert_eq!(
        v.emplace("a", 2).unwrap_err(),
        ValueError::DuplicateKey { key: "a".into() }
    );
    assert_eq!(v["a"], 1);
    assert_eq!(v.insert("a", 3).unwrap(), Some(Value::Signed(1)));
    assert_eq!(v["a"], 3);
}

#[test]
fn erase_keeps_member_order() {
    let mut v = value!({ "a": 1, "b": 2, "c": 3 });
    assert_eq!(v.erase("b").unwrap(), 2);
    let keys: Vec<_> = v.get_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["a", "c"]);
    assert!(matches!(v.erase("zzz"), Err(ValueError::KeyNotFound { .. })));
}

#[test]
fn index_mut_creates_members() {
    let mut v = Value::Uninitialized;
    v["outer"]["inner"] = Value::from(true);
    assert_eq!(v, value!({ "outer": { "inner": true } }));

    let slot = &mut v["fresh"];
    assert!(slot.is_uninitialized());
    slot.emplace_null();
    assert!(v["fresh"].is_null());
}

#[test]
fn take_leaves_a_discarded_value() {
    let mut v = value!([1]);
    let taken = v.take();
    assert!(v.is_discarded());
    assert_eq!(taken, value!([1]));
    v.assign_string("again");
    assert_eq!(v, "again");
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "discarded")]
fn reading_a_discarded_value_panics_in_debug() {
    let mut v = Value::Signed(1);
    let _ = v.take();
    let _ = v.get_signed();
}

#[test]
fn views_borrow_without_copying() {
    let text = String::from("shared");
    let bytes = vec![1u8, 2, 3];
    let mut v = Value::Uninitialized;
    v.push_back(text.as_str()).unwrap();
    v.push_back(bytes.as_slice()).unwrap();
    assert!(v[0].is_string_view());
    assert!(v[1].is_binary_view());
    assert_eq!(v[0].get_string_type().unwrap().as_ptr(), text.as_ptr());

    let owned = v.to_owned_value().unwrap();
    drop(v);
    drop(text);
    assert!(owned[0].is_string());
    assert_eq!(owned[1].get_binary().unwrap(), [1, 2, 3]);
}
