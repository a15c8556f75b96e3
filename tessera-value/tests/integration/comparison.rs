use tessera_testhelpers::test;
use tessera_value::{Value, value};

#[test]
fn integer_and_double_order() {
    assert!(Value::Signed(5) < Value::Double(5.5));
    assert!(Value::Double(5.5) > Value::Signed(5));
    assert_eq!(Value::Unsigned(5), Value::Double(5.0));
    assert_eq!(Value::Signed(5), Value::Unsigned(5));
}

#[test]
fn numeric_identity_holds_inside_containers() {
    assert_eq!(value!([1, 2.0, { "x": 3 }]), value!([1.0, 2, { "x": 3.0 }]));
    assert!(value!([1, 2]) < value!([1, 2, 0]));
    assert!(value!([1, 3]) > value!([1, 2, 9]));
}

#[test]
fn strings_compare_by_content() {
    let owned = Value::String("abc".into());
    let text = String::from("abc");
    let view = Value::StringView(&text);
    assert_eq!(owned, view);
    assert!(Value::StringView("abb") < owned);
    assert_eq!(view, "abc");
    assert_eq!("abc", view);
}

#[test]
fn value_pointer_compares_as_target() {
    let shared = value!({ "a": [1, 2] });
    let mut doc = Value::Uninitialized;
    doc.push_back(Value::value_ptr(&shared)).unwrap();
    assert_eq!(doc[0], shared);
    assert_eq!(doc, value!([{ "a": [1, 2] }]));
}

#[test]
fn different_kinds_order_by_tag() {
    let ordered = [
        value!(null),
        value!(false),
        value!(-1),
        Value::String("s".into()),
        Value::Binary(vec![0]),
        value!([]),
        value!({}),
    ];
    for pair in ordered.windows(2) {
        assert!(pair[0] < pair[1], "{:?} < {:?}", pair[0], pair[1]);
    }
}
