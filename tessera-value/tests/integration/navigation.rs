use tessera_testhelpers::test;
use tessera_value::{Pointer, Value, ValueError, ValueType, value};

fn ptr(text: &str) -> Pointer {
    text.parse().unwrap()
}

#[test]
fn at_reports_out_of_range() {
    let v = value!([10, 20]);
    assert_eq!(v.at(1).unwrap(), &20);
    assert_eq!(
        v.at(2),
        Err(ValueError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(v.find(5), None);
}

#[test]
fn at_on_a_scalar_is_a_type_mismatch() {
    let v = value!(3);
    assert!(matches!(
        v.at("key"),
        Err(ValueError::TypeMismatch {
            expected: ValueType::Object,
            ..
        })
    ));
}

#[test]
fn pointer_lookup() {
    let v = value!({ "a/b": [0, { "m~n": "x" }], "": 1 });
    assert_eq!(v.pointer(&ptr("")).unwrap(), &v);
    assert_eq!(v.pointer(&ptr("/a~1b/1/m~0n")).unwrap(), "x");
    assert_eq!(v.pointer(&ptr("/")).unwrap(), &1);
    assert_eq!(v.at(&ptr("/a~1b/0")).unwrap(), &0);
}

#[test]
fn pointer_errors() {
    let v = value!({ "list": [1], "n": 5 });
    assert_eq!(
        v.pointer(&ptr("/list/01")),
        Err(ValueError::InvalidArrayIndex { token: "01".into() })
    );
    assert_eq!(
        v.pointer(&ptr("/list/1")),
        Err(ValueError::IndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(
        v.pointer(&ptr("/missing")),
        Err(ValueError::KeyNotFound {
            key: "missing".into()
        })
    );
    assert_eq!(
        v.pointer(&ptr("/n/x")),
        Err(ValueError::InvalidPath {
            token: "x".into(),
            actual: ValueType::Signed,
        })
    );
}

#[test]
fn pointer_sees_through_value_pointers() {
    let shared = value!({ "deep": [true] });
    let v = value!({ "link": (Value::value_ptr(&shared)) });
    assert_eq!(v.pointer(&ptr("/link/deep/0")).unwrap(), &true);
}

#[test]
fn get_or_create_inserts_null() {
    let mut v = value!({ "list": [1] });
    assert!(v.get_or_create(&ptr("/new")).unwrap().is_null());
    assert!(v.get_or_create(&ptr("/list/-")).unwrap().is_null());
    assert_eq!(v, value!({ "list": [1, null], "new": null }));
    assert!(matches!(
        v.get_or_create(&ptr("/absent/child")),
        Err(ValueError::KeyNotFound { .. })
    ));
}

#[test]
fn insert_and_erase_at() {
    let mut v = value!({ "list": [1, 3] });
    v.insert_at(&ptr("/list/1"), 2).unwrap();
    v.insert_at(&ptr("/list/-"), 4).unwrap();
    v.insert_at(&ptr("/flag"), true).unwrap();
    assert_eq!(v, value!({ "list": [1, 2, 3, 4], "flag": true }));
    assert_eq!(
        v.insert_at(&ptr("/list/9"), 0),
        Err(ValueError::IndexOutOfRange { index: 9, len: 4 })
    );

    assert_eq!(v.erase_at(&ptr("/list/0")).unwrap(), 1);
    assert_eq!(v.erase_at(&ptr("/flag")).unwrap(), true);
    assert_eq!(v, value!({ "list": [2, 3, 4] }));
    assert!(matches!(
        v.erase_at(&Pointer::root()),
        Err(ValueError::InvalidPointer { .. })
    ));

    v.insert_at(&Pointer::root(), "replaced").unwrap();
    assert_eq!(v, "replaced");
}

#[test]
#[should_panic(expected = "out of range")]
fn index_past_the_end_panics() {
    let v = value!([1]);
    let _ = &v[3];
}
