use tessera_format::{Consumer, DebugEvents, EventError};
use tessera_testhelpers::test;
use tessera_value::{Opaque, ToValue, ToViewValue, Value, value};

#[derive(Debug)]
struct Point {
    x: i64,
    y: i64,
}

impl Opaque for Point {
    fn produce<'c>(&'c self, c: &mut dyn Consumer<'c>) -> Result<(), EventError> {
        c.begin_array(Some(2))?;
        c.number_i64(self.x)?;
        c.element()?;
        c.number_i64(self.y)?;
        c.element()?;
        c.end_array(Some(2))
    }
}

#[test]
fn produce_reports_sizes_and_follows_pointers() {
    let shared = value!("shared");
    let v = value!({ "a": [1, (Value::value_ptr(&shared))], "b": null });
    let mut out = String::new();
    v.produce(&mut DebugEvents::new(&mut out)).unwrap();
    insta::assert_snapshot!(out, @r#"
    begin object 2
    key: "a"
    begin array 2
    i64: 1
    element
    string: "shared"
    element
    end array 2
    member
    key: "b"
    null
    member
    end object 2
    "#);
}

#[test]
fn opaque_values_materialize_on_demand() {
    let p = Point { x: 3, y: -4 };
    let v = Value::opaque(&p);
    assert!(v.is_opaque_ptr());
    assert_eq!(v, value!([3, -4]));
    assert_eq!(v.to_owned_value().unwrap(), value!([3, -4]));
}

#[test]
fn round_trip_through_builder() {
    let v = value!({ "k": [true, 1.5, "s"], "bin": (vec![1u8, 2]) });
    let mut builder = ToValue::new();
    v.produce(&mut builder).unwrap();
    assert_eq!(builder.into_value(), v);
}

#[test]
fn view_builder_keeps_borrowed_strings() {
    let v = value!(["one", "two"]);
    let mut builder = ToViewValue::new();
    v.produce(&mut builder).unwrap();
    let copy = builder.into_value();
    assert!(copy[0].is_string_view());
    assert_eq!(copy, v);
}

#[test]
fn uninitialized_values_cannot_produce() {
    let mut v = Value::Uninitialized;
    v.push_back(Value::Uninitialized).unwrap();
    assert_eq!(
        v.produce(&mut ToValue::new()),
        Err(EventError::Uninitialized)
    );
}
