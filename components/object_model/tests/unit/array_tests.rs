//! Array exotic objects

use std::cell::Cell;
use std::rc::Rc;

use core_types::{ErrorKind, Value};
use object_model::exotic::array::array_create;
use object_model::operations::{create_array_from_list, define_property_or_throw, get, set};
use object_model::{dispatch, PropertyDescriptor, PropertyKey, Realm};

fn length(realm: &mut Realm, array: core_types::ObjectHandle) -> Value {
    get(realm, array, &PropertyKey::from("length")).unwrap()
}

#[test]
fn test_length_coercion_reads_value_of_twice() {
    let mut realm = Realm::new();
    let array = array_create(&mut realm, 0, None).unwrap();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let value_of = realm.create_native_function("valueOf", 0, move |_, _, _, _| {
        counter.set(counter.get() + 1);
        Ok(Value::Number(3.0))
    });
    let holder = realm.create_plain_object();
    set(&mut realm, holder, &PropertyKey::from("valueOf"), Value::Object(value_of), true).unwrap();

    let desc = PropertyDescriptor::value_only(Value::Object(holder));
    assert!(
        dispatch::define_own_property(&mut realm, array, &PropertyKey::from("length"), &desc)
            .unwrap()
    );
    assert_eq!(calls.get(), 2);
    assert_eq!(length(&mut realm, array), Value::Number(3.0));
}

#[test]
fn test_truncation_stops_at_non_configurable_element() {
    let mut realm = Realm::new();
    let items: Vec<Value> = (0..5).map(|i| Value::Number(i as f64)).collect();
    let array = create_array_from_list(&mut realm, &items).unwrap();
    let pinned = PropertyDescriptor::data(Value::Number(3.0), true, true, false);
    define_property_or_throw(&mut realm, array, &PropertyKey::from(3u32), &pinned).unwrap();

    assert!(
        !set(&mut realm, array, &PropertyKey::from("length"), Value::Number(0.0), false).unwrap()
    );
    assert_eq!(length(&mut realm, array), Value::Number(4.0));
    for index in 0..4u32 {
        assert_eq!(
            get(&mut realm, array, &PropertyKey::from(index)).unwrap(),
            Value::Number(index as f64)
        );
    }
    let err = set(&mut realm, array, &PropertyKey::from("length"), Value::Number(0.0), true)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn test_length_limits() {
    let mut realm = Realm::new();
    assert_eq!(
        array_create(&mut realm, 1 << 32, None).unwrap_err().kind(),
        ErrorKind::RangeError
    );
    let array = array_create(&mut realm, 0, None).unwrap();
    let huge = PropertyKey::from(4294967294u64);
    set(&mut realm, array, &huge, Value::Null, true).unwrap();
    assert_eq!(length(&mut realm, array), Value::Number(4294967295.0));
    let beyond = PropertyKey::from(4294967295u64);
    set(&mut realm, array, &beyond, Value::Null, true).unwrap();
    assert_eq!(length(&mut realm, array), Value::Number(4294967295.0));
}

#[test]
fn test_negative_length_is_range_error() {
    let mut realm = Realm::new();
    let array = array_create(&mut realm, 0, None).unwrap();
    let err = set(&mut realm, array, &PropertyKey::from("length"), Value::Number(-1.0), true)
        .unwrap_err();
    assert_eq!(err.message(), Some("Invalid array length"));
}
