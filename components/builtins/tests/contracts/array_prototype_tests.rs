//! Contract tests for Array and Array.prototype

use super::*;
use core_types::ErrorKind;

fn numbers(realm: &mut Realm, values: &[f64]) -> Value {
    let values: Vec<Value> = values.iter().map(|n| Value::Number(*n)).collect();
    array_of(realm, &values)
}

fn key_strings(realm: &mut Realm, object: &Value) -> Vec<String> {
    let keys = call_static(realm, "Reflect", "ownKeys", &[object.clone()]).unwrap();
    let list = object_model::operations::create_list_from_array_like(
        realm,
        &keys,
        object_model::operations::ListElementTypes::Any,
    )
    .unwrap();
    list.iter()
        .map(|key| key.as_string().map(ToString::to_string).unwrap_or_default())
        .collect()
}

fn pin(realm: &mut Realm, array: &Value, index: &str, configurable: bool) {
    let desc = Value::Object(realm.create_plain_object());
    call_static(realm, "Reflect", "set", &[desc.clone(), Value::from("value"), Value::Number(1.0)])
        .unwrap();
    if !configurable {
        call_static(
            realm,
            "Reflect",
            "set",
            &[desc.clone(), Value::from("configurable"), Value::Boolean(false)],
        )
        .unwrap();
    }
    call_static(realm, "Object", "defineProperty", &[array.clone(), Value::from(index), desc])
        .unwrap();
}

mod length_tests {
    use super::*;

    /// Contract: shrinking length deletes every element at or above it
    #[test]
    fn test_shrink_after_redefining_element() {
        let mut realm = realm();
        let array = numbers(&mut realm, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        pin(&mut realm, &array, "3", true);
        call_static(
            &mut realm,
            "Reflect",
            "set",
            &[array.clone(), Value::from("length"), Value::Number(2.0)],
        )
        .unwrap();
        assert_eq!(key_strings(&mut realm, &array), vec!["0", "1", "length"]);
        assert_eq!(prop(&mut realm, &array, "length"), Value::Number(2.0));
    }

    /// Contract: a non-configurable element stops the shrink one past itself
    #[test]
    fn test_shrink_blocked_by_non_configurable_element() {
        let mut realm = realm();
        let array = numbers(&mut realm, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        pin(&mut realm, &array, "3", false);
        let ok = call_static(
            &mut realm,
            "Reflect",
            "set",
            &[array.clone(), Value::from("length"), Value::Number(0.0)],
        )
        .unwrap();
        assert_eq!(ok, Value::Boolean(false));
        assert_eq!(prop(&mut realm, &array, "length"), Value::Number(4.0));
        assert_eq!(prop(&mut realm, &array, "4"), Value::Undefined);
        assert_eq!(prop(&mut realm, &array, "3"), Value::Number(1.0));
    }

    /// Contract: fractional and out-of-range lengths are RangeErrors
    #[test]
    fn test_invalid_length() {
        let mut realm = realm();
        let array = numbers(&mut realm, &[]);
        for bad in [1.5, -1.0, 4294967296.0] {
            let err = call_static(
                &mut realm,
                "Reflect",
                "set",
                &[array.clone(), Value::from("length"), Value::Number(bad)],
            )
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RangeError);
        }
    }

    /// Contract: writing past a non-writable length fails
    #[test]
    fn test_non_writable_length_blocks_growth() {
        let mut realm = realm();
        let array = numbers(&mut realm, &[1.0]);
        let desc = Value::Object(realm.create_plain_object());
        call_static(
            &mut realm,
            "Reflect",
            "set",
            &[desc.clone(), Value::from("writable"), Value::Boolean(false)],
        )
        .unwrap();
        call_static(
            &mut realm,
            "Object",
            "defineProperty",
            &[array.clone(), Value::from("length"), desc],
        )
        .unwrap();
        let ok = call_static(
            &mut realm,
            "Reflect",
            "set",
            &[array.clone(), Value::from("5"), Value::Null],
        )
        .unwrap();
        assert_eq!(ok, Value::Boolean(false));
        let err = call_method(&mut realm, &array, "push", &[Value::Null]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }
}

mod prototype_method_tests {
    use super::*;

    /// Contract: push and unshift are generic over array-likes
    #[test]
    fn test_push_on_array_like() {
        let mut realm = realm();
        let object = Value::Object(realm.create_plain_object());
        let array_prototype = Value::Object(realm.intrinsics().array_prototype);
        let push = prop(&mut realm, &array_prototype, "push");
        let result = call(&mut realm, &push, &object, &[Value::from("a")]).unwrap();
        assert_eq!(result, Value::Number(1.0));
        assert_eq!(prop(&mut realm, &object, "length"), Value::Number(1.0));
        assert_eq!(prop(&mut realm, &object, "0"), Value::from("a"));
    }

    /// Contract: values and @@iterator are the same function
    #[test]
    fn test_values_is_iterator() {
        let mut realm = realm();
        let array_prototype = Value::Object(realm.intrinsics().array_prototype);
        let values = prop(&mut realm, &array_prototype, "values");
        let key = PropertyKey::Symbol(realm.symbols().iterator.clone());
        let iterator = object_model::operations::get_v(&mut realm, &array_prototype, &key).unwrap();
        assert_eq!(values, iterator);
    }

    /// Contract: array iteration observes elements pushed mid-iteration
    #[test]
    fn test_iteration_sees_growth() {
        let mut realm = realm();
        let array = numbers(&mut realm, &[1.0]);
        let iterator = call_method(&mut realm, &array, "values", &[]).unwrap();
        let first = call_method(&mut realm, &iterator, "next", &[]).unwrap();
        assert_eq!(prop(&mut realm, &first, "value"), Value::Number(1.0));
        call_method(&mut realm, &array, "push", &[Value::Number(2.0)]).unwrap();
        let second = call_method(&mut realm, &iterator, "next", &[]).unwrap();
        assert_eq!(prop(&mut realm, &second, "value"), Value::Number(2.0));
        let done = call_method(&mut realm, &iterator, "next", &[]).unwrap();
        assert_eq!(prop(&mut realm, &done, "done"), Value::Boolean(true));
    }

    /// Contract: Array.isArray sees through proxies
    #[test]
    fn test_is_array_through_proxy() {
        let mut realm = realm();
        let array = numbers(&mut realm, &[]);
        let handler = Value::Object(realm.create_plain_object());
        let ctor = global_object(&mut realm, "Proxy");
        let proxy = object_model::operations::construct(&mut realm, ctor, &[array, handler], None)
            .unwrap();
        let result = call_static(&mut realm, "Array", "isArray", &[Value::Object(proxy)]).unwrap();
        assert_eq!(result, Value::Boolean(true));
    }
}
