//! Private elements bypass every internal method

use core_types::{JsString, Symbol, Value};
use object_model::private::{
    private_field_add, private_get, private_method_or_accessor_add, private_set,
};
use object_model::proxy::proxy_create;
use object_model::{dispatch, PrivateElement, Realm};

#[test]
fn test_private_fields_are_invisible_to_keys() {
    let mut realm = Realm::new();
    let object = realm.create_plain_object();
    let name = Symbol::new_private(JsString::from("#x"));
    private_field_add(&mut realm, object, name.clone(), Value::Number(1.0)).unwrap();
    assert!(dispatch::own_property_keys(&mut realm, object).unwrap().is_empty());
    private_set(&mut realm, object, &name, Value::Number(2.0)).unwrap();
    assert_eq!(private_get(&mut realm, object, &name).unwrap(), Value::Number(2.0));
    assert!(private_field_add(&mut realm, object, name, Value::Null).is_err());
}

#[test]
fn test_proxy_does_not_forward_private_names() {
    let mut realm = Realm::new();
    let target = realm.create_plain_object();
    let handler = realm.create_plain_object();
    let name = Symbol::new_private(JsString::from("#x"));
    private_field_add(&mut realm, target, name.clone(), Value::Number(1.0)).unwrap();
    let proxy = proxy_create(&mut realm, &Value::Object(target), &Value::Object(handler)).unwrap();
    assert!(private_get(&mut realm, proxy, &name).is_err());
}

#[test]
fn test_methods_and_getter_only_accessors_reject_writes() {
    let mut realm = Realm::new();
    let object = realm.create_plain_object();
    let method = realm.create_native_function("#m", 0, |_, _, _, _| Ok(Value::Undefined));
    let m = Symbol::new_private(JsString::from("#m"));
    private_method_or_accessor_add(
        &mut realm,
        object,
        PrivateElement::Method { key: m.clone(), function: method },
    )
    .unwrap();
    assert_eq!(private_get(&mut realm, object, &m).unwrap(), Value::Object(method));
    assert!(private_set(&mut realm, object, &m, Value::Null).is_err());

    let getter = realm.create_native_function("get #a", 0, |_, _, _, _| Ok(Value::Number(4.0)));
    let a = Symbol::new_private(JsString::from("#a"));
    let accessor = PrivateElement::Accessor {
        key: a.clone(),
        get: Some(getter),
        set: None,
    };
    private_method_or_accessor_add(&mut realm, object, accessor).unwrap();
    assert_eq!(private_get(&mut realm, object, &a).unwrap(), Value::Number(4.0));
    assert!(private_set(&mut realm, object, &a, Value::Null).is_err());
}
