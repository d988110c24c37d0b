//! Dispatcher contracts shared by every object kind

use core_types::{ObjectHandle, Value};
use object_model::exotic::array::array_create;
use object_model::exotic::string::string_create;
use object_model::operations::{create_data_property_or_throw, define_property_or_throw, set};
use object_model::proxy::proxy_create;
use object_model::{dispatch, PropertyDescriptor, PropertyKey, Realm};

fn sample_target(realm: &mut Realm) -> ObjectHandle {
    let target = realm.create_plain_object();
    create_data_property_or_throw(realm, target, &PropertyKey::from("a"), Value::Number(1.0))
        .unwrap();
    let frozen = PropertyDescriptor::data(Value::Number(2.0), false, false, false);
    define_property_or_throw(realm, target, &PropertyKey::from("b"), &frozen).unwrap();
    create_data_property_or_throw(realm, target, &PropertyKey::from(0u32), Value::Null).unwrap();
    target
}

fn empty_proxy(realm: &mut Realm, target: ObjectHandle) -> ObjectHandle {
    let handler = realm.create_plain_object();
    proxy_create(realm, &Value::Object(target), &Value::Object(handler)).unwrap()
}

/// Contract: a proxy without traps is indistinguishable from its target
#[test]
fn test_trapless_proxy_is_transparent() {
    let mut realm = Realm::new();
    let target = sample_target(&mut realm);
    let inner = empty_proxy(&mut realm, target);
    let outer = empty_proxy(&mut realm, inner);

    for object in [inner, outer] {
        assert_eq!(
            dispatch::own_property_keys(&mut realm, object).unwrap(),
            dispatch::own_property_keys(&mut realm, target).unwrap()
        );
        for name in ["a", "b", "0", "missing"] {
            let key = PropertyKey::from(name);
            assert_eq!(
                dispatch::get_own_property(&mut realm, object, &key).unwrap(),
                dispatch::get_own_property(&mut realm, target, &key).unwrap()
            );
            assert_eq!(
                dispatch::has_property(&mut realm, object, &key).unwrap(),
                dispatch::has_property(&mut realm, target, &key).unwrap()
            );
        }
        assert_eq!(
            dispatch::get_prototype_of(&mut realm, object).unwrap(),
            dispatch::get_prototype_of(&mut realm, target).unwrap()
        );
    }

    let b = PropertyKey::from("b");
    assert!(!dispatch::set(&mut realm, outer, &b, Value::Null, &Value::Object(outer)).unwrap());
    assert!(!dispatch::delete(&mut realm, outer, &b).unwrap());
    assert!(dispatch::delete(&mut realm, outer, &PropertyKey::from("a")).unwrap());
    assert!(!dispatch::has_property(&mut realm, target, &PropertyKey::from("a")).unwrap());
    assert!(dispatch::prevent_extensions(&mut realm, outer).unwrap());
    assert!(!dispatch::is_extensible(&mut realm, target).unwrap());
}

/// Contract: `Set` with throw=false reports failure; throw=true raises TypeError
#[test]
fn test_set_bifurcation() {
    let mut realm = Realm::new();
    let target = sample_target(&mut realm);
    let b = PropertyKey::from("b");
    assert!(!set(&mut realm, target, &b, Value::Null, false).unwrap());
    let err = set(&mut realm, target, &b, Value::Null, true).unwrap_err();
    assert_eq!(err.message(), Some("Cannot assign to read only property 'b' of object"));
}

/// Contract: string wrapper indices are read-only own properties
#[test]
fn test_string_wrapper_indices() {
    let mut realm = Realm::new();
    let wrapper = string_create(&mut realm, "ab".into(), None);
    let desc = dispatch::get_own_property(&mut realm, wrapper, &PropertyKey::from(1u32))
        .unwrap()
        .unwrap();
    assert_eq!(desc, PropertyDescriptor::data(Value::from("b"), false, true, false));
    assert!(!set(&mut realm, wrapper, &PropertyKey::from(0u32), Value::from("z"), false).unwrap());
    assert!(set(&mut realm, wrapper, &PropertyKey::from(5u32), Value::from("z"), false).unwrap());
    let keys = dispatch::own_property_keys(&mut realm, wrapper).unwrap();
    assert_eq!(
        keys,
        vec![
            PropertyKey::from(0u32),
            PropertyKey::from(1u32),
            PropertyKey::from(5u32),
            PropertyKey::from("length")
        ]
    );
}

/// Contract: array index writes keep `length` one past the largest index
#[test]
fn test_array_length_tracks_indices() {
    let mut realm = Realm::new();
    let array = array_create(&mut realm, 0, None).unwrap();
    set(&mut realm, array, &PropertyKey::from(9u32), Value::Null, true).unwrap();
    let length = dispatch::get(
        &mut realm,
        array,
        &PropertyKey::from("length"),
        &Value::Object(array),
    )
    .unwrap();
    assert_eq!(length, Value::Number(10.0));
}
