//! Ordinary object internal methods

use core_types::{JsString, Symbol, Value};
use object_model::operations::{
    create_data_property_or_throw, define_property_or_throw, has_own_property, set,
};
use object_model::{dispatch, PropertyDescriptor, PropertyKey, Realm};

fn key(name: &str) -> PropertyKey {
    PropertyKey::from(name)
}

mod key_order_tests {
    use super::*;

    #[test]
    fn test_indices_then_strings_then_symbols() {
        let mut realm = Realm::new();
        let object = realm.create_plain_object();
        let symbol = PropertyKey::Symbol(Symbol::new(Some(JsString::from("s"))));
        for k in [key("b"), key("2"), symbol.clone(), key("1"), key("a")] {
            create_data_property_or_throw(&mut realm, object, &k, Value::Null).unwrap();
        }
        let keys = dispatch::own_property_keys(&mut realm, object).unwrap();
        assert_eq!(keys, vec![key("1"), key("2"), key("b"), key("a"), symbol]);
    }

    #[test]
    fn test_redefinition_keeps_position() {
        let mut realm = Realm::new();
        let object = realm.create_plain_object();
        create_data_property_or_throw(&mut realm, object, &key("x"), Value::Null).unwrap();
        create_data_property_or_throw(&mut realm, object, &key("y"), Value::Null).unwrap();
        set(&mut realm, object, &key("x"), Value::Number(1.0), true).unwrap();
        let keys = dispatch::own_property_keys(&mut realm, object).unwrap();
        assert_eq!(keys, vec![key("x"), key("y")]);
    }

    #[test]
    fn test_large_integer_keys_enumerate_as_strings() {
        let mut realm = Realm::new();
        let object = realm.create_plain_object();
        create_data_property_or_throw(&mut realm, object, &key("a"), Value::Null).unwrap();
        create_data_property_or_throw(&mut realm, object, &key("4294967295"), Value::Null).unwrap();
        create_data_property_or_throw(&mut realm, object, &key("7"), Value::Null).unwrap();
        let keys = dispatch::own_property_keys(&mut realm, object).unwrap();
        assert_eq!(keys, vec![key("7"), key("a"), key("4294967295")]);
    }
}

mod get_set_tests {
    use super::*;

    #[test]
    fn test_getter_receives_receiver() {
        let mut realm = Realm::new();
        let proto = realm.create_plain_object();
        let getter = realm.create_native_function("get x", 0, |_, this, _, _| Ok(this.clone()));
        let desc = PropertyDescriptor::accessor(Some(getter), None, false, true);
        define_property_or_throw(&mut realm, proto, &key("x"), &desc).unwrap();
        let child = realm.create_object(Some(proto));
        let value = dispatch::get(&mut realm, child, &key("x"), &Value::Object(child)).unwrap();
        assert_eq!(value, Value::Object(child));
    }

    #[test]
    fn test_inherited_read_only_blocks_assignment() {
        let mut realm = Realm::new();
        let proto = realm.create_plain_object();
        let desc = PropertyDescriptor::data(Value::Number(1.0), false, true, true);
        define_property_or_throw(&mut realm, proto, &key("x"), &desc).unwrap();
        let child = realm.create_object(Some(proto));
        assert!(!set(&mut realm, child, &key("x"), Value::Number(2.0), false).unwrap());
        assert!(!has_own_property(&mut realm, child, &key("x")).unwrap());
    }

    #[test]
    fn test_inherited_writable_creates_own_property() {
        let mut realm = Realm::new();
        let proto = realm.create_plain_object();
        create_data_property_or_throw(&mut realm, proto, &key("x"), Value::Number(1.0)).unwrap();
        let child = realm.create_object(Some(proto));
        assert!(set(&mut realm, child, &key("x"), Value::Number(2.0), true).unwrap());
        let own = dispatch::get_own_property(&mut realm, child, &key("x")).unwrap().unwrap();
        assert_eq!(own, PropertyDescriptor::data(Value::Number(2.0), true, true, true));
        let inherited = dispatch::get(&mut realm, proto, &key("x"), &Value::Object(proto)).unwrap();
        assert_eq!(inherited, Value::Number(1.0));
    }

    #[test]
    fn test_setter_without_getter_reads_undefined() {
        let mut realm = Realm::new();
        let object = realm.create_plain_object();
        let setter = realm.create_native_function("set x", 1, |_, _, _, _| Ok(Value::Undefined));
        let desc = PropertyDescriptor::accessor(None, Some(setter), true, true);
        define_property_or_throw(&mut realm, object, &key("x"), &desc).unwrap();
        let value = dispatch::get(&mut realm, object, &key("x"), &Value::Object(object)).unwrap();
        assert_eq!(value, Value::Undefined);
        assert!(set(&mut realm, object, &key("x"), Value::Null, true).unwrap());
    }
}

mod define_tests {
    use super::*;

    #[test]
    fn test_non_configurable_cannot_change_kind() {
        let mut realm = Realm::new();
        let object = realm.create_plain_object();
        let desc = PropertyDescriptor::data(Value::Null, true, false, false);
        define_property_or_throw(&mut realm, object, &key("x"), &desc).unwrap();
        let getter = realm.create_native_function("g", 0, |_, _, _, _| Ok(Value::Undefined));
        let accessor = PropertyDescriptor::accessor(Some(getter), None, false, false);
        assert!(!dispatch::define_own_property(&mut realm, object, &key("x"), &accessor).unwrap());
    }

    #[test]
    fn test_writable_non_configurable_may_become_read_only() {
        let mut realm = Realm::new();
        let object = realm.create_plain_object();
        let desc = PropertyDescriptor::data(Value::Null, true, false, false);
        define_property_or_throw(&mut realm, object, &key("x"), &desc).unwrap();
        let lock = PropertyDescriptor {
            writable: Some(false),
            ..Default::default()
        };
        assert!(dispatch::define_own_property(&mut realm, object, &key("x"), &lock).unwrap());
        let unlock = PropertyDescriptor {
            writable: Some(true),
            ..Default::default()
        };
        assert!(!dispatch::define_own_property(&mut realm, object, &key("x"), &unlock).unwrap());
    }

    #[test]
    fn test_non_extensible_rejects_new_keys() {
        let mut realm = Realm::new();
        let object = realm.create_plain_object();
        assert!(dispatch::prevent_extensions(&mut realm, object).unwrap());
        assert!(!set(&mut realm, object, &key("x"), Value::Null, false).unwrap());
        assert!(create_data_property_or_throw(&mut realm, object, &key("x"), Value::Null).is_err());
    }
}

mod prototype_tests {
    use super::*;

    #[test]
    fn test_cycles_are_rejected() {
        let mut realm = Realm::new();
        let a = realm.create_plain_object();
        let b = realm.create_object(Some(a));
        assert!(!dispatch::set_prototype_of(&mut realm, a, Some(b)).unwrap());
        assert!(dispatch::set_prototype_of(&mut realm, a, None).unwrap());
    }

    #[test]
    fn test_non_extensible_keeps_prototype() {
        let mut realm = Realm::new();
        let object = realm.create_plain_object();
        let other = realm.create_plain_object();
        dispatch::prevent_extensions(&mut realm, object).unwrap();
        let current = dispatch::get_prototype_of(&mut realm, object).unwrap();
        assert!(!dispatch::set_prototype_of(&mut realm, object, Some(other)).unwrap());
        assert!(dispatch::set_prototype_of(&mut realm, object, current).unwrap());
    }
}
