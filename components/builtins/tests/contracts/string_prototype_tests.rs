//! Contract tests for String and String.prototype

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use core_types::ErrorKind;
use object_model::{dispatch, PropertyDescriptor};

type Log = Rc<RefCell<Vec<&'static str>>>;

/// An object whose `toString` logs `name` and returns `result`
fn logging_object(realm: &mut Realm, log: &Log, name: &'static str, result: Value) -> Value {
    let object = realm.create_plain_object();
    let log = log.clone();
    let to_string = function(realm, move |_, _, _, _| {
        log.borrow_mut().push(name);
        Ok(result.clone())
    });
    object_model::operations::set(realm, object, &PropertyKey::from("toString"), to_string, true)
        .unwrap();
    Value::Object(object)
}

mod split_tests {
    use super::*;

    /// Contract: split reads @@split, then converts this, limit and separator in order
    #[test]
    fn test_split_coercion_order() {
        let mut realm = realm();
        let log: Log = Rc::default();
        let this = logging_object(&mut realm, &log, "this", Value::from("a-b-c"));
        let limit = logging_object(&mut realm, &log, "limit", Value::from("2"));
        let separator = logging_object(&mut realm, &log, "separator", Value::from("-"));

        let getter_log = log.clone();
        let getter = realm.create_native_function("get", 0, move |_, _, _, _| {
            getter_log.borrow_mut().push("split");
            Ok(Value::Undefined)
        });
        let split_key = PropertyKey::Symbol(realm.symbols().split.clone());
        let accessor = PropertyDescriptor::accessor(Some(getter), None, false, true);
        dispatch::define_own_property(
            &mut realm,
            separator.as_object().unwrap(),
            &split_key,
            &accessor,
        )
        .unwrap();

        let string_prototype = Value::Object(realm.intrinsics().string_prototype);
        let split = prop(&mut realm, &string_prototype, "split");
        let result = call(&mut realm, &split, &this, &[separator, limit]).unwrap();

        assert_eq!(*log.borrow(), vec!["split", "this", "limit", "separator"]);
        assert_eq!(prop(&mut realm, &result, "length"), Value::Number(2.0));
        assert_eq!(prop(&mut realm, &result, "1"), Value::from("b"));
    }

    /// Contract: a separator with @@split takes over the whole call
    #[test]
    fn test_custom_splitter() {
        let mut realm = realm();
        let separator = realm.create_plain_object();
        let splitter = function(
            &mut realm,
            |_, _, args, _| Ok(args.first().cloned().unwrap_or(Value::Undefined)),
        );
        let split_key = PropertyKey::Symbol(realm.symbols().split.clone());
        object_model::operations::set(&mut realm, separator, &split_key, splitter, true).unwrap();
        let result = call_method(
            &mut realm,
            &Value::from("abc"),
            "split",
            &[Value::Object(separator)],
        )
        .unwrap();
        assert_eq!(result, Value::from("abc"));
    }

    /// Contract: split on undefined or null this throws before touching the separator
    #[test]
    fn test_split_requires_coercible_this() {
        let mut realm = realm();
        let log: Log = Rc::default();
        let separator = logging_object(&mut realm, &log, "separator", Value::from(","));
        let string_prototype = Value::Object(realm.intrinsics().string_prototype);
        let split = prop(&mut realm, &string_prototype, "split");
        let err = call(&mut realm, &split, &Value::Undefined, &[separator]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
        assert!(log.borrow().is_empty());
    }
}

mod string_object_tests {
    use super::*;

    /// Contract: String wrappers expose indices as read-only own properties
    #[test]
    fn test_string_wrapper_indices() {
        let mut realm = realm();
        let ctor = global_object(&mut realm, "String");
        let wrapper = object_model::operations::construct(
            &mut realm,
            ctor,
            &[Value::from("ab")],
            None,
        )
        .unwrap();
        let wrapper = Value::Object(wrapper);
        let keys = call_static(&mut realm, "Reflect", "ownKeys", &[wrapper.clone()]).unwrap();
        assert_eq!(prop(&mut realm, &keys, "length"), Value::Number(3.0));
        assert_eq!(prop(&mut realm, &keys, "0"), Value::from("0"));
        assert_eq!(prop(&mut realm, &keys, "2"), Value::from("length"));

        let ok = call_static(
            &mut realm,
            "Reflect",
            "set",
            &[wrapper.clone(), Value::from("0"), Value::from("z")],
        )
        .unwrap();
        assert_eq!(ok, Value::Boolean(false));
        assert_eq!(call_method(&mut realm, &wrapper, "valueOf", &[]).unwrap(), Value::from("ab"));
    }

    /// Contract: `new String(v)` links to String.prototype and `String` is its constructor
    #[test]
    fn test_string_constructor_wiring() {
        let mut realm = realm();
        let ctor = global_object(&mut realm, "String");
        let wrapper = object_model::operations::construct(
            &mut realm,
            ctor,
            &[Value::Number(12.0)],
            None,
        )
        .unwrap();
        let prototype = dispatch::get_prototype_of(&mut realm, wrapper).unwrap();
        assert_eq!(prototype, Some(realm.intrinsics().string_prototype));

        let wrapper = Value::Object(wrapper);
        assert_eq!(prop(&mut realm, &wrapper, "constructor"), Value::Object(ctor));
        assert_eq!(prop(&mut realm, &wrapper, "length"), Value::Number(2.0));
        let called = call(
            &mut realm,
            &Value::Object(ctor),
            &Value::Undefined,
            &[Value::Boolean(true)],
        )
        .unwrap();
        assert_eq!(called, Value::from("true"));
    }

    /// Contract: indexOf never converts a Symbol implicitly
    #[test]
    fn test_index_of_with_symbol() {
        let mut realm = realm();
        let symbol = Value::Symbol(realm.symbols().iterator.clone());
        let err = call_method(&mut realm, &Value::from("abc"), "indexOf", &[symbol]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
        let found = call_method(&mut realm, &Value::from("abc"), "indexOf", &[Value::from("c")])
            .unwrap();
        assert_eq!(found, Value::Number(2.0));
    }

    /// Contract: String(symbol) is the one explicit symbol-to-string conversion
    #[test]
    fn test_string_of_symbol() {
        let mut realm = realm();
        let symbol = Value::Symbol(realm.symbols().iterator.clone());
        let string = global(&mut realm, "String");
        let result = call(&mut realm, &string, &Value::Undefined, &[symbol]).unwrap();
        assert_eq!(result, Value::from("Symbol(Symbol.iterator)"));
    }
}
