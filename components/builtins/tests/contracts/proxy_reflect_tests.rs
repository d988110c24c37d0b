//! Contract tests for Proxy and Reflect per ES2024
//!
//! Proxies without traps must be indistinguishable from their target, traps
//! that lie about non-configurable state must be caught, and Reflect must
//! report failure as `false` where `Object` throws.

use super::*;
use core_types::ErrorKind;

fn new_proxy(realm: &mut Realm, target: Value, handler: Value) -> Value {
    let ctor = global_object(realm, "Proxy");
    let proxy = object_model::operations::construct(realm, ctor, &[target, handler], None).unwrap();
    Value::Object(proxy)
}

fn own_keys(realm: &mut Realm, object: &Value) -> Vec<Value> {
    let keys = call_static(realm, "Reflect", "ownKeys", &[object.clone()]).unwrap();
    object_model::operations::create_list_from_array_like(
        realm,
        &keys,
        object_model::operations::ListElementTypes::Any,
    )
    .unwrap()
}

mod reflect_tests {
    use super::*;

    /// Contract: Reflect.set on a read-only property returns false
    #[test]
    fn test_reflect_set_read_only_returns_false() {
        let mut realm = realm();
        let object = Value::Object(realm.create_plain_object());
        call_static(&mut realm, "Object", "freeze", &[object.clone()]).unwrap();
        let result = call_static(
            &mut realm,
            "Reflect",
            "set",
            &[object, Value::from("x"), Value::Number(1.0)],
        )
        .unwrap();
        assert_eq!(result, Value::Boolean(false));
    }

    /// Contract: Reflect.defineProperty reports false, Object.defineProperty throws
    #[test]
    fn test_define_property_bifurcation() {
        let mut realm = realm();
        let object = Value::Object(realm.create_plain_object());
        let attributes = Value::Object(realm.create_plain_object());
        call_static(&mut realm, "Object", "preventExtensions", &[object.clone()]).unwrap();

        let args = [object.clone(), Value::from("x"), attributes];
        assert_eq!(
            call_static(&mut realm, "Reflect", "defineProperty", &args).unwrap(),
            Value::Boolean(false)
        );
        let err = call_static(&mut realm, "Object", "defineProperty", &args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
        assert_eq!(err.message(), Some("Cannot redefine property: x"));
    }

    /// Contract: deleting an absent property twice reports true both times
    #[test]
    fn test_delete_is_idempotent() {
        let mut realm = realm();
        let object = Value::Object(realm.create_plain_object());
        call_static(&mut realm, "Reflect", "set", &[object.clone(), Value::from("x"), Value::Null])
            .unwrap();
        for _ in 0..2 {
            let deleted = call_static(
                &mut realm,
                "Reflect",
                "deleteProperty",
                &[object.clone(), Value::from("x")],
            )
            .unwrap();
            assert_eq!(deleted, Value::Boolean(true));
        }
    }

    /// Contract: ownKeys orders integer keys, then strings, then symbols
    #[test]
    fn test_own_keys_ordering() {
        let mut realm = realm();
        let object = Value::Object(realm.create_plain_object());
        let symbol = Value::Symbol(realm.symbols().iterator.clone());
        for key in [
            Value::from("b"),
            symbol.clone(),
            Value::from("10"),
            Value::from("a"),
            Value::from("2"),
        ] {
            call_static(&mut realm, "Reflect", "set", &[object.clone(), key, Value::Null]).unwrap();
        }
        assert_eq!(
            own_keys(&mut realm, &object),
            vec![Value::from("2"), Value::from("10"), Value::from("b"), Value::from("a"), symbol]
        );
    }

    /// Contract: Reflect.construct takes its prototype from newTarget
    #[test]
    fn test_construct_uses_new_target_prototype() {
        let mut realm = realm();
        let array = global(&mut realm, "Array");
        let string = global(&mut realm, "String");
        let args = array_of(&mut realm, &[]);
        let result = call_static(&mut realm, "Reflect", "construct", &[array, args, string.clone()])
            .unwrap();
        let prototype = call_static(&mut realm, "Reflect", "getPrototypeOf", &[result.clone()])
            .unwrap();
        assert_eq!(prototype, prop(&mut realm, &string, "prototype"));
        assert_eq!(
            call_static(&mut realm, "Array", "isArray", &[result]).unwrap(),
            Value::Boolean(true)
        );
    }

    /// Contract: Reflect.apply rejects non-callable targets
    #[test]
    fn test_apply_non_callable() {
        let mut realm = realm();
        let args = array_of(&mut realm, &[]);
        let err = call_static(
            &mut realm,
            "Reflect",
            "apply",
            &[Value::Number(1.0), Value::Undefined, args],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }
}

mod proxy_tests {
    use super::*;

    /// Contract: a trap-less proxy over a proxy behaves like the innermost target
    #[test]
    fn test_two_level_transparency() {
        let mut realm = realm();
        let target = Value::Object(realm.create_plain_object());
        call_static(
            &mut realm,
            "Reflect",
            "set",
            &[target.clone(), Value::from("x"), Value::Number(1.0)],
        )
        .unwrap();
        let empty = Value::Object(realm.create_plain_object());
        let inner = new_proxy(&mut realm, target.clone(), empty.clone());
        let outer = new_proxy(&mut realm, inner, empty);

        assert_eq!(prop(&mut realm, &outer, "x"), Value::Number(1.0));
        call_static(
            &mut realm,
            "Reflect",
            "set",
            &[outer.clone(), Value::from("y"), Value::Number(2.0)],
        )
        .unwrap();
        assert_eq!(prop(&mut realm, &target, "y"), Value::Number(2.0));
        assert_eq!(own_keys(&mut realm, &outer), own_keys(&mut realm, &target));
    }

    /// Contract: a falsy set trap surfaces as a TypeError naming the key
    #[test]
    fn test_unshift_through_falsy_set_trap() {
        let mut realm = realm();
        let target = Value::Object(realm.create_plain_object());
        let handler = realm.create_plain_object();
        let trap = function(&mut realm, |_, _, args, _| {
            Ok(Value::Boolean(args.get(1) != Some(&Value::from("length"))))
        });
        object_model::operations::set(&mut realm, handler, &PropertyKey::from("set"), trap, true)
            .unwrap();
        let proxy = new_proxy(&mut realm, target, Value::Object(handler));

        let array_prototype = Value::Object(realm.intrinsics().array_prototype);
        let unshift = prop(&mut realm, &array_prototype, "unshift");
        let err = call(&mut realm, &unshift, &proxy, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
        assert!(err.message().unwrap_or_default().contains("'length'"));
    }

    /// Contract: a get trap may not lie about a frozen data property
    #[test]
    fn test_get_trap_invariant() {
        let mut realm = realm();
        let target = Value::Object(realm.create_plain_object());
        call_static(
            &mut realm,
            "Reflect",
            "set",
            &[target.clone(), Value::from("x"), Value::Number(1.0)],
        )
        .unwrap();
        call_static(&mut realm, "Object", "freeze", &[target.clone()]).unwrap();
        let handler = realm.create_plain_object();
        let trap = function(&mut realm, |_, _, _, _| Ok(Value::Number(2.0)));
        object_model::operations::set(&mut realm, handler, &PropertyKey::from("get"), trap, true)
            .unwrap();
        let proxy = new_proxy(&mut realm, target, Value::Object(handler));

        let err = call_static(&mut realm, "Reflect", "get", &[proxy, Value::from("x")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }

    /// Contract: every operation on a revoked proxy throws
    #[test]
    fn test_revocable() {
        let mut realm = realm();
        let target = Value::Object(realm.create_plain_object());
        let handler = Value::Object(realm.create_plain_object());
        let pair = call_static(&mut realm, "Proxy", "revocable", &[target, handler]).unwrap();
        let proxy = prop(&mut realm, &pair, "proxy");
        let revoke = prop(&mut realm, &pair, "revoke");
        call(&mut realm, &revoke, &Value::Undefined, &[]).unwrap();

        for method in ["getPrototypeOf", "isExtensible", "ownKeys"] {
            let err = call_static(&mut realm, "Reflect", method, &[proxy.clone()]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeError, "{}", method);
        }
        let err = call_static(&mut realm, "Array", "isArray", &[proxy]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }

    /// Contract: Proxy requires object target and handler
    #[test]
    fn test_non_object_arguments() {
        let mut realm = realm();
        let ctor = global_object(&mut realm, "Proxy");
        let err = object_model::operations::construct(
            &mut realm,
            ctor,
            &[Value::Null, Value::Null],
            None,
        )
        .unwrap_err();
        assert_eq!(
            err.message(),
            Some("Cannot create proxy with a non-object as target or handler")
        );
    }
}
