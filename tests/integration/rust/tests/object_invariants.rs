//! Descriptor invariants that hold for every kind of object

use builtins::ReflectObject;
use core_types::Value;
use integration_tests::{own_keys, run, Script};
use interpreter::{Opcode, VM};
use object_model::Realm;

fn construct(vm: &mut VM, constructor: &str, arg: Value) -> Value {
    let script = Script::sloppy()
        .global("Reflect")
        .method("construct")
        .global(constructor)
        .push(arg)
        .op(Opcode::CreateArray(1))
        .call(2);
    run(vm, script).unwrap()
}

/// One object of each kind, populated with a few properties
fn specimens(vm: &mut VM) -> Vec<(&'static str, Value)> {
    let plain = run(
        vm,
        Script::sloppy().object(&[("a", Value::Number(1.0)), ("b", Value::from("two"))]),
    )
    .unwrap();
    let array = run(vm, Script::sloppy().push(1.0).push(2.0).op(Opcode::CreateArray(2))).unwrap();
    let string = construct(vm, "String", Value::from("abc"));
    let typed = construct(vm, "Uint8Array", Value::Number(3.0));
    let target = run(vm, Script::sloppy().object(&[("p", Value::Null)])).unwrap();
    let proxy = run(
        vm,
        Script::sloppy()
            .global("Proxy")
            .method("revocable")
            .push(target)
            .object(&[])
            .call(2)
            .get("proxy"),
    )
    .unwrap();
    vec![
        ("plain", plain),
        ("array", array),
        ("string", string),
        ("typed", typed),
        ("proxy", proxy),
    ]
}

#[test]
fn test_descriptor_round_trip_is_a_no_op() {
    let mut vm = VM::new();
    for (kind, object) in specimens(&mut vm) {
        let realm: &mut Realm = vm.realm_mut();
        let before = own_keys(realm, &object);
        for key in &before {
            let key = Value::from(key.as_str());
            let desc = ReflectObject::get_own_property_descriptor(realm, &object, &key).unwrap();
            let ok = ReflectObject::define_property(realm, &object, &key, &desc).unwrap();
            assert!(ok, "{} rejected its own descriptor for {:?}", kind, key);
        }
        assert_eq!(own_keys(realm, &object), before, "{} key order changed", kind);
    }
}

#[test]
fn test_non_configurable_non_writable_is_stable() {
    let mut vm = VM::new();
    for (kind, object) in specimens(&mut vm) {
        let script = Script::sloppy()
            .global("Object")
            .method("defineProperty")
            .push(object.clone())
            .push("frozen")
            .object(&[
                ("value", Value::Number(1.0)),
                ("writable", Value::Boolean(false)),
                ("configurable", Value::Boolean(false)),
            ])
            .call(3);
        run(&mut vm, script).unwrap();

        let key = Value::from("frozen");
        let same = run(&mut vm, Script::sloppy().object(&[("value", Value::Number(1.0))])).unwrap();
        let different = run(&mut vm, Script::sloppy().object(&[("value", Value::Number(2.0))]))
            .unwrap();
        let realm = vm.realm_mut();
        assert!(
            !ReflectObject::define_property(realm, &object, &key, &different).unwrap(),
            "{}",
            kind
        );
        assert!(ReflectObject::define_property(realm, &object, &key, &same).unwrap(), "{}", kind);
        assert!(!ReflectObject::delete_property(realm, &object, &key).unwrap(), "{}", kind);
    }
}

#[test]
fn test_delete_twice() {
    let mut vm = VM::new();
    for (kind, object) in specimens(&mut vm) {
        let realm = vm.realm_mut();
        let key = Value::from("transient");
        ReflectObject::set(realm, &object, &key, Value::Boolean(true), None).unwrap();
        let first = ReflectObject::delete_property(realm, &object, &key).unwrap();
        let second = ReflectObject::delete_property(realm, &object, &key).unwrap();
        assert!(first, "{}", kind);
        assert!(second, "{}", kind);
    }
}

#[test]
fn test_integer_keys_enumerate_first() {
    let mut vm = VM::new();
    let object = run(
        &mut vm,
        Script::sloppy().object(
            &[("z", Value::Null), ("10", Value::Null), ("a", Value::Null), ("2", Value::Null)],
        ),
    )
    .unwrap();
    assert_eq!(own_keys(vm.realm_mut(), &object), vec!["2", "10", "z", "a"]);
}
