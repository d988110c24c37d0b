//! Proxies observed from script code and through Reflect

use builtins::ReflectObject;
use core_types::{ErrorKind, JsError, Value};
use integration_tests::{native, own_keys, prop, run, Script};
use interpreter::VM;
use object_model::proxy::proxy_create;
use object_model::Realm;

fn empty_handler_proxy(realm: &mut Realm, target: &Value) -> Value {
    let handler = Value::Object(realm.create_plain_object());
    Value::Object(proxy_create(realm, target, &handler).unwrap())
}

/// Runs the same sequence of Reflect operations against `object` and
/// records every result, error kinds included.
fn reflect_transcript(realm: &mut Realm, object: &Value) -> Vec<String> {
    let mut transcript = Vec::new();
    let mut record = |result: Result<Value, JsError>| {
        transcript.push(match result {
            Ok(value) => format!("{:?}", value),
            Err(e) => format!("{}", e.kind()),
        });
    };
    record(
        ReflectObject::set(realm, object, &Value::from("a"), Value::Number(1.0), None)
            .map(Value::Boolean),
    );
    record(ReflectObject::get(realm, object, &Value::from("a"), None));
    record(ReflectObject::has(realm, object, &Value::from("a")).map(Value::Boolean));
    record(ReflectObject::has(realm, object, &Value::from("toString")).map(Value::Boolean));
    record(ReflectObject::delete_property(realm, object, &Value::from("a")).map(Value::Boolean));
    record(ReflectObject::delete_property(realm, object, &Value::from("a")).map(Value::Boolean));
    record(ReflectObject::is_extensible(realm, object).map(Value::Boolean));
    record(ReflectObject::prevent_extensions(realm, object).map(Value::Boolean));
    record(
        ReflectObject::set(realm, object, &Value::from("b"), Value::Number(2.0), None)
            .map(Value::Boolean),
    );
    record(ReflectObject::is_extensible(realm, object).map(Value::Boolean));
    record(ReflectObject::get(realm, &Value::Number(1.0), &Value::from("a"), None));
    transcript
}

#[test]
fn test_two_level_transparency() {
    let mut vm = VM::new();
    let realm = vm.realm_mut();
    let plain = Value::Object(realm.create_plain_object());
    let expected = reflect_transcript(realm, &plain);

    let target = Value::Object(realm.create_plain_object());
    let inner = empty_handler_proxy(realm, &target);
    let outer = empty_handler_proxy(realm, &inner);
    assert_eq!(reflect_transcript(realm, &outer), expected);
    assert_eq!(own_keys(realm, &outer), own_keys(realm, &target));
}

#[test]
fn test_transparency_of_thrown_values() {
    let mut vm = VM::new();
    let thrower = native(
        vm.realm_mut(),
        |_, _, _, _| Err(JsError::thrown(Value::from("from getter"))),
    );
    let target = run(&mut vm, Script::sloppy().object(&[])).unwrap();
    let script = Script::sloppy()
        .global("Object")
        .method("defineProperty")
        .push(target.clone())
        .push("boom")
        .object(&[("get", thrower)])
        .call(3);
    run(&mut vm, script).unwrap();

    let realm = vm.realm_mut();
    let inner = empty_handler_proxy(realm, &target);
    let outer = empty_handler_proxy(realm, &inner);
    vm.set_global("p", outer).unwrap();
    let err = run(&mut vm, Script::strict().global("p").get("boom")).unwrap_err();
    assert_eq!(err.thrown_value(), Some(&Value::from("from getter")));
}

#[test]
fn test_unshift_through_refusing_set_trap() {
    let mut vm = VM::new();
    let set_trap = native(vm.realm_mut(), |_, _, args, _| {
        Ok(Value::Boolean(args.get(1) != Some(&Value::from("length"))))
    });
    let script = Script::sloppy()
        .global("Proxy")
        .method("revocable")
        .object(&[])
        .object(&[("set", set_trap)])
        .call(2)
        .get("proxy")
        .store_global("proxy");
    run(&mut vm, script).unwrap();

    let script = Script::sloppy()
        .global("Array")
        .get("prototype")
        .get("unshift")
        .method("call")
        .global("proxy")
        .call(1);
    let err = run(&mut vm, script).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
    let message = err.message().unwrap_or_default();
    assert!(message.contains("'length'"), "message was {:?}", message);
}

#[test]
fn test_revoked_proxy_rejects_every_access() {
    let mut vm = VM::new();
    let script = Script::sloppy()
        .global("Proxy")
        .method("revocable")
        .object(&[])
        .object(&[])
        .call(2)
        .store_global("pair");
    run(&mut vm, script).unwrap();
    run(&mut vm, Script::sloppy().global("pair").method("revoke").call(0)).unwrap();

    for script in [
        Script::sloppy().global("pair").get("proxy").get("x"),
        Script::sloppy().global("pair").get("proxy").push(1.0).set("x"),
        Script::sloppy().push("x").global("pair").get("proxy").op(interpreter::Opcode::In),
    ] {
        let err = run(&mut vm, script).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }
    let pair = vm.get_global("pair").unwrap();
    let proxy = prop(vm.realm_mut(), &pair, "proxy");
    assert!(matches!(proxy, Value::Object(_)));
}
