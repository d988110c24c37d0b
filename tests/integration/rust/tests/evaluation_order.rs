//! Observable call order across coercions, traps and destructuring

use std::cell::RefCell;
use std::rc::Rc;

use core_types::{JsError, Value};
use integration_tests::{native, own_keys, run, Script};
use interpreter::{destructure_array, ArrayPattern, Opcode, Reference, VM};
use object_model::operations::call;
use object_model::Realm;

type Log = Rc<RefCell<Vec<&'static str>>>;

/// A native function that logs `entry` and returns `result`
fn logged(realm: &mut Realm, log: &Log, entry: &'static str, result: Value) -> Value {
    let log = Rc::clone(log);
    native(realm, move |_, _, _, _| {
        log.borrow_mut().push(entry);
        Ok(result.clone())
    })
}

/// `{ get [name]() { log(entry); return result } }` merged into `object`
fn define_logged_getter(
    vm: &mut VM,
    log: &Log,
    object: &Value,
    name: &str,
    entry: &'static str,
    result: Value,
) {
    let getter = logged(vm.realm_mut(), log, entry, result);
    let script = Script::sloppy()
        .global("Object")
        .method("defineProperty")
        .push(object.clone())
        .push(name)
        .object(&[("get", getter), ("configurable", Value::Boolean(true))])
        .call(3);
    run(vm, script).unwrap();
}

#[test]
fn test_rest_destructuring_sequence() {
    let mut vm = VM::new();
    let log: Log = Rc::new(RefCell::new(Vec::new()));

    // iterator: { next() -> { get done() -> true, get value() } }
    let result = run(&mut vm, Script::sloppy().object(&[])).unwrap();
    define_logged_getter(&mut vm, &log, &result, "done", "iterator-done", Value::Boolean(true));
    define_logged_getter(&mut vm, &log, &result, "value", "iterator-value", Value::Undefined);
    let next = logged(vm.realm_mut(), &log, "iterator-step", result);
    let iterator = run(&mut vm, Script::sloppy().object(&[("next", next)])).unwrap();
    let get_iterator = logged(vm.realm_mut(), &log, "iterator", iterator);

    let iterable = run(&mut vm, Script::sloppy().object(&[])).unwrap();
    let script = Script::sloppy()
        .global("Symbol")
        .get("iterator")
        .store_global("iteratorKey")
        .op(Opcode::Pop)
        .push(iterable.clone())
        .global("iteratorKey")
        .push(get_iterator)
        .op(Opcode::SetIndex);
    run(&mut vm, script).unwrap();

    let source = logged(vm.realm_mut(), &log, "source", iterable);
    let target_object = run(&mut vm, Script::sloppy().object(&[])).unwrap();
    let target = logged(vm.realm_mut(), &log, "target", target_object.clone());
    let target_key = logged(vm.realm_mut(), &log, "target-key", Value::from("rest"));

    let pattern = ArrayPattern::new().rest(move |realm: &mut Realm| {
        let base = call(realm, &target, &Value::Undefined, &[])?;
        let key = call(realm, &target_key, &Value::Undefined, &[])?;
        Ok(Reference::property(base, key, true))
    });
    let realm = vm.realm_mut();
    let value = call(realm, &source, &Value::Undefined, &[]).unwrap();
    destructure_array(realm, &pattern, value).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["source", "iterator", "target", "target-key", "iterator-step", "iterator-done"]
    );
    assert_eq!(own_keys(realm, &target_object), vec!["rest"]);
}

#[test]
fn test_split_consults_splitter_before_coercing_this() {
    let mut vm = VM::new();
    let log: Log = Rc::new(RefCell::new(Vec::new()));

    let this_to_string = logged(vm.realm_mut(), &log, "this", Value::from("a-b-c"));
    let this = run(&mut vm, Script::sloppy().object(&[("toString", this_to_string)])).unwrap();
    let limit_value_of = logged(vm.realm_mut(), &log, "limit", Value::Number(2.0));
    let limit = run(&mut vm, Script::sloppy().object(&[("valueOf", limit_value_of)])).unwrap();
    let separator_to_string = logged(vm.realm_mut(), &log, "separator", Value::from("-"));
    let separator = run(&mut vm, Script::sloppy().object(&[("toString", separator_to_string)]))
        .unwrap();

    let script = Script::sloppy()
        .global("Symbol")
        .get("split")
        .store_global("splitKey");
    run(&mut vm, script).unwrap();
    define_split_probe(&mut vm, &log, &separator);

    let script = Script::sloppy()
        .global("String")
        .get("prototype")
        .get("split")
        .method("call")
        .push(this)
        .push(separator)
        .push(limit)
        .call(3)
        .get("length");
    let length = run(&mut vm, script).unwrap();

    assert_eq!(*log.borrow(), vec!["split", "this", "limit", "separator"]);
    assert_eq!(length, Value::Number(2.0));
}

/// `separator[Symbol.split]` as a logging getter returning `undefined`
fn define_split_probe(vm: &mut VM, log: &Log, separator: &Value) {
    let getter = logged(vm.realm_mut(), log, "split", Value::Undefined);
    let script = Script::sloppy()
        .global("Object")
        .method("defineProperty")
        .push(separator.clone())
        .global("splitKey")
        .object(&[("get", getter)])
        .call(3);
    run(vm, script).unwrap();
}

#[test]
fn test_trap_error_aborts_remaining_steps() {
    let mut vm = VM::new();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let trap_log = Rc::clone(&log);
    let get_trap = native(vm.realm_mut(), move |_, _, _, _| {
        trap_log.borrow_mut().push("get");
        Err(JsError::thrown(Value::from("stop")))
    });
    let rhs = logged(vm.realm_mut(), &log, "rhs", Value::Null);
    let script = Script::sloppy()
        .global("Proxy")
        .method("revocable")
        .object(&[])
        .object(&[("get", get_trap)])
        .call(2)
        .get("proxy")
        .get("anything")
        .push(rhs)
        .op(Opcode::LoadUndefined)
        .op(Opcode::Call(0));
    let err = run(&mut vm, script).unwrap_err();
    assert_eq!(err.thrown_value(), Some(&Value::from("stop")));
    assert_eq!(*log.borrow(), vec!["get"]);
}

#[test]
fn test_method_is_read_before_arguments_run() {
    let mut vm = VM::new();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let receiver = run(&mut vm, Script::sloppy().object(&[]).store_global("o")).unwrap();
    let method = logged(vm.realm_mut(), &log, "call m", Value::Number(1.0));
    define_logged_getter(&mut vm, &log, &receiver, "m", "get m", method);
    let argument = logged(vm.realm_mut(), &log, "arg", Value::Null);

    // o.m(arg())
    let script = Script::sloppy()
        .global("o")
        .method("m")
        .push(argument)
        .op(Opcode::LoadUndefined)
        .call(0)
        .call(1);
    assert_eq!(run(&mut vm, script).unwrap(), Value::Number(1.0));
    assert_eq!(*log.borrow(), vec!["get m", "arg", "call m"]);
}
