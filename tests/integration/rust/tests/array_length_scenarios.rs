//! Array `length` writes from script code
//!
//! `a = [1,2,3,4,5]; Object.defineProperty(a, '3', desc); a.length = n`

use core_types::{ErrorKind, Value};
use integration_tests::{own_keys, prop, run, Script};
use interpreter::{Opcode, VM};

fn five_element_array(vm: &mut VM) -> Value {
    let script = Script::sloppy()
        .push(1.0)
        .push(2.0)
        .push(3.0)
        .push(4.0)
        .push(5.0)
        .op(Opcode::CreateArray(5))
        .store_global("a");
    run(vm, script).unwrap()
}

fn redefine_index_3(vm: &mut VM, configurable: bool) {
    let mut fields = vec![("value", Value::Number(1.0))];
    if !configurable {
        fields.push(("configurable", Value::Boolean(false)));
    }
    let script = Script::sloppy()
        .global("Object")
        .method("defineProperty")
        .global("a")
        .push("3")
        .object(&fields)
        .call(3);
    run(vm, script).unwrap();
}

fn assign_length(strict: bool, length: f64) -> Script {
    let script = if strict { Script::strict() } else { Script::sloppy() };
    script.global("a").push(length).set("length")
}

#[test]
fn test_shrink_after_value_only_redefinition() {
    let mut vm = VM::new();
    let array = five_element_array(&mut vm);
    redefine_index_3(&mut vm, true);
    run(&mut vm, assign_length(true, 2.0)).unwrap();

    let realm = vm.realm_mut();
    assert_eq!(own_keys(realm, &array), vec!["0", "1", "length"]);
    assert_eq!(prop(realm, &array, "length"), Value::Number(2.0));
}

#[test]
fn test_strict_shrink_blocked_by_non_configurable_element() {
    let mut vm = VM::new();
    let array = five_element_array(&mut vm);
    redefine_index_3(&mut vm, false);
    let err = run(&mut vm, assign_length(true, 0.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);

    let realm = vm.realm_mut();
    assert_eq!(prop(realm, &array, "length"), Value::Number(4.0));
    assert_eq!(own_keys(realm, &array), vec!["0", "1", "2", "3", "length"]);
    assert_eq!(prop(realm, &array, "3"), Value::Number(1.0));
}

#[test]
fn test_sloppy_shrink_blocked_silently() {
    let mut vm = VM::new();
    let array = five_element_array(&mut vm);
    redefine_index_3(&mut vm, false);
    assert_eq!(run(&mut vm, assign_length(false, 0.0)).unwrap(), Value::Number(0.0));
    assert_eq!(prop(vm.realm_mut(), &array, "length"), Value::Number(4.0));
}

#[test]
fn test_invalid_length_is_range_error_in_both_modes() {
    for strict in [false, true] {
        let mut vm = VM::new();
        five_element_array(&mut vm);
        let err = run(&mut vm, assign_length(strict, -1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeError);
    }
}

#[test]
fn test_growing_length_leaves_holes() {
    let mut vm = VM::new();
    let array = five_element_array(&mut vm);
    run(&mut vm, assign_length(true, 7.0)).unwrap();
    let realm = vm.realm_mut();
    assert_eq!(prop(realm, &array, "length"), Value::Number(7.0));
    assert_eq!(own_keys(realm, &array).len(), 6);
}
