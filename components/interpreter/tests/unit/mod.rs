//! Unit tests for interpreter components

use core_types::{ErrorKind, JsString, Value};
use interpreter::{
    delete_reference, get_value, put_value, resolve_binding, BytecodeChunk, ExecutionContext,
    Opcode, Reference, RegisterId, VM,
};
use object_model::{PropertyKey, RealmConfig};

// ============================================================================
// VM Tests
// ============================================================================

#[test]
fn test_vm_sees_installed_globals() {
    let mut vm = VM::new();
    assert!(matches!(vm.get_global("Reflect").unwrap(), Value::Object(_)));
    assert!(matches!(vm.get_global("Proxy").unwrap(), Value::Object(_)));
}

#[test]
fn test_vm_global_overwrite() {
    let mut vm = VM::new();
    vm.set_global("x", Value::Number(10.0)).unwrap();
    vm.set_global("x", Value::Number(20.0)).unwrap();
    assert_eq!(vm.get_global("x").unwrap(), Value::Number(20.0));
}

#[test]
fn test_vm_recursion_limit_from_config() {
    let config = RealmConfig {
        max_recursion_depth: 4,
        ..RealmConfig::default()
    };
    let mut vm = VM::with_config(config);
    let realm = vm.realm_mut();
    let mut target = realm.create_plain_object();
    for _ in 0..8 {
        let handler = realm.create_plain_object();
        target = object_model::proxy::proxy_create(
            realm,
            &Value::Object(target),
            &Value::Object(handler),
        )
        .unwrap();
    }
    let reference = Reference::named(Value::Object(target), "x", true);
    let err = get_value(realm, &reference).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RangeError);
}

#[test]
fn test_vm_execute_returns_undefined_without_return() {
    let mut vm = VM::new();
    let mut chunk = BytecodeChunk::new();
    chunk.emit_constant(1.0);
    assert_eq!(vm.execute(&chunk).unwrap(), Value::Undefined);
}

// ============================================================================
// Dispatcher Tests
// ============================================================================

#[test]
fn test_registers_and_dup() {
    let mut vm = VM::new();
    let mut chunk = BytecodeChunk::new();
    chunk.register_count = 1;
    chunk.emit_constant("v");
    chunk.emit(Opcode::Dup);
    chunk.emit(Opcode::StoreLocal(RegisterId(0)));
    chunk.emit(Opcode::Pop);
    chunk.emit(Opcode::Pop);
    chunk.emit(Opcode::LoadLocal(RegisterId(0)));
    chunk.emit(Opcode::Return);
    assert_eq!(vm.execute(&chunk).unwrap(), Value::from("v"));
}

#[test]
fn test_array_literal_length() {
    let mut vm = VM::new();
    let mut chunk = BytecodeChunk::new();
    chunk.emit_constant(1.0);
    chunk.emit_constant(2.0);
    chunk.emit_constant(3.0);
    chunk.emit(Opcode::CreateArray(3));
    chunk.emit(Opcode::LoadProperty(JsString::from("length")));
    chunk.emit(Opcode::Return);
    assert_eq!(vm.execute(&chunk).unwrap(), Value::Number(3.0));
}

#[test]
fn test_delete_index_on_array() {
    let mut vm = VM::new();
    let mut chunk = BytecodeChunk::strict();
    chunk.register_count = 1;
    chunk.emit_constant(1.0);
    chunk.emit(Opcode::CreateArray(1));
    chunk.emit(Opcode::StoreLocal(RegisterId(0)));
    chunk.emit_constant("length");
    chunk.emit(Opcode::DeleteIndex);
    let err = vm.execute(&chunk).unwrap_err();
    assert_eq!(err.message(), Some("Cannot delete property 'length' of #<Object>"));
}

#[test]
fn test_strict_store_to_frozen_array_length() {
    let mut vm = VM::new();
    let mut chunk = BytecodeChunk::strict();
    chunk.emit(Opcode::LoadGlobal(JsString::from("Object")));
    chunk.emit(Opcode::LoadMethod(JsString::from("freeze")));
    chunk.emit(Opcode::CreateArray(0));
    chunk.emit(Opcode::Call(1));
    chunk.emit_constant(5.0);
    chunk.emit(Opcode::StoreProperty(JsString::from("length")));
    let err = vm.execute(&chunk).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn test_throw_value() {
    let mut vm = VM::new();
    let mut chunk = BytecodeChunk::new();
    chunk.emit_constant("oops");
    chunk.emit(Opcode::Throw);
    let err = vm.execute(&chunk).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Thrown);
    assert_eq!(err.thrown_value(), Some(&Value::from("oops")));
}

// ============================================================================
// ExecutionContext Tests
// ============================================================================

#[test]
fn test_execution_context_constants() {
    let mut chunk = BytecodeChunk::new();
    chunk.add_constant("first");
    let ctx = ExecutionContext::new(chunk);
    assert_eq!(ctx.constant(0), Value::from("first"));
    assert_eq!(ctx.constant(9), Value::Undefined);
    assert!(!ctx.is_strict());
}

// ============================================================================
// Reference Tests
// ============================================================================

#[test]
fn test_reference_predicates() {
    let property = Reference::named(Value::Null, "x", false);
    assert!(property.is_property_reference());
    assert!(!property.is_strict());
    assert!(!property.is_super_reference());
    assert_eq!(property.this_value(), Some(&Value::Null));

    let unresolvable = Reference::Unresolvable {
        name: JsString::from("y"),
        strict: true,
    };
    assert!(!unresolvable.is_property_reference());
    assert!(unresolvable.is_strict());
    assert_eq!(unresolvable.this_value(), None);
}

#[test]
fn test_resolved_global_round_trip() {
    let mut vm = VM::new();
    let realm = vm.realm_mut();
    let name = JsString::from("Array");
    let reference = resolve_binding(realm, None, &name, true).unwrap();
    assert!(reference.is_property_reference());
    put_value(realm, &reference, Value::Number(1.0)).unwrap();
    assert_eq!(get_value(realm, &reference).unwrap(), Value::Number(1.0));
    assert!(delete_reference(realm, &reference).unwrap());
    let global = realm.intrinsics().global;
    assert!(
        !object_model::operations::has_property(realm, global, &PropertyKey::from("Array")).unwrap()
    );
}
