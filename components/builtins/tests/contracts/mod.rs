//! Contract tests for builtins component
//!
//! These tests drive the built-ins the way script code would: look the
//! function up on the global object and call it through `[[Call]]`.

use builtins::create_realm;
use core_types::{JsResult, ObjectHandle, Value};
use object_model::operations::{call, get, get_v};
use object_model::{PropertyKey, Realm};

mod array_prototype_tests;
mod proxy_reflect_tests;
mod string_prototype_tests;

/// A realm with every built-in installed
pub fn realm() -> Realm {
    create_realm()
}

/// `globalThis[name]`
pub fn global(realm: &mut Realm, name: &str) -> Value {
    let global = realm.intrinsics().global;
    get(realm, global, &PropertyKey::from(name)).unwrap()
}

/// `globalThis[name]` as an object handle
pub fn global_object(realm: &mut Realm, name: &str) -> ObjectHandle {
    match global(realm, name) {
        Value::Object(object) => object,
        other => panic!("global {} is {:?}", name, other),
    }
}

/// `globalThis[object][method](...args)`
pub fn call_static(
    realm: &mut Realm,
    object: &str,
    method: &str,
    args: &[Value],
) -> JsResult<Value> {
    let holder = global(realm, object);
    let function = get_v(realm, &holder, &PropertyKey::from(method)).unwrap();
    call(realm, &function, &holder, args)
}

/// `this[method](...args)`, resolving the method through `this`
pub fn call_method(
    realm: &mut Realm,
    this: &Value,
    method: &str,
    args: &[Value],
) -> JsResult<Value> {
    let function = get_v(realm, this, &PropertyKey::from(method)).unwrap();
    call(realm, &function, this, args)
}

/// A native function from a closure
pub fn function<F>(realm: &mut Realm, behavior: F) -> Value
where
    F: Fn(&mut Realm, &Value, &[Value], Option<ObjectHandle>) -> JsResult<Value> + 'static,
{
    Value::Object(realm.create_native_function("", 0, behavior))
}

/// An array holding `values`
pub fn array_of(realm: &mut Realm, values: &[Value]) -> Value {
    Value::Object(object_model::operations::create_array_from_list(realm, values).unwrap())
}

/// `object[key]`
pub fn prop(realm: &mut Realm, object: &Value, key: &str) -> Value {
    get_v(realm, object, &PropertyKey::from(key)).unwrap()
}
