//! Internal method dispatch.
//!
//! The entry points every consumer uses. Each one reads the object's
//! [`ObjectClass`] once and routes to the variant override, falling back to
//! the ordinary algorithm for methods the variant does not override.

use core_types::{JsError, JsResult, ObjectHandle, Value};

use crate::descriptor::PropertyDescriptor;
use crate::exotic::{arguments, array, module_namespace, string, typed_array};
use crate::heap::{ObjectClass, ObjectKind};
use crate::key::PropertyKey;
use crate::ordinary;
use crate::proxy;
use crate::realm::Realm;

/// `O.[[GetPrototypeOf]]()`
pub fn get_prototype_of(realm: &mut Realm, object: ObjectHandle) -> JsResult<Option<ObjectHandle>> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::get_prototype_of(realm, object),
        ObjectClass::ModuleNamespace => Ok(None),
        _ => Ok(ordinary::ordinary_get_prototype_of(realm, object)),
    }
}

/// `O.[[SetPrototypeOf]](V)`
pub fn set_prototype_of(
    realm: &mut Realm,
    object: ObjectHandle,
    prototype: Option<ObjectHandle>,
) -> JsResult<bool> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::set_prototype_of(realm, object, prototype),
        ObjectClass::ModuleNamespace => Ok(module_namespace::set_prototype_of(prototype)),
        _ => Ok(ordinary::ordinary_set_prototype_of(realm, object, prototype)),
    }
}

/// `O.[[IsExtensible]]()`
pub fn is_extensible(realm: &mut Realm, object: ObjectHandle) -> JsResult<bool> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::is_extensible(realm, object),
        ObjectClass::ModuleNamespace => Ok(false),
        _ => Ok(ordinary::ordinary_is_extensible(realm, object)),
    }
}

/// `O.[[PreventExtensions]]()`
pub fn prevent_extensions(realm: &mut Realm, object: ObjectHandle) -> JsResult<bool> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::prevent_extensions(realm, object),
        ObjectClass::ModuleNamespace => Ok(true),
        ObjectClass::TypedArray => typed_array::prevent_extensions(realm, object),
        _ => Ok(ordinary::ordinary_prevent_extensions(realm, object)),
    }
}

/// `O.[[GetOwnProperty]](P)`
pub fn get_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> JsResult<Option<PropertyDescriptor>> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::get_own_property(realm, object, key),
        ObjectClass::Arguments => Ok(arguments::get_own_property(realm, object, key)),
        ObjectClass::StringWrapper => Ok(string::get_own_property(realm, object, key)),
        ObjectClass::TypedArray => Ok(typed_array::get_own_property(realm, object, key)),
        ObjectClass::ModuleNamespace => module_namespace::get_own_property(realm, object, key),
        _ => Ok(ordinary::ordinary_get_own_property(realm, object, key)),
    }
}

/// `O.[[DefineOwnProperty]](P, Desc)`
pub fn define_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::define_own_property(realm, object, key, desc),
        ObjectClass::Array => array::define_own_property(realm, object, key, desc),
        ObjectClass::Arguments => arguments::define_own_property(realm, object, key, desc),
        ObjectClass::StringWrapper => string::define_own_property(realm, object, key, desc),
        ObjectClass::TypedArray => typed_array::define_own_property(realm, object, key, desc),
        ObjectClass::ModuleNamespace => {
            module_namespace::define_own_property(realm, object, key, desc)
        }
        _ => ordinary::ordinary_define_own_property(realm, object, key, desc),
    }
}

/// `O.[[HasProperty]](P)`
pub fn has_property(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::has_property(realm, object, key),
        ObjectClass::TypedArray => typed_array::has_property(realm, object, key),
        ObjectClass::ModuleNamespace => module_namespace::has_property(realm, object, key),
        _ => ordinary::ordinary_has_property(realm, object, key),
    }
}

/// `O.[[Get]](P, Receiver)`. A missing property reads as `undefined`; only
/// getters, traps and namespace bindings can throw.
pub fn get(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    receiver: &Value,
) -> JsResult<Value> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::get(realm, object, key, receiver),
        ObjectClass::Arguments => arguments::get(realm, object, key, receiver),
        ObjectClass::TypedArray => typed_array::get(realm, object, key, receiver),
        ObjectClass::ModuleNamespace => module_namespace::get(realm, object, key, receiver),
        _ => ordinary::ordinary_get(realm, object, key, receiver),
    }
}

/// `O.[[Set]](P, V, Receiver)`
pub fn set(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
) -> JsResult<bool> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::set(realm, object, key, value, receiver),
        ObjectClass::Arguments => arguments::set(realm, object, key, value, receiver),
        ObjectClass::TypedArray => typed_array::set(realm, object, key, value, receiver),
        ObjectClass::ModuleNamespace => Ok(false),
        _ => ordinary::ordinary_set(realm, object, key, value, receiver),
    }
}

/// `O.[[Delete]](P)`
pub fn delete(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::delete(realm, object, key),
        ObjectClass::Arguments => arguments::delete(realm, object, key),
        ObjectClass::TypedArray => typed_array::delete(realm, object, key),
        ObjectClass::ModuleNamespace => module_namespace::delete(realm, object, key),
        _ => ordinary::ordinary_delete(realm, object, key),
    }
}

/// `O.[[OwnPropertyKeys]]()`
pub fn own_property_keys(realm: &mut Realm, object: ObjectHandle) -> JsResult<Vec<PropertyKey>> {
    match realm.heap().class_of(object) {
        ObjectClass::Proxy => proxy::own_property_keys(realm, object),
        ObjectClass::StringWrapper => Ok(string::own_property_keys(realm, object)),
        ObjectClass::TypedArray => Ok(typed_array::own_property_keys(realm, object)),
        ObjectClass::ModuleNamespace => Ok(module_namespace::own_property_keys(realm, object)),
        _ => Ok(ordinary::ordinary_own_property_keys(realm, object)),
    }
}

/// `F.[[Call]](thisArgument, argumentsList)`
pub fn call(
    realm: &mut Realm,
    function: ObjectHandle,
    this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    let behavior = match &realm.heap().get(function).kind {
        ObjectKind::Function(data) => data.behavior.clone(),
        ObjectKind::Proxy(data) if data.callable => {
            return proxy::call_proxy(realm, function, this, args)
        }
        _ => return Err(JsError::type_error("object is not a function")),
    };
    realm.guarded(|realm| behavior(realm, this, args, None))
}

/// `F.[[Construct]](argumentsList, newTarget)`
pub fn construct(
    realm: &mut Realm,
    function: ObjectHandle,
    args: &[Value],
    new_target: ObjectHandle,
) -> JsResult<ObjectHandle> {
    let behavior = match &realm.heap().get(function).kind {
        ObjectKind::Function(data) if data.constructor => data.behavior.clone(),
        ObjectKind::Proxy(data) if data.constructor => {
            return proxy::construct(realm, function, args, new_target)
        }
        _ => return Err(JsError::type_error("object is not a constructor")),
    };
    let result = realm.guarded(|realm| behavior(realm, &Value::Undefined, args, Some(new_target)))?;
    match result {
        Value::Object(object) => Ok(object),
        _ => Err(JsError::type_error("constructor did not return an object")),
    }
}
