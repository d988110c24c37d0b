//! Module namespace exotic objects.
//!
//! String keys are the module's export names, each a live view of the
//! binding it resolves to. The namespace is permanently non-extensible,
//! its prototype is always null and every export is read-only from the
//! outside: `[[Set]]` always fails and exports cannot be deleted or
//! redefined to anything but what they already are.

use std::rc::Rc;

use core_types::{JsError, JsResult, JsString, ObjectHandle, Value};

use crate::descriptor::PropertyDescriptor;
use crate::environment::ModuleRecord;
use crate::heap::{NamespaceData, ObjectKind};
use crate::key::PropertyKey;
use crate::ordinary::{
    ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
    ordinary_has_property, ordinary_own_property_keys,
};
use crate::realm::Realm;
use crate::storage::{Slot, StoredProperty};

/// `ModuleNamespaceCreate(module, exports)`
pub fn module_namespace_create(realm: &mut Realm, module: Rc<ModuleRecord>) -> ObjectHandle {
    let mut exports = module.export_names();
    exports.sort();
    let tag = PropertyKey::Symbol(realm.symbols().to_string_tag.clone());
    let namespace = realm.allocate(
        None,
        ObjectKind::ModuleNamespace(NamespaceData { module, exports }),
    );
    let object = realm.heap_mut().get_mut(namespace);
    object.extensible = false;
    object.properties.insert(
        tag,
        StoredProperty {
            slot: Slot::Data {
                value: Value::from("Module"),
                writable: false,
            },
            enumerable: false,
            configurable: false,
        },
    );
    namespace
}

fn export_name(realm: &Realm, object: ObjectHandle, key: &PropertyKey) -> Option<JsString> {
    let name = key.to_js_string()?;
    match &realm.heap().get(object).kind {
        ObjectKind::ModuleNamespace(data) => data.exports.binary_search(&name).ok().map(|_| name),
        _ => None,
    }
}

fn read_export(realm: &Realm, object: ObjectHandle, name: &JsString) -> JsResult<Value> {
    let binding = match &realm.heap().get(object).kind {
        ObjectKind::ModuleNamespace(data) => data.module.resolve_export(name),
        _ => None,
    };
    binding
        .and_then(|b| b.get())
        .ok_or_else(|| {
            JsError::reference_error(format!("Cannot access '{}' before initialization", name))
        })
}

/// `[[SetPrototypeOf]]` (`SetImmutablePrototype` with a null prototype)
pub fn set_prototype_of(prototype: Option<ObjectHandle>) -> bool {
    prototype.is_none()
}

/// `[[GetOwnProperty]]`
pub fn get_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> JsResult<Option<PropertyDescriptor>> {
    if key.is_symbol() {
        return Ok(ordinary_get_own_property(realm, object, key));
    }
    let Some(name) = export_name(realm, object, key) else {
        return Ok(None);
    };
    let value = read_export(realm, object, &name)?;
    Ok(Some(PropertyDescriptor::data(value, true, true, false)))
}

/// `[[DefineOwnProperty]]`: only a redefinition that changes nothing succeeds
pub fn define_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    if key.is_symbol() {
        return ordinary_define_own_property(realm, object, key, desc);
    }
    let Some(current) = get_own_property(realm, object, key)? else {
        return Ok(false);
    };
    if desc.configurable == Some(true)
        || desc.enumerable == Some(false)
        || desc.is_accessor_descriptor()
        || desc.writable == Some(false)
    {
        return Ok(false);
    }
    Ok(match (&desc.value, &current.value) {
        (Some(value), Some(current)) => value.same_value(current),
        _ => true,
    })
}

/// `[[HasProperty]]`
pub fn has_property(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    if key.is_symbol() {
        return ordinary_has_property(realm, object, key);
    }
    Ok(export_name(realm, object, key).is_some())
}

/// `[[Get]]`: reads the live binding; an uninitialized one is a ReferenceError
pub fn get(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    receiver: &Value,
) -> JsResult<Value> {
    if key.is_symbol() {
        return ordinary_get(realm, object, key, receiver);
    }
    match export_name(realm, object, key) {
        Some(name) => read_export(realm, object, &name),
        None => Ok(Value::Undefined),
    }
}

/// `[[Delete]]`
pub fn delete(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    if key.is_symbol() {
        return ordinary_delete(realm, object, key);
    }
    Ok(export_name(realm, object, key).is_none())
}

/// `[[OwnPropertyKeys]]`: export names in code-unit order, then symbols
pub fn own_property_keys(realm: &Realm, object: ObjectHandle) -> Vec<PropertyKey> {
    let mut keys: Vec<PropertyKey> = match &realm.heap().get(object).kind {
        ObjectKind::ModuleNamespace(data) => {
            data.exports.iter().cloned().map(PropertyKey::from_string).collect()
        }
        _ => Vec::new(),
    };
    keys.extend(
        ordinary_own_property_keys(realm, object)
            .into_iter()
            .filter(PropertyKey::is_symbol),
    );
    keys
}
