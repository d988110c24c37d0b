//! Arguments exotic objects.
//!
//! A mapped arguments object aliases some of its indices to the parameter
//! bindings of the call that created it. A mapping is dropped when the
//! index is deleted, redefined as an accessor, or redefined non-writable.
//! Making the index non-configurable alone keeps the alias.

use core_types::{JsResult, JsString, ObjectHandle, Value};

use crate::descriptor::PropertyDescriptor;
use crate::environment::{Binding, DeclarativeEnvironment};
use crate::heap::{ArgumentsData, ObjectKind};
use crate::key::PropertyKey;
use crate::ordinary::{
    ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
    ordinary_set,
};
use crate::realm::Realm;
use crate::storage::{Slot, StoredProperty};

fn mapped_binding(realm: &Realm, object: ObjectHandle, key: &PropertyKey) -> Option<Binding> {
    let index = key.as_array_index()?;
    match &realm.heap().get(object).kind {
        ObjectKind::Arguments(data) => data.mapped(index).cloned(),
        _ => None,
    }
}

fn unmap(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) {
    let Some(index) = key.as_array_index() else {
        return;
    };
    if let ObjectKind::Arguments(data) = &mut realm.heap_mut().get_mut(object).kind {
        data.unmap(index);
    }
}

fn install_common(realm: &mut Realm, object: ObjectHandle, args: &[Value]) {
    let values = realm.intrinsics().array_prototype_values;
    let iterator = PropertyKey::Symbol(realm.symbols().iterator.clone());
    let properties = &mut realm.heap_mut().get_mut(object).properties;
    for (index, arg) in args.iter().enumerate() {
        properties.insert(PropertyKey::from(index as u64), StoredProperty::plain(arg.clone()));
    }
    properties.insert(
        PropertyKey::from("length"),
        StoredProperty {
            slot: Slot::Data {
                value: Value::Number(args.len() as f64),
                writable: true,
            },
            enumerable: false,
            configurable: true,
        },
    );
    properties.insert(
        iterator,
        StoredProperty {
            slot: Slot::Data {
                value: Value::Object(values),
                writable: true,
            },
            enumerable: false,
            configurable: true,
        },
    );
}

/// `CreateMappedArgumentsObject(func, formals, argumentsList, env)`.
///
/// When a formal name repeats, the last occurrence wins the mapping. Only
/// indices below both the argument count and the formal count are mapped.
pub fn create_mapped_arguments_object(
    realm: &mut Realm,
    callee: ObjectHandle,
    formals: &[JsString],
    args: &[Value],
    env: &DeclarativeEnvironment,
) -> ObjectHandle {
    let mut map: Vec<Option<Binding>> = vec![None; args.len().min(formals.len())];
    let mut seen: Vec<&JsString> = Vec::new();
    for (index, name) in formals.iter().enumerate().rev() {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        if let Some(slot) = map.get_mut(index) {
            *slot = env.binding(name);
        }
    }

    let proto = Some(realm.intrinsics().object_prototype);
    let object = realm.allocate(proto, ObjectKind::Arguments(ArgumentsData { map }));
    install_common(realm, object, args);
    realm.heap_mut().get_mut(object).properties.insert(
        PropertyKey::from("callee"),
        StoredProperty {
            slot: Slot::Data {
                value: Value::Object(callee),
                writable: true,
            },
            enumerable: false,
            configurable: true,
        },
    );
    object
}

/// `CreateUnmappedArgumentsObject(argumentsList)`; `callee` throws on access
pub fn create_unmapped_arguments_object(realm: &mut Realm, args: &[Value]) -> ObjectHandle {
    let proto = Some(realm.intrinsics().object_prototype);
    let thrower = realm.intrinsics().throw_type_error;
    let object = realm.allocate(proto, ObjectKind::Arguments(ArgumentsData::default()));
    install_common(realm, object, args);
    realm.heap_mut().get_mut(object).properties.insert(
        PropertyKey::from("callee"),
        StoredProperty {
            slot: Slot::Accessor {
                get: Some(thrower),
                set: Some(thrower),
            },
            enumerable: false,
            configurable: false,
        },
    );
    object
}

/// `[[GetOwnProperty]]`: a mapped index reports the live binding value
pub fn get_own_property(
    realm: &Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> Option<PropertyDescriptor> {
    let mut desc = ordinary_get_own_property(realm, object, key)?;
    if let Some(binding) = mapped_binding(realm, object, key) {
        desc.value = Some(binding.get().unwrap_or(Value::Undefined));
    }
    Some(desc)
}

/// `[[DefineOwnProperty]]`
pub fn define_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    let binding = mapped_binding(realm, object, key);
    let mut new_desc = desc.clone();
    if let Some(binding) = &binding {
        if desc.is_data_descriptor() && desc.value.is_none() && desc.writable == Some(false) {
            new_desc.value = Some(binding.get().unwrap_or(Value::Undefined));
        }
    }
    if !ordinary_define_own_property(realm, object, key, &new_desc)? {
        return Ok(false);
    }
    if let Some(binding) = binding {
        if desc.is_accessor_descriptor() {
            unmap(realm, object, key);
        } else {
            if let Some(value) = &desc.value {
                binding.set(value.clone());
            }
            if desc.writable == Some(false) {
                unmap(realm, object, key);
            }
        }
    }
    Ok(true)
}

/// `[[Get]]`
pub fn get(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    receiver: &Value,
) -> JsResult<Value> {
    match mapped_binding(realm, object, key) {
        Some(binding) => Ok(binding.get().unwrap_or(Value::Undefined)),
        None => ordinary_get(realm, object, key, receiver),
    }
}

/// `[[Set]]`: writes through the alias only when the receiver is the
/// arguments object itself
pub fn set(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
) -> JsResult<bool> {
    if receiver == &Value::Object(object) {
        if let Some(binding) = mapped_binding(realm, object, key) {
            binding.set(value.clone());
        }
    }
    ordinary_set(realm, object, key, value, receiver)
}

/// `[[Delete]]`
pub fn delete(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    let mapped = mapped_binding(realm, object, key).is_some();
    let result = ordinary_delete(realm, object, key)?;
    if result && mapped {
        unmap(realm, object, key);
    }
    Ok(result)
}
