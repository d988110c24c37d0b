//! Ordinary object internal methods.
//!
//! Exotic objects reuse these on their own storage for every method they do
//! not override. Whenever an algorithm consults the object itself (its own
//! property, its prototype, its extensibility) it goes back through
//! [`crate::dispatch`], so an override on the same object is always honored.
//!
//! Prototype-chain walks are loops rather than recursion: the walk stays in
//! this module while each link uses the ordinary lookup and only re-enters
//! the dispatcher for a link that overrides it (a proxy, a typed array ...).

use core_types::{JsResult, ObjectHandle, Value};

use crate::descriptor::{validate_and_apply_property_descriptor, PropertyDescriptor};
use crate::dispatch;
use crate::heap::ObjectClass;
use crate::key::PropertyKey;
use crate::operations;
use crate::realm::Realm;
use crate::storage::StoredProperty;

/// `OrdinaryGetPrototypeOf(O)`
pub fn ordinary_get_prototype_of(realm: &Realm, object: ObjectHandle) -> Option<ObjectHandle> {
    realm.heap().get(object).prototype
}

/// `OrdinarySetPrototypeOf(O, V)`.
///
/// Rejects any change that would close a cycle through links whose
/// `[[GetPrototypeOf]]` is ordinary; the walk stops at a proxy.
pub fn ordinary_set_prototype_of(
    realm: &mut Realm,
    object: ObjectHandle,
    prototype: Option<ObjectHandle>,
) -> bool {
    let current = realm.heap().get(object).prototype;
    if current == prototype {
        return true;
    }
    if !realm.heap().get(object).extensible {
        return false;
    }
    let mut p = prototype;
    while let Some(link) = p {
        if link == object {
            return false;
        }
        match realm.heap().class_of(link) {
            ObjectClass::Proxy | ObjectClass::ModuleNamespace => break,
            _ => p = realm.heap().get(link).prototype,
        }
    }
    realm.heap_mut().get_mut(object).prototype = prototype;
    true
}

/// `OrdinaryIsExtensible(O)`
pub fn ordinary_is_extensible(realm: &Realm, object: ObjectHandle) -> bool {
    realm.heap().get(object).extensible
}

/// `OrdinaryPreventExtensions(O)`
pub fn ordinary_prevent_extensions(realm: &mut Realm, object: ObjectHandle) -> bool {
    realm.heap_mut().get_mut(object).extensible = false;
    true
}

/// `OrdinaryGetOwnProperty(O, P)`
pub fn ordinary_get_own_property(
    realm: &Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> Option<PropertyDescriptor> {
    realm
        .heap()
        .get(object)
        .properties
        .get(key)
        .map(StoredProperty::to_descriptor)
}

/// `OrdinaryDefineOwnProperty(O, P, Desc)`. Never throws on its own account;
/// a rejected change is reported as `false`.
pub fn ordinary_define_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    let current = dispatch::get_own_property(realm, object, key)?;
    let extensible = dispatch::is_extensible(realm, object)?;
    let storage = &mut realm.heap_mut().get_mut(object).properties;
    Ok(validate_and_apply_property_descriptor(
        Some((storage, key)),
        extensible,
        desc,
        current.as_ref(),
    ))
}

/// `OrdinaryHasProperty(O, P)`
pub fn ordinary_has_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> JsResult<bool> {
    let mut current = object;
    loop {
        if dispatch::get_own_property(realm, current, key)?.is_some() {
            return Ok(true);
        }
        match dispatch::get_prototype_of(realm, current)? {
            None => return Ok(false),
            Some(parent) if realm.heap().class_of(parent).has_ordinary_lookup() => current = parent,
            Some(parent) => return dispatch::has_property(realm, parent, key),
        }
    }
}

/// `OrdinaryGet(O, P, Receiver)`
pub fn ordinary_get(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    receiver: &Value,
) -> JsResult<Value> {
    let mut current = object;
    loop {
        if let Some(desc) = dispatch::get_own_property(realm, current, key)? {
            if desc.is_data_descriptor() {
                return Ok(desc.value.unwrap_or(Value::Undefined));
            }
            return match desc.getter() {
                Some(getter) => dispatch::call(realm, getter, receiver, &[]),
                None => Ok(Value::Undefined),
            };
        }
        match dispatch::get_prototype_of(realm, current)? {
            None => return Ok(Value::Undefined),
            Some(parent) if realm.heap().class_of(parent).has_ordinary_lookup() => current = parent,
            Some(parent) => return dispatch::get(realm, parent, key, receiver),
        }
    }
}

/// `OrdinarySet(O, P, V, Receiver)`
pub fn ordinary_set(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
) -> JsResult<bool> {
    let mut current = object;
    loop {
        if let Some(own) = dispatch::get_own_property(realm, current, key)? {
            return ordinary_set_with_own_descriptor(realm, key, value, receiver, own);
        }
        match dispatch::get_prototype_of(realm, current)? {
            None => {
                let fresh = PropertyDescriptor::data(Value::Undefined, true, true, true);
                return ordinary_set_with_own_descriptor(realm, key, value, receiver, fresh);
            }
            Some(parent) if realm.heap().class_of(parent).has_ordinary_lookup() => current = parent,
            Some(parent) => return dispatch::set(realm, parent, key, value, receiver),
        }
    }
}

/// `OrdinarySetWithOwnDescriptor(O, P, V, Receiver, ownDesc)` once `ownDesc`
/// has been found somewhere on the chain.
///
/// A writable data property found on the chain never gets mutated where it
/// was found: the write lands on `receiver`, either as a `[[Value]]`-only
/// redefinition of an existing own data property or as a new data property.
pub fn ordinary_set_with_own_descriptor(
    realm: &mut Realm,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
    own: PropertyDescriptor,
) -> JsResult<bool> {
    if own.is_data_descriptor() {
        if !own.is_writable() {
            return Ok(false);
        }
        let Value::Object(receiver) = receiver else {
            return Ok(false);
        };
        let receiver = *receiver;
        return match dispatch::get_own_property(realm, receiver, key)? {
            Some(existing) => {
                if existing.is_accessor_descriptor() || !existing.is_writable() {
                    return Ok(false);
                }
                dispatch::define_own_property(
                    realm,
                    receiver,
                    key,
                    &PropertyDescriptor::value_only(value),
                )
            }
            None => operations::create_data_property(realm, receiver, key, value),
        };
    }
    match own.setter() {
        Some(setter) => {
            dispatch::call(realm, setter, receiver, &[value])?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// `OrdinaryDelete(O, P)`
pub fn ordinary_delete(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> JsResult<bool> {
    match dispatch::get_own_property(realm, object, key)? {
        None => Ok(true),
        Some(desc) if desc.is_configurable() => {
            realm.heap_mut().get_mut(object).properties.remove(key);
            Ok(true)
        }
        Some(_) => Ok(false),
    }
}

/// `OrdinaryOwnPropertyKeys(O)`: array indices ascending, then string keys
/// in creation order, then symbol keys in creation order.
pub fn ordinary_own_property_keys(realm: &Realm, object: ObjectHandle) -> Vec<PropertyKey> {
    realm.heap().get(object).properties.keys()
}
