//! Proxy exotic objects.
//!
//! Every internal method follows the same four steps: check for revocation,
//! look the trap up on the handler (forwarding to the target when it is
//! absent), call it, then validate the result against the target's actual
//! state. The target is always consulted through [`crate::dispatch`], so a
//! proxy whose target is itself a proxy forwards through both layers.
//!
//! Target and handler are read once before the trap runs. A trap that
//! revokes its own proxy therefore still has its result checked against the
//! same target; only later operations see the revocation.

use std::collections::HashSet;

use core_types::{JsError, JsResult, ObjectHandle, Value};
use indexmap::IndexSet;
use log::{debug, trace};

use crate::conversions::{describe, from_property_descriptor, to_property_descriptor};
use crate::descriptor::{is_compatible_property_descriptor, PropertyDescriptor};
use crate::dispatch;
use crate::function::{is_callable, is_constructor};
use crate::heap::{ObjectKind, ProxyData};
use crate::key::PropertyKey;
use crate::operations::{
    call, create_array_from_list, create_list_from_array_like, get_method, ListElementTypes,
};
use crate::realm::Realm;

/// `ProxyCreate(target, handler)`
pub fn proxy_create(realm: &mut Realm, target: &Value, handler: &Value) -> JsResult<ObjectHandle> {
    let (Value::Object(target_object), Value::Object(handler_object)) = (target, handler) else {
        return Err(JsError::type_error(
            "Cannot create proxy with a non-object as target or handler",
        ));
    };
    let data = ProxyData {
        target: Some(*target_object),
        handler: Some(*handler_object),
        callable: is_callable(realm, target),
        constructor: is_constructor(realm, target),
    };
    Ok(realm.allocate(None, ObjectKind::Proxy(data)))
}

/// Revoke a proxy. Later internal methods on it throw; revoking twice is a no-op.
pub fn revoke(realm: &mut Realm, proxy: ObjectHandle) {
    if let ObjectKind::Proxy(data) = &mut realm.heap_mut().get_mut(proxy).kind {
        if data.handler.is_some() {
            data.target = None;
            data.handler = None;
            debug!("proxy {:?} revoked", proxy);
        }
    }
}

/// Whether the proxy has been revoked
pub fn is_revoked(realm: &Realm, proxy: ObjectHandle) -> bool {
    matches!(&realm.heap().get(proxy).kind, ObjectKind::Proxy(data) if data.handler.is_none())
}

fn proxy_slots(
    realm: &Realm,
    proxy: ObjectHandle,
    operation: &str,
) -> JsResult<(ObjectHandle, ObjectHandle)> {
    match &realm.heap().get(proxy).kind {
        ObjectKind::Proxy(ProxyData {
            target: Some(target),
            handler: Some(handler),
            ..
        }) => Ok((*target, *handler)),
        _ => Err(JsError::type_error(format!(
            "Cannot perform '{}' on a proxy that has been revoked",
            operation
        ))),
    }
}

fn lookup_trap(realm: &mut Realm, handler: ObjectHandle, name: &str) -> JsResult<Option<Value>> {
    let trap = get_method(realm, &Value::Object(handler), &PropertyKey::from(name))?;
    if realm.config().proxy_trap_logging {
        match trap {
            Some(_) => trace!("proxy trap '{}' invoked", name),
            None => trace!("proxy trap '{}' absent, forwarding to target", name),
        }
    }
    Ok(trap)
}

fn invariant(trap: &str, detail: impl std::fmt::Display) -> JsError {
    JsError::type_error(format!("'{}' on proxy: {}", trap, detail))
}

/// `[[GetPrototypeOf]]`
pub fn get_prototype_of(realm: &mut Realm, proxy: ObjectHandle) -> JsResult<Option<ObjectHandle>> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "getPrototypeOf")?;
        let Some(trap) = lookup_trap(realm, handler, "getPrototypeOf")? else {
            return dispatch::get_prototype_of(realm, target);
        };
        let result = call(realm, &trap, &Value::Object(handler), &[Value::Object(target)])?;
        let prototype = match result {
            Value::Object(object) => Some(object),
            Value::Null => None,
            _ => return Err(invariant("getPrototypeOf", "trap returned neither object nor null")),
        };
        if dispatch::is_extensible(realm, target)? {
            return Ok(prototype);
        }
        if dispatch::get_prototype_of(realm, target)? != prototype {
            return Err(invariant(
                "getPrototypeOf",
                "proxy target is non-extensible but the trap did not return its actual prototype",
            ));
        }
        Ok(prototype)
    })
}

/// `[[SetPrototypeOf]]`
pub fn set_prototype_of(
    realm: &mut Realm,
    proxy: ObjectHandle,
    prototype: Option<ObjectHandle>,
) -> JsResult<bool> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "setPrototypeOf")?;
        let Some(trap) = lookup_trap(realm, handler, "setPrototypeOf")? else {
            return dispatch::set_prototype_of(realm, target, prototype);
        };
        let args = [Value::Object(target), Value::from(prototype)];
        if !call(realm, &trap, &Value::Object(handler), &args)?.is_truthy() {
            return Ok(false);
        }
        if dispatch::is_extensible(realm, target)? {
            return Ok(true);
        }
        if dispatch::get_prototype_of(realm, target)? != prototype {
            return Err(invariant(
                "setPrototypeOf",
                "trap returned truish for setting a new prototype on the non-extensible proxy target",
            ));
        }
        Ok(true)
    })
}

/// `[[IsExtensible]]`
pub fn is_extensible(realm: &mut Realm, proxy: ObjectHandle) -> JsResult<bool> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "isExtensible")?;
        let Some(trap) = lookup_trap(realm, handler, "isExtensible")? else {
            return dispatch::is_extensible(realm, target);
        };
        let result = call(realm, &trap, &Value::Object(handler), &[Value::Object(target)])?
            .is_truthy();
        let actual = dispatch::is_extensible(realm, target)?;
        if result != actual {
            return Err(invariant(
                "isExtensible",
                format!(
                    "trap result does not reflect extensibility of proxy target (which is '{}')",
                    actual
                ),
            ));
        }
        Ok(result)
    })
}

/// `[[PreventExtensions]]`
pub fn prevent_extensions(realm: &mut Realm, proxy: ObjectHandle) -> JsResult<bool> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "preventExtensions")?;
        let Some(trap) = lookup_trap(realm, handler, "preventExtensions")? else {
            return dispatch::prevent_extensions(realm, target);
        };
        let result = call(realm, &trap, &Value::Object(handler), &[Value::Object(target)])?
            .is_truthy();
        if result && dispatch::is_extensible(realm, target)? {
            return Err(invariant(
                "preventExtensions",
                "trap returned truish but the proxy target is extensible",
            ));
        }
        Ok(result)
    })
}

/// `[[GetOwnProperty]]`
pub fn get_own_property(
    realm: &mut Realm,
    proxy: ObjectHandle,
    key: &PropertyKey,
) -> JsResult<Option<PropertyDescriptor>> {
    realm.guarded(|realm| {
        const TRAP: &str = "getOwnPropertyDescriptor";
        let (target, handler) = proxy_slots(realm, proxy, TRAP)?;
        let Some(trap) = lookup_trap(realm, handler, TRAP)? else {
            return dispatch::get_own_property(realm, target, key);
        };
        let args = [Value::Object(target), key.to_value()];
        let result = call(realm, &trap, &Value::Object(handler), &args)?;
        if !matches!(result, Value::Object(_) | Value::Undefined) {
            return Err(invariant(
                TRAP,
                format!("trap returned neither object nor undefined for property '{}'", key),
            ));
        }
        let target_desc = dispatch::get_own_property(realm, target, key)?;

        if result.is_undefined() {
            let Some(target_desc) = target_desc else {
                return Ok(None);
            };
            if !target_desc.is_configurable() {
                return Err(invariant(
                    TRAP,
                    format!(
                        "trap returned undefined for property '{}' which is non-configurable in the proxy target",
                        key
                    ),
                ));
            }
            if !dispatch::is_extensible(realm, target)? {
                return Err(invariant(
                    TRAP,
                    format!(
                        "trap returned undefined for property '{}' which exists in the non-extensible proxy target",
                        key
                    ),
                ));
            }
            return Ok(None);
        }

        let extensible = dispatch::is_extensible(realm, target)?;
        let result_desc = to_property_descriptor(realm, &result)?.complete();
        if !is_compatible_property_descriptor(extensible, &result_desc, target_desc.as_ref()) {
            return Err(invariant(
                TRAP,
                format!(
                    "trap returned descriptor for property '{}' that is incompatible with the existing property in the proxy target",
                    key
                ),
            ));
        }
        if !result_desc.is_configurable() {
            match &target_desc {
                Some(current) if !current.is_configurable() => {
                    if result_desc.writable == Some(false) && current.is_writable() {
                        return Err(invariant(
                            TRAP,
                            format!(
                                "trap reported non-configurable and writable for property '{}' which is non-configurable, non-writable in the proxy target",
                                key
                            ),
                        ));
                    }
                }
                _ => {
                    return Err(invariant(
                        TRAP,
                        format!(
                            "trap reported non-configurability for property '{}' which is either non-existent or configurable in the proxy target",
                            key
                        ),
                    ))
                }
            }
        }
        Ok(Some(result_desc))
    })
}

/// `[[DefineOwnProperty]]`
pub fn define_own_property(
    realm: &mut Realm,
    proxy: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    realm.guarded(|realm| {
        const TRAP: &str = "defineProperty";
        let (target, handler) = proxy_slots(realm, proxy, TRAP)?;
        let Some(trap) = lookup_trap(realm, handler, TRAP)? else {
            return dispatch::define_own_property(realm, target, key, desc);
        };
        let desc_object = from_property_descriptor(realm, Some(desc))?;
        let args = [Value::Object(target), key.to_value(), desc_object];
        if !call(realm, &trap, &Value::Object(handler), &args)?.is_truthy() {
            return Ok(false);
        }

        let target_desc = dispatch::get_own_property(realm, target, key)?;
        let extensible = dispatch::is_extensible(realm, target)?;
        let setting_non_configurable = desc.configurable == Some(false);
        match target_desc {
            None => {
                if !extensible {
                    return Err(invariant(
                        TRAP,
                        format!(
                            "trap returned truish for adding property '{}' to the non-extensible proxy target",
                            key
                        ),
                    ));
                }
                if setting_non_configurable {
                    return Err(invariant(
                        TRAP,
                        format!(
                            "trap returned truish for defining non-configurable property '{}' which is either non-existent or configurable in the proxy target",
                            key
                        ),
                    ));
                }
            }
            Some(current) => {
                if !is_compatible_property_descriptor(extensible, desc, Some(&current)) {
                    return Err(invariant(
                        TRAP,
                        format!(
                            "trap returned truish for adding property '{}' that is incompatible with the existing property in the proxy target",
                            key
                        ),
                    ));
                }
                if setting_non_configurable && current.is_configurable() {
                    return Err(invariant(
                        TRAP,
                        format!(
                            "trap returned truish for defining non-configurable property '{}' which is either non-existent or configurable in the proxy target",
                            key
                        ),
                    ));
                }
                if current.is_data_descriptor()
                    && !current.is_configurable()
                    && current.is_writable()
                    && desc.writable == Some(false)
                {
                    return Err(invariant(
                        TRAP,
                        format!(
                            "trap returned truish for defining non-configurable property '{}' which cannot be non-writable, unless there exists a corresponding non-configurable, non-writable own property of the target object",
                            key
                        ),
                    ));
                }
            }
        }
        Ok(true)
    })
}

/// `[[HasProperty]]`
pub fn has_property(realm: &mut Realm, proxy: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "has")?;
        let Some(trap) = lookup_trap(realm, handler, "has")? else {
            return dispatch::has_property(realm, target, key);
        };
        let args = [Value::Object(target), key.to_value()];
        let result = call(realm, &trap, &Value::Object(handler), &args)?.is_truthy();
        if !result {
            if let Some(current) = dispatch::get_own_property(realm, target, key)? {
                if !current.is_configurable() {
                    return Err(invariant(
                        "has",
                        format!(
                            "trap returned falsish for property '{}' which exists in the proxy target as non-configurable",
                            key
                        ),
                    ));
                }
                if !dispatch::is_extensible(realm, target)? {
                    return Err(invariant(
                        "has",
                        format!(
                            "trap returned falsish for property '{}' but the proxy target is not extensible",
                            key
                        ),
                    ));
                }
            }
        }
        Ok(result)
    })
}

/// `[[Get]]`
pub fn get(
    realm: &mut Realm,
    proxy: ObjectHandle,
    key: &PropertyKey,
    receiver: &Value,
) -> JsResult<Value> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "get")?;
        let Some(trap) = lookup_trap(realm, handler, "get")? else {
            return dispatch::get(realm, target, key, receiver);
        };
        let args = [Value::Object(target), key.to_value(), receiver.clone()];
        let result = call(realm, &trap, &Value::Object(handler), &args)?;
        if let Some(current) = dispatch::get_own_property(realm, target, key)? {
            if !current.is_configurable() {
                if current.is_data_descriptor() && !current.is_writable() {
                    let expected = current.value.clone().unwrap_or(Value::Undefined);
                    if !result.same_value(&expected) {
                        return Err(invariant(
                            "get",
                            format!(
                                "property '{}' is a read-only and non-configurable data property on the proxy target but the proxy did not return its actual value (expected '{}' but got '{}')",
                                key,
                                describe(&expected),
                                describe(&result)
                            ),
                        ));
                    }
                }
                if current.is_accessor_descriptor()
                    && current.getter().is_none()
                    && !result.is_undefined()
                {
                    return Err(invariant(
                        "get",
                        format!(
                            "property '{}' is a non-configurable accessor property on the proxy target and does not have a getter function, but the trap did not return 'undefined' (got '{}')",
                            key,
                            describe(&result)
                        ),
                    ));
                }
            }
        }
        Ok(result)
    })
}

/// `[[Set]]`
pub fn set(
    realm: &mut Realm,
    proxy: ObjectHandle,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
) -> JsResult<bool> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "set")?;
        let Some(trap) = lookup_trap(realm, handler, "set")? else {
            return dispatch::set(realm, target, key, value, receiver);
        };
        let args = [Value::Object(target), key.to_value(), value.clone(), receiver.clone()];
        if !call(realm, &trap, &Value::Object(handler), &args)?.is_truthy() {
            return Ok(false);
        }
        if let Some(current) = dispatch::get_own_property(realm, target, key)? {
            if !current.is_configurable() {
                if current.is_data_descriptor() && !current.is_writable() {
                    let existing = current.value.clone().unwrap_or(Value::Undefined);
                    if !value.same_value(&existing) {
                        return Err(invariant(
                            "set",
                            format!(
                                "trap returned truish for property '{}' which exists in the proxy target as a non-configurable and non-writable data property with a different value; the trap should either return false or be the same value already on the 'target'",
                                key
                            ),
                        ));
                    }
                }
                if current.is_accessor_descriptor() && current.setter().is_none() {
                    return Err(invariant(
                        "set",
                        format!(
                            "trap returned truish for property '{}' which exists in the proxy target as a non-configurable accessor property without a setter; the trap should return false",
                            key
                        ),
                    ));
                }
            }
        }
        Ok(true)
    })
}

/// `[[Delete]]`
pub fn delete(realm: &mut Realm, proxy: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    realm.guarded(|realm| {
        const TRAP: &str = "deleteProperty";
        let (target, handler) = proxy_slots(realm, proxy, TRAP)?;
        let Some(trap) = lookup_trap(realm, handler, TRAP)? else {
            return dispatch::delete(realm, target, key);
        };
        let args = [Value::Object(target), key.to_value()];
        if !call(realm, &trap, &Value::Object(handler), &args)?.is_truthy() {
            return Ok(false);
        }
        let Some(current) = dispatch::get_own_property(realm, target, key)? else {
            return Ok(true);
        };
        if !current.is_configurable() {
            return Err(invariant(
                TRAP,
                format!(
                    "trap returned truish for property '{}' which is non-configurable in the proxy target",
                    key
                ),
            ));
        }
        if !dispatch::is_extensible(realm, target)? {
            return Err(invariant(
                TRAP,
                format!(
                    "trap returned truish for property '{}' but the proxy target is non-extensible",
                    key
                ),
            ));
        }
        Ok(true)
    })
}

/// `[[OwnPropertyKeys]]`
pub fn own_property_keys(realm: &mut Realm, proxy: ObjectHandle) -> JsResult<Vec<PropertyKey>> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "ownKeys")?;
        let Some(trap) = lookup_trap(realm, handler, "ownKeys")? else {
            return dispatch::own_property_keys(realm, target);
        };
        let result = call(realm, &trap, &Value::Object(handler), &[Value::Object(target)])?;
        let list = create_list_from_array_like(realm, &result, ListElementTypes::PropertyKeys)?;

        let mut seen = HashSet::new();
        let mut trap_keys = Vec::with_capacity(list.len());
        for value in list {
            let key = match value {
                Value::String(s) => PropertyKey::from_string(s),
                Value::Symbol(symbol) => PropertyKey::Symbol(symbol),
                _ => continue,
            };
            if !seen.insert(key.clone()) {
                return Err(invariant(
                    "ownKeys",
                    format!("trap returned duplicate entries ('{}')", key),
                ));
            }
            trap_keys.push(key);
        }

        let extensible = dispatch::is_extensible(realm, target)?;
        let target_keys = dispatch::own_property_keys(realm, target)?;
        let mut configurable_keys = Vec::new();
        let mut non_configurable_keys = Vec::new();
        for key in target_keys {
            match dispatch::get_own_property(realm, target, &key)? {
                Some(desc) if !desc.is_configurable() => non_configurable_keys.push(key),
                _ => configurable_keys.push(key),
            }
        }
        if extensible && non_configurable_keys.is_empty() {
            return Ok(trap_keys);
        }

        let mut unchecked: IndexSet<PropertyKey> = trap_keys.iter().cloned().collect();
        for key in &non_configurable_keys {
            if !unchecked.shift_remove(key) {
                return Err(invariant(
                    "ownKeys",
                    format!("trap result did not include '{}'", key),
                ));
            }
        }
        if extensible {
            return Ok(trap_keys);
        }
        for key in &configurable_keys {
            if !unchecked.shift_remove(key) {
                return Err(invariant(
                    "ownKeys",
                    format!("trap result did not include '{}'", key),
                ));
            }
        }
        if let Some(extra) = unchecked.first() {
            return Err(invariant(
                "ownKeys",
                format!(
                    "trap returned extra keys but proxy target is non-extensible ('{}')",
                    extra
                ),
            ));
        }
        Ok(trap_keys)
    })
}

/// `[[Call]]`
pub fn call_proxy(
    realm: &mut Realm,
    proxy: ObjectHandle,
    this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "apply")?;
        let Some(trap) = lookup_trap(realm, handler, "apply")? else {
            return dispatch::call(realm, target, this, args);
        };
        let arg_array = create_array_from_list(realm, args)?;
        let trap_args = [Value::Object(target), this.clone(), Value::Object(arg_array)];
        call(realm, &trap, &Value::Object(handler), &trap_args)
    })
}

/// `[[Construct]]`
pub fn construct(
    realm: &mut Realm,
    proxy: ObjectHandle,
    args: &[Value],
    new_target: ObjectHandle,
) -> JsResult<ObjectHandle> {
    realm.guarded(|realm| {
        let (target, handler) = proxy_slots(realm, proxy, "construct")?;
        let Some(trap) = lookup_trap(realm, handler, "construct")? else {
            return dispatch::construct(realm, target, args, new_target);
        };
        let arg_array = create_array_from_list(realm, args)?;
        let trap_args = [
            Value::Object(target),
            Value::Object(arg_array),
            Value::Object(new_target),
        ];
        match call(realm, &trap, &Value::Object(handler), &trap_args)? {
            Value::Object(object) => Ok(object),
            other => Err(invariant(
                "construct",
                format!("trap returned non-object ('{}')", describe(&other)),
            )),
        }
    })
}
