//! Abstract operations over the internal methods.
//!
//! Internal methods report ordinary failure as `false`. The `*_or_throw`
//! variants here are where that `false` becomes a TypeError, with a message
//! naming the property and, for proxies, the trap that refused.

use core_types::{JsError, JsResult, ObjectHandle, Value};

use crate::conversions::{describe, to_length, to_object};
use crate::descriptor::PropertyDescriptor;
use crate::dispatch;
use crate::exotic::array::array_create;
use crate::function::is_callable;
use crate::heap::{ObjectClass, ObjectKind};
use crate::key::PropertyKey;
use crate::realm::Realm;

fn is_proxy(realm: &Realm, object: ObjectHandle) -> bool {
    realm.heap().class_of(object) == ObjectClass::Proxy
}

/// The TypeError raised when `[[Set]]` on `object` reported failure
pub fn set_failure_error(realm: &Realm, object: ObjectHandle, key: &PropertyKey) -> JsError {
    if is_proxy(realm, object) {
        JsError::type_error(format!(
            "Proxy object's 'set' trap returned falsy value for property '{}'",
            key
        ))
    } else {
        JsError::type_error(format!("Cannot assign to read only property '{}' of object", key))
    }
}

fn define_failure_error(realm: &Realm, object: ObjectHandle, key: &PropertyKey) -> JsError {
    if is_proxy(realm, object) {
        JsError::type_error(format!(
            "'defineProperty' on proxy: trap returned falsish for property '{}'",
            key
        ))
    } else {
        JsError::type_error(format!("Cannot redefine property: {}", key))
    }
}

fn delete_failure_error(realm: &Realm, object: ObjectHandle, key: &PropertyKey) -> JsError {
    if is_proxy(realm, object) {
        JsError::type_error(format!(
            "'deleteProperty' on proxy: trap returned falsish for property '{}'",
            key
        ))
    } else {
        JsError::type_error(format!("Cannot delete property '{}' of object", key))
    }
}

/// `Get(O, P)`
pub fn get(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<Value> {
    dispatch::get(realm, object, key, &Value::Object(object))
}

/// `GetV(V, P)`: property lookup on any value, with the original value as receiver
pub fn get_v(realm: &mut Realm, value: &Value, key: &PropertyKey) -> JsResult<Value> {
    let object = to_object(realm, value)?;
    dispatch::get(realm, object, key, value)
}

/// `GetMethod(V, P)`: `None` for `undefined`/`null`, TypeError for other non-callables
pub fn get_method(realm: &mut Realm, value: &Value, key: &PropertyKey) -> JsResult<Option<Value>> {
    let function = get_v(realm, value, key)?;
    if function.is_nullish() {
        return Ok(None);
    }
    if !is_callable(realm, &function) {
        return Err(JsError::type_error(format!("{} is not a function", describe(&function))));
    }
    Ok(Some(function))
}

/// `Call(F, V, argumentsList)`
pub fn call(realm: &mut Realm, function: &Value, this: &Value, args: &[Value]) -> JsResult<Value> {
    match function {
        Value::Object(object) if is_callable(realm, function) => {
            dispatch::call(realm, *object, this, args)
        }
        _ => Err(JsError::type_error(format!("{} is not a function", describe(function)))),
    }
}

/// `Construct(F, argumentsList, newTarget)`; `newTarget` defaults to `F`
pub fn construct(
    realm: &mut Realm,
    function: ObjectHandle,
    args: &[Value],
    new_target: Option<ObjectHandle>,
) -> JsResult<ObjectHandle> {
    dispatch::construct(realm, function, args, new_target.unwrap_or(function))
}

/// `Invoke(V, P, argumentsList)`
pub fn invoke(
    realm: &mut Realm,
    value: &Value,
    key: &PropertyKey,
    args: &[Value],
) -> JsResult<Value> {
    let function = get_v(realm, value, key)?;
    call(realm, &function, value, args)
}

/// `Set(O, P, V, Throw)`
pub fn set(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    value: Value,
    throw: bool,
) -> JsResult<bool> {
    let success = dispatch::set(realm, object, key, value, &Value::Object(object))?;
    if !success && throw {
        return Err(set_failure_error(realm, object, key));
    }
    Ok(success)
}

/// `CreateDataProperty(O, P, V)`
pub fn create_data_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    value: Value,
) -> JsResult<bool> {
    let desc = PropertyDescriptor::data(value, true, true, true);
    dispatch::define_own_property(realm, object, key, &desc)
}

/// `CreateDataPropertyOrThrow(O, P, V)`
pub fn create_data_property_or_throw(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    value: Value,
) -> JsResult<()> {
    if !create_data_property(realm, object, key, value)? {
        return Err(define_failure_error(realm, object, key));
    }
    Ok(())
}

/// `DefinePropertyOrThrow(O, P, desc)`
pub fn define_property_or_throw(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<()> {
    if !dispatch::define_own_property(realm, object, key, desc)? {
        return Err(define_failure_error(realm, object, key));
    }
    Ok(())
}

/// `DeletePropertyOrThrow(O, P)`
pub fn delete_property_or_throw(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> JsResult<()> {
    if !dispatch::delete(realm, object, key)? {
        return Err(delete_failure_error(realm, object, key));
    }
    Ok(())
}

/// `HasProperty(O, P)`
pub fn has_property(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    dispatch::has_property(realm, object, key)
}

/// `HasOwnProperty(O, P)`
pub fn has_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> JsResult<bool> {
    Ok(dispatch::get_own_property(realm, object, key)?.is_some())
}

/// `LengthOfArrayLike(obj)`
pub fn length_of_array_like(realm: &mut Realm, object: ObjectHandle) -> JsResult<u64> {
    let length = get(realm, object, &PropertyKey::from("length"))?;
    to_length(realm, &length)
}

/// Element types accepted by [`create_list_from_array_like`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListElementTypes {
    /// Any value
    Any,
    /// Strings and symbols only
    PropertyKeys,
}

/// `CreateListFromArrayLike(obj, elementTypes)`.
///
/// Reads `length` and then each index through `[[Get]]`; never consults
/// `@@iterator`.
pub fn create_list_from_array_like(
    realm: &mut Realm,
    value: &Value,
    element_types: ListElementTypes,
) -> JsResult<Vec<Value>> {
    let Value::Object(object) = value else {
        return Err(JsError::type_error("CreateListFromArrayLike called on non-object"));
    };
    let object = *object;
    let length = length_of_array_like(realm, object)?;
    let mut list = Vec::new();
    for index in 0..length {
        let next = get(realm, object, &PropertyKey::from(index))?;
        if element_types == ListElementTypes::PropertyKeys
            && !matches!(next, Value::String(_) | Value::Symbol(_))
        {
            return Err(JsError::type_error(format!(
                "{} is not a valid property name",
                describe(&next)
            )));
        }
        list.push(next);
    }
    Ok(list)
}

/// `CreateArrayFromList(elements)`
pub fn create_array_from_list(realm: &mut Realm, elements: &[Value]) -> JsResult<ObjectHandle> {
    let array = array_create(realm, 0, None)?;
    for (index, element) in elements.iter().enumerate() {
        create_data_property_or_throw(
            realm,
            array,
            &PropertyKey::from(index as u64),
            element.clone(),
        )?;
    }
    Ok(array)
}

/// `IsArray(argument)`: sees through proxies, throws on a revoked one
pub fn is_array(realm: &Realm, value: &Value) -> JsResult<bool> {
    let Value::Object(mut object) = value.clone() else {
        return Ok(false);
    };
    loop {
        match &realm.heap().get(object).kind {
            ObjectKind::Array => return Ok(true),
            ObjectKind::Proxy(data) => match (data.handler, data.target) {
                (Some(_), Some(target)) => object = target,
                _ => {
                    return Err(JsError::type_error(
                        "Cannot perform 'IsArray' on a proxy that has been revoked",
                    ))
                }
            },
            _ => return Ok(false),
        }
    }
}

/// Integrity levels for [`set_integrity_level`] and [`test_integrity_level`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityLevel {
    /// Non-extensible, every property non-configurable
    Sealed,
    /// Sealed, and every data property non-writable
    Frozen,
}

/// `SetIntegrityLevel(O, level)`
pub fn set_integrity_level(
    realm: &mut Realm,
    object: ObjectHandle,
    level: IntegrityLevel,
) -> JsResult<bool> {
    if !dispatch::prevent_extensions(realm, object)? {
        return Ok(false);
    }
    let keys = dispatch::own_property_keys(realm, object)?;
    for key in keys {
        let desc = match level {
            IntegrityLevel::Sealed => PropertyDescriptor {
                configurable: Some(false),
                ..Default::default()
            },
            IntegrityLevel::Frozen => match dispatch::get_own_property(realm, object, &key)? {
                None => continue,
                Some(current) if current.is_accessor_descriptor() => PropertyDescriptor {
                    configurable: Some(false),
                    ..Default::default()
                },
                Some(_) => PropertyDescriptor {
                    configurable: Some(false),
                    writable: Some(false),
                    ..Default::default()
                },
            },
        };
        define_property_or_throw(realm, object, &key, &desc)?;
    }
    Ok(true)
}

/// `TestIntegrityLevel(O, level)`
pub fn test_integrity_level(
    realm: &mut Realm,
    object: ObjectHandle,
    level: IntegrityLevel,
) -> JsResult<bool> {
    if dispatch::is_extensible(realm, object)? {
        return Ok(false);
    }
    for key in dispatch::own_property_keys(realm, object)? {
        if let Some(current) = dispatch::get_own_property(realm, object, &key)? {
            if current.is_configurable() {
                return Ok(false);
            }
            if level == IntegrityLevel::Frozen
                && current.is_data_descriptor()
                && current.is_writable()
            {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// What [`enumerable_own_properties`] collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerableKind {
    /// Key strings
    Keys,
    /// Values
    Values,
    /// `[key, value]` arrays
    Entries,
}

/// `EnumerableOwnProperties(O, kind)`: string keys only, in
/// `[[OwnPropertyKeys]]` order, skipping keys that vanish or turn
/// non-enumerable while earlier values are read
pub fn enumerable_own_properties(
    realm: &mut Realm,
    object: ObjectHandle,
    kind: EnumerableKind,
) -> JsResult<Vec<Value>> {
    let keys = dispatch::own_property_keys(realm, object)?;
    let mut properties = Vec::new();
    for key in keys.into_iter().filter(|k| !k.is_symbol()) {
        let Some(desc) = dispatch::get_own_property(realm, object, &key)? else {
            continue;
        };
        if !desc.is_enumerable() {
            continue;
        }
        if kind == EnumerableKind::Keys {
            properties.push(key.to_value());
            continue;
        }
        let value = get(realm, object, &key)?;
        if kind == EnumerableKind::Values {
            properties.push(value);
        } else {
            let entry = create_array_from_list(realm, &[key.to_value(), value])?;
            properties.push(Value::Object(entry));
        }
    }
    Ok(properties)
}

/// `GetPrototypeFromConstructor(constructor, intrinsicDefaultProto)`
pub fn get_prototype_from_constructor(
    realm: &mut Realm,
    constructor: ObjectHandle,
    fallback: ObjectHandle,
) -> JsResult<ObjectHandle> {
    match get(realm, constructor, &PropertyKey::from("prototype"))? {
        Value::Object(prototype) => Ok(prototype),
        _ => Ok(fallback),
    }
}

/// `OrdinaryCreateFromConstructor(constructor, intrinsicDefaultProto)` for
/// an object of the given kind
pub fn ordinary_create_from_constructor(
    realm: &mut Realm,
    constructor: ObjectHandle,
    fallback: ObjectHandle,
    kind: ObjectKind,
) -> JsResult<ObjectHandle> {
    let prototype = get_prototype_from_constructor(realm, constructor, fallback)?;
    Ok(realm.allocate(Some(prototype), kind))
}
