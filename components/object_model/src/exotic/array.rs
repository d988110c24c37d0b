//! Array exotic objects.
//!
//! The stored `length` is always greater than every own array index unless
//! `length` is non-writable, in which case growth past it is refused.

use core_types::{JsError, JsResult, ObjectHandle, Value};
use log::debug;

use crate::conversions::{to_number, to_uint32};
use crate::descriptor::PropertyDescriptor;
use crate::heap::ObjectKind;
use crate::key::PropertyKey;
use crate::ordinary::{ordinary_define_own_property, ordinary_get_own_property};
use crate::realm::Realm;
use crate::storage::{Slot, StoredProperty};

/// `ArrayCreate(length, proto)`
pub fn array_create(
    realm: &mut Realm,
    length: u64,
    prototype: Option<ObjectHandle>,
) -> JsResult<ObjectHandle> {
    if length > u64::from(u32::MAX) {
        return Err(JsError::range_error("Invalid array length"));
    }
    let prototype = prototype.or(Some(realm.intrinsics().array_prototype));
    let array = realm.allocate(prototype, ObjectKind::Array);
    realm.heap_mut().get_mut(array).properties.insert(
        PropertyKey::from("length"),
        StoredProperty {
            slot: Slot::Data {
                value: Value::Number(length as f64),
                writable: true,
            },
            enumerable: false,
            configurable: false,
        },
    );
    Ok(array)
}

fn length_descriptor(realm: &Realm, array: ObjectHandle) -> (u32, bool) {
    match ordinary_get_own_property(realm, array, &PropertyKey::from("length")) {
        Some(PropertyDescriptor {
            value: Some(Value::Number(n)),
            writable,
            ..
        }) => (n as u32, writable.unwrap_or(false)),
        _ => (0, false),
    }
}

fn write_length(realm: &mut Realm, array: ObjectHandle, length: u32, writable: bool) {
    if let Some(property) = realm
        .heap_mut()
        .get_mut(array)
        .properties
        .get_mut(&PropertyKey::from("length"))
    {
        property.slot = Slot::Data {
            value: Value::Number(f64::from(length)),
            writable,
        };
    }
}

/// `[[DefineOwnProperty]]` for arrays
pub fn define_own_property(
    realm: &mut Realm,
    array: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    if key.is_named("length") {
        return array_set_length(realm, array, desc);
    }
    let Some(index) = key.as_array_index() else {
        return ordinary_define_own_property(realm, array, key, desc);
    };
    let (length, length_writable) = length_descriptor(realm, array);
    if index >= length && !length_writable {
        return Ok(false);
    }
    if !ordinary_define_own_property(realm, array, key, desc)? {
        return Ok(false);
    }
    if index >= length {
        write_length(realm, array, index + 1, length_writable);
    }
    Ok(true)
}

/// `ArraySetLength(A, Desc)`.
///
/// Shrinking deletes elements from the highest index down. The first
/// element that refuses deletion stops the walk: `length` is left at one
/// past that element and the whole operation reports `false`.
pub fn array_set_length(
    realm: &mut Realm,
    array: ObjectHandle,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    let length_key = PropertyKey::from("length");
    let Some(value) = &desc.value else {
        return ordinary_define_own_property(realm, array, &length_key, desc);
    };
    let new_len = to_uint32(realm, value)?;
    let number_len = to_number(realm, value)?;
    if f64::from(new_len) != number_len {
        return Err(JsError::range_error("Invalid array length"));
    }
    let mut new_len_desc = desc.clone();
    new_len_desc.value = Some(Value::Number(f64::from(new_len)));

    let (old_len, old_writable) = length_descriptor(realm, array);
    if new_len >= old_len {
        return ordinary_define_own_property(realm, array, &length_key, &new_len_desc);
    }
    if !old_writable {
        return Ok(false);
    }
    let new_writable = new_len_desc.writable != Some(false);
    if !new_writable {
        new_len_desc.writable = Some(true);
    }
    if !ordinary_define_own_property(realm, array, &length_key, &new_len_desc)? {
        return Ok(false);
    }

    let doomed = realm.heap().get(array).properties.array_indices_from(new_len);
    for index in doomed {
        let element = PropertyKey::from(index);
        let configurable = realm
            .heap()
            .get(array)
            .properties
            .get(&element)
            .map_or(true, |p| p.configurable);
        if !configurable {
            debug!(
                "array length truncation to {} stopped at non-configurable index {}",
                new_len, index
            );
            write_length(realm, array, index + 1, new_writable);
            return Ok(false);
        }
        realm.heap_mut().get_mut(array).properties.remove(&element);
    }
    if !new_writable {
        write_length(realm, array, new_len, false);
    }
    Ok(true)
}
