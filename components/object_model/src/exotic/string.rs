//! String exotic objects.
//!
//! Indices inside the wrapped string are own, enumerable, non-writable,
//! non-configurable properties computed on demand, never stored.

use core_types::{JsResult, JsString, ObjectHandle, Value};

use crate::descriptor::{is_compatible_property_descriptor, PropertyDescriptor};
use crate::heap::ObjectKind;
use crate::key::PropertyKey;
use crate::ordinary::{ordinary_define_own_property, ordinary_get_own_property};
use crate::realm::Realm;
use crate::storage::{Slot, StoredProperty};

/// `StringCreate(value, prototype)`
pub fn string_create(
    realm: &mut Realm,
    value: JsString,
    prototype: Option<ObjectHandle>,
) -> ObjectHandle {
    let prototype = prototype.or(Some(realm.intrinsics().string_prototype));
    let length = value.len();
    let object = realm.allocate(prototype, ObjectKind::StringWrapper(value));
    realm.heap_mut().get_mut(object).properties.insert(
        PropertyKey::from("length"),
        StoredProperty {
            slot: Slot::Data {
                value: Value::Number(length as f64),
                writable: false,
            },
            enumerable: false,
            configurable: false,
        },
    );
    object
}

fn wrapped(realm: &Realm, object: ObjectHandle) -> JsString {
    match &realm.heap().get(object).kind {
        ObjectKind::StringWrapper(s) => s.clone(),
        _ => JsString::empty(),
    }
}

/// `StringGetOwnProperty(S, P)`
fn string_get_own_property(
    realm: &Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> Option<PropertyDescriptor> {
    let index = usize::try_from(key.as_integer_index()?).ok()?;
    let unit = wrapped(realm, object).char_at(index)?;
    Some(PropertyDescriptor::data(Value::String(unit), false, true, false))
}

/// `[[GetOwnProperty]]`
pub fn get_own_property(
    realm: &Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> Option<PropertyDescriptor> {
    ordinary_get_own_property(realm, object, key)
        .or_else(|| string_get_own_property(realm, object, key))
}

/// `[[DefineOwnProperty]]`: in-range indices accept only compatible no-ops
pub fn define_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    if let Some(current) = string_get_own_property(realm, object, key) {
        let extensible = realm.heap().get(object).extensible;
        return Ok(is_compatible_property_descriptor(extensible, desc, Some(&current)));
    }
    ordinary_define_own_property(realm, object, key, desc)
}

/// `[[OwnPropertyKeys]]`: string indices, then the stored keys
pub fn own_property_keys(realm: &Realm, object: ObjectHandle) -> Vec<PropertyKey> {
    let length = wrapped(realm, object).len();
    let mut keys: Vec<PropertyKey> = (0..length as u64).map(PropertyKey::from).collect();
    keys.extend(realm.heap().get(object).properties.keys());
    keys
}
