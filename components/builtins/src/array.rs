//! Array constructor and Array.prototype methods
//!
//! Every method is generic: `this` is converted with `ToObject` and accessed
//! only through `[[Get]]`, `[[Set]]`, `[[HasProperty]]` and `[[Delete]]`,
//! so they work on proxies and arbitrary array-likes.

use core_types::{JsError, JsResult, ObjectHandle, Value};
use object_model::conversions::{to_object, to_uint32};
use object_model::exotic::array::array_create;
use object_model::operations::{
    create_data_property_or_throw, delete_property_or_throw, get, get_prototype_from_constructor,
    has_property, is_array, length_of_array_like, set,
};
use object_model::{PropertyKey, Realm};

use crate::arg;

const MAX_SAFE_LENGTH: u64 = (1 << 53) - 1;

/// `Array` constructor
pub struct ArrayConstructor;

impl ArrayConstructor {
    /// `Array(...values)` / `new Array(...values)`
    pub fn construct(
        realm: &mut Realm,
        args: &[Value],
        new_target: Option<ObjectHandle>,
    ) -> JsResult<ObjectHandle> {
        let fallback = realm.intrinsics().array_prototype;
        let prototype = match new_target {
            Some(new_target) => get_prototype_from_constructor(realm, new_target, fallback)?,
            None => fallback,
        };
        match args {
            [] => array_create(realm, 0, Some(prototype)),
            [Value::Number(n)] => {
                let length = to_uint32(realm, &Value::Number(*n))?;
                if f64::from(length) != *n {
                    return Err(JsError::range_error("Invalid array length"));
                }
                array_create(realm, u64::from(length), Some(prototype))
            }
            items => {
                let array = array_create(realm, items.len() as u64, Some(prototype))?;
                for (index, item) in items.iter().enumerate() {
                    create_data_property_or_throw(
                        realm,
                        array,
                        &PropertyKey::from(index as u64),
                        item.clone(),
                    )?;
                }
                Ok(array)
            }
        }
    }

    /// `Array.isArray(arg)`
    pub fn is_array(realm: &Realm, value: &Value) -> JsResult<bool> {
        is_array(realm, value)
    }
}

/// Array.prototype methods
pub struct ArrayPrototype;

impl ArrayPrototype {
    /// `Array.prototype.push(...items)`
    pub fn push(realm: &mut Realm, this: &Value, items: &[Value]) -> JsResult<Value> {
        let object = to_object(realm, this)?;
        let mut length = length_of_array_like(realm, object)?;
        let count = items.len() as u64;
        if length + count > MAX_SAFE_LENGTH {
            return Err(JsError::type_error(format!(
                "Pushing {} elements on an array-like of length {} is disallowed, as the total surpasses 2**53-1",
                count, length
            )));
        }
        for item in items {
            set(realm, object, &PropertyKey::from(length), item.clone(), true)?;
            length += 1;
        }
        let new_length = Value::Number(length as f64);
        set(realm, object, &PropertyKey::from("length"), new_length.clone(), true)?;
        Ok(new_length)
    }

    /// `Array.prototype.unshift(...items)`.
    ///
    /// `length` is written even when no items are given.
    pub fn unshift(realm: &mut Realm, this: &Value, items: &[Value]) -> JsResult<Value> {
        let object = to_object(realm, this)?;
        let length = length_of_array_like(realm, object)?;
        let count = items.len() as u64;
        if count > 0 {
            if length + count > MAX_SAFE_LENGTH {
                return Err(JsError::type_error(format!(
                    "Unshifting {} elements on an array-like of length {} is disallowed, as the total surpasses 2**53-1",
                    count, length
                )));
            }
            let mut k = length;
            while k > 0 {
                let from = PropertyKey::from(k - 1);
                let to = PropertyKey::from(k + count - 1);
                if has_property(realm, object, &from)? {
                    let value = get(realm, object, &from)?;
                    set(realm, object, &to, value, true)?;
                } else {
                    delete_property_or_throw(realm, object, &to)?;
                }
                k -= 1;
            }
            for (index, item) in items.iter().enumerate() {
                set(realm, object, &PropertyKey::from(index as u64), item.clone(), true)?;
            }
        }
        let new_length = Value::Number((length + count) as f64);
        set(realm, object, &PropertyKey::from("length"), new_length.clone(), true)?;
        Ok(new_length)
    }
}

pub(crate) fn install(realm: &mut Realm, global: ObjectHandle) {
    let prototype = realm.intrinsics().array_prototype;
    let constructor = realm.create_constructor("Array", 1, prototype, |realm, _, args, new_target| {
        ArrayConstructor::construct(realm, args, new_target).map(Value::Object)
    });
    realm.define_builtin_function(constructor, "isArray", 1, |realm, _, args, _| {
        ArrayConstructor::is_array(realm, &arg(args, 0)).map(Value::Boolean)
    });
    realm.define_builtin_value(global, "Array", Value::Object(constructor));

    realm.define_builtin_function(prototype, "push", 1, |realm, this, args, _| {
        ArrayPrototype::push(realm, this, args)
    });
    realm.define_builtin_function(prototype, "unshift", 1, |realm, this, args, _| {
        ArrayPrototype::unshift(realm, this, args)
    });
    let values = Value::Object(realm.intrinsics().array_prototype_values);
    realm.define_builtin_value(prototype, "values", values.clone());
    let iterator = PropertyKey::Symbol(realm.symbols().iterator.clone());
    realm.define_builtin_value(prototype, iterator, values);
}
