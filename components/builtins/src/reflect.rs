//! Reflect object implementation per ES2024
//!
//! Each method is a direct call of the matching internal method. Unlike the
//! `Object` equivalents, failure is reported as `false` rather than thrown.

use core_types::{JsError, JsResult, ObjectHandle, Value};
use object_model::conversions::{
    describe, from_property_descriptor, to_property_descriptor, to_property_key,
};
use object_model::function::{is_callable, is_constructor};
use object_model::operations::{
    call, construct, create_array_from_list, create_list_from_array_like, ListElementTypes,
};
use object_model::{dispatch, PropertyDescriptor, PropertyKey, Realm};

use crate::{arg, require_object};

/// Reflect object - provides static methods for object operations
pub struct ReflectObject;

impl ReflectObject {
    /// `Reflect.apply(target, thisArgument, argumentsList)`
    pub fn apply(
        realm: &mut Realm,
        target: &Value,
        this: &Value,
        arguments_list: &Value,
    ) -> JsResult<Value> {
        if !is_callable(realm, target) {
            return Err(JsError::type_error(format!(
                "Reflect.apply target {} is not a function",
                describe(target)
            )));
        }
        let args = create_list_from_array_like(realm, arguments_list, ListElementTypes::Any)?;
        call(realm, target, this, &args)
    }

    /// `Reflect.construct(target, argumentsList [, newTarget])`
    pub fn construct(
        realm: &mut Realm,
        target: &Value,
        arguments_list: &Value,
        new_target: Option<&Value>,
    ) -> JsResult<Value> {
        let new_target = new_target.unwrap_or(target);
        for value in [target, new_target] {
            if !is_constructor(realm, value) {
                return Err(JsError::type_error(format!(
                    "{} is not a constructor",
                    describe(value)
                )));
            }
        }
        let (Value::Object(target), Value::Object(new_target)) = (target, new_target) else {
            return Err(JsError::type_error("Reflect.construct target is not a constructor"));
        };
        let args = create_list_from_array_like(realm, arguments_list, ListElementTypes::Any)?;
        Ok(Value::Object(construct(realm, *target, &args, Some(*new_target))?))
    }

    /// `Reflect.defineProperty(target, propertyKey, attributes)`
    pub fn define_property(
        realm: &mut Realm,
        target: &Value,
        key: &Value,
        attributes: &Value,
    ) -> JsResult<bool> {
        let object = require_object(target, "Reflect.defineProperty")?;
        let key = to_property_key(realm, key)?;
        let desc = to_property_descriptor(realm, attributes)?;
        dispatch::define_own_property(realm, object, &key, &desc)
    }

    /// `Reflect.deleteProperty(target, propertyKey)`
    pub fn delete_property(realm: &mut Realm, target: &Value, key: &Value) -> JsResult<bool> {
        let object = require_object(target, "Reflect.deleteProperty")?;
        let key = to_property_key(realm, key)?;
        dispatch::delete(realm, object, &key)
    }

    /// `Reflect.get(target, propertyKey [, receiver])`
    pub fn get(
        realm: &mut Realm,
        target: &Value,
        key: &Value,
        receiver: Option<&Value>,
    ) -> JsResult<Value> {
        let object = require_object(target, "Reflect.get")?;
        let key = to_property_key(realm, key)?;
        let receiver = receiver.unwrap_or(target).clone();
        dispatch::get(realm, object, &key, &receiver)
    }

    /// `Reflect.getOwnPropertyDescriptor(target, propertyKey)`
    pub fn get_own_property_descriptor(
        realm: &mut Realm,
        target: &Value,
        key: &Value,
    ) -> JsResult<Value> {
        let object = require_object(target, "Reflect.getOwnPropertyDescriptor")?;
        let key = to_property_key(realm, key)?;
        let desc = dispatch::get_own_property(realm, object, &key)?;
        from_property_descriptor(realm, desc.as_ref())
    }

    /// `Reflect.getPrototypeOf(target)`
    pub fn get_prototype_of(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        let object = require_object(target, "Reflect.getPrototypeOf")?;
        Ok(Value::from(dispatch::get_prototype_of(realm, object)?))
    }

    /// `Reflect.has(target, propertyKey)`
    pub fn has(realm: &mut Realm, target: &Value, key: &Value) -> JsResult<bool> {
        let object = require_object(target, "Reflect.has")?;
        let key = to_property_key(realm, key)?;
        dispatch::has_property(realm, object, &key)
    }

    /// `Reflect.isExtensible(target)`
    pub fn is_extensible(realm: &mut Realm, target: &Value) -> JsResult<bool> {
        let object = require_object(target, "Reflect.isExtensible")?;
        dispatch::is_extensible(realm, object)
    }

    /// `Reflect.ownKeys(target)`
    pub fn own_keys(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        let object = require_object(target, "Reflect.ownKeys")?;
        let keys: Vec<Value> = dispatch::own_property_keys(realm, object)?
            .iter()
            .map(PropertyKey::to_value)
            .collect();
        Ok(Value::Object(create_array_from_list(realm, &keys)?))
    }

    /// `Reflect.preventExtensions(target)`
    pub fn prevent_extensions(realm: &mut Realm, target: &Value) -> JsResult<bool> {
        let object = require_object(target, "Reflect.preventExtensions")?;
        dispatch::prevent_extensions(realm, object)
    }

    /// `Reflect.set(target, propertyKey, V [, receiver])`
    pub fn set(
        realm: &mut Realm,
        target: &Value,
        key: &Value,
        value: Value,
        receiver: Option<&Value>,
    ) -> JsResult<bool> {
        let object = require_object(target, "Reflect.set")?;
        let key = to_property_key(realm, key)?;
        let receiver = receiver.unwrap_or(target).clone();
        dispatch::set(realm, object, &key, value, &receiver)
    }

    /// `Reflect.setPrototypeOf(target, proto)`
    pub fn set_prototype_of(
        realm: &mut Realm,
        target: &Value,
        prototype: &Value,
    ) -> JsResult<bool> {
        let object = require_object(target, "Reflect.setPrototypeOf")?;
        let prototype = match prototype {
            Value::Object(p) => Some(*p),
            Value::Null => None,
            other => {
                return Err(JsError::type_error(format!(
                    "Object prototype may only be an Object or null: {}",
                    describe(other)
                )))
            }
        };
        dispatch::set_prototype_of(realm, object, prototype)
    }
}

fn optional(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index)
}

pub(crate) fn install(realm: &mut Realm, global: ObjectHandle) {
    let reflect = realm.create_plain_object();
    realm.define_builtin_value(global, "Reflect", Value::Object(reflect));
    let tag = PropertyKey::Symbol(realm.symbols().to_string_tag.clone());
    let tag_desc = PropertyDescriptor::data(Value::from("Reflect"), false, false, true);
    // Fresh ordinary object, so the definition cannot fail.
    let _ = dispatch::define_own_property(realm, reflect, &tag, &tag_desc);

    realm.define_builtin_function(reflect, "apply", 3, |realm, _, args, _| {
        ReflectObject::apply(realm, &arg(args, 0), &arg(args, 1), &arg(args, 2))
    });
    realm.define_builtin_function(reflect, "construct", 2, |realm, _, args, _| {
        ReflectObject::construct(realm, &arg(args, 0), &arg(args, 1), optional(args, 2))
    });
    realm.define_builtin_function(reflect, "defineProperty", 3, |realm, _, args, _| {
        ReflectObject::define_property(realm, &arg(args, 0), &arg(args, 1), &arg(args, 2))
            .map(Value::Boolean)
    });
    realm.define_builtin_function(reflect, "deleteProperty", 2, |realm, _, args, _| {
        ReflectObject::delete_property(realm, &arg(args, 0), &arg(args, 1)).map(Value::Boolean)
    });
    realm.define_builtin_function(reflect, "get", 2, |realm, _, args, _| {
        ReflectObject::get(realm, &arg(args, 0), &arg(args, 1), optional(args, 2))
    });
    realm.define_builtin_function(reflect, "getOwnPropertyDescriptor", 2, |realm, _, args, _| {
        ReflectObject::get_own_property_descriptor(realm, &arg(args, 0), &arg(args, 1))
    });
    realm.define_builtin_function(reflect, "getPrototypeOf", 1, |realm, _, args, _| {
        ReflectObject::get_prototype_of(realm, &arg(args, 0))
    });
    realm.define_builtin_function(reflect, "has", 2, |realm, _, args, _| {
        ReflectObject::has(realm, &arg(args, 0), &arg(args, 1)).map(Value::Boolean)
    });
    realm.define_builtin_function(reflect, "isExtensible", 1, |realm, _, args, _| {
        ReflectObject::is_extensible(realm, &arg(args, 0)).map(Value::Boolean)
    });
    realm.define_builtin_function(reflect, "ownKeys", 1, |realm, _, args, _| {
        ReflectObject::own_keys(realm, &arg(args, 0))
    });
    realm.define_builtin_function(reflect, "preventExtensions", 1, |realm, _, args, _| {
        ReflectObject::prevent_extensions(realm, &arg(args, 0)).map(Value::Boolean)
    });
    realm.define_builtin_function(reflect, "set", 3, |realm, _, args, _| {
        ReflectObject::set(realm, &arg(args, 0), &arg(args, 1), arg(args, 2), optional(args, 3))
            .map(Value::Boolean)
    });
    realm.define_builtin_function(reflect, "setPrototypeOf", 2, |realm, _, args, _| {
        ReflectObject::set_prototype_of(realm, &arg(args, 0), &arg(args, 1)).map(Value::Boolean)
    });
}
