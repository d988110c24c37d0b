//! `Object` constructor and `Object.prototype` methods

use std::cell::Cell;
use std::rc::Rc;

use core_types::{JsError, JsResult, ObjectHandle, Value};
use object_model::conversions::{
    describe, from_property_descriptor, to_object, to_property_descriptor, to_property_key,
};
use object_model::function::is_callable;
use object_model::operations::{
    create_array_from_list, define_property_or_throw, enumerable_own_properties, get,
    has_own_property, is_array, ordinary_create_from_constructor, set_integrity_level,
    test_integrity_level, EnumerableKind, IntegrityLevel,
};
use object_model::{dispatch, ObjectKind, PropertyDescriptor, PropertyKey, Realm};

use crate::{arg, require_object_coercible};

/// `Object` static methods
pub struct ObjectConstructor;

fn prototype_argument(value: &Value) -> JsResult<Option<ObjectHandle>> {
    match value {
        Value::Object(object) => Ok(Some(*object)),
        Value::Null => Ok(None),
        other => Err(JsError::type_error(format!(
            "Object prototype may only be an Object or null: {}",
            describe(other)
        ))),
    }
}

impl ObjectConstructor {
    /// `Object(value)` / `new Object(value)`; `active` is the `Object`
    /// constructor itself, so subclass construction can be told apart
    pub fn construct(
        realm: &mut Realm,
        value: &Value,
        new_target: Option<ObjectHandle>,
        active: Option<ObjectHandle>,
    ) -> JsResult<Value> {
        if let Some(new_target) = new_target.filter(|t| Some(*t) != active) {
            let fallback = realm.intrinsics().object_prototype;
            let object = ordinary_create_from_constructor(
                realm,
                new_target,
                fallback,
                ObjectKind::Ordinary,
            )?;
            return Ok(Value::Object(object));
        }
        if value.is_nullish() {
            return Ok(Value::Object(realm.create_plain_object()));
        }
        Ok(Value::Object(to_object(realm, value)?))
    }

    /// `Object.defineProperty(O, P, Attributes)`
    pub fn define_property(
        realm: &mut Realm,
        target: &Value,
        key: &Value,
        attributes: &Value,
    ) -> JsResult<Value> {
        let Value::Object(object) = target else {
            return Err(JsError::type_error("Object.defineProperty called on non-object"));
        };
        let key = to_property_key(realm, key)?;
        let desc = to_property_descriptor(realm, attributes)?;
        define_property_or_throw(realm, *object, &key, &desc)?;
        Ok(target.clone())
    }

    /// `Object.defineProperties(O, Properties)`
    pub fn define_properties(
        realm: &mut Realm,
        target: &Value,
        properties: &Value,
    ) -> JsResult<Value> {
        let Value::Object(object) = target else {
            return Err(JsError::type_error("Object.defineProperties called on non-object"));
        };
        Self::apply_properties(realm, *object, properties)?;
        Ok(target.clone())
    }

    /// `ObjectDefineProperties(O, Properties)`: every descriptor is read
    /// before any is applied
    fn apply_properties(
        realm: &mut Realm,
        object: ObjectHandle,
        properties: &Value,
    ) -> JsResult<()> {
        let props = to_object(realm, properties)?;
        let mut descriptors: Vec<(PropertyKey, PropertyDescriptor)> = Vec::new();
        for key in dispatch::own_property_keys(realm, props)? {
            let Some(own) = dispatch::get_own_property(realm, props, &key)? else {
                continue;
            };
            if !own.is_enumerable() {
                continue;
            }
            let desc_object = get(realm, props, &key)?;
            descriptors.push((key, to_property_descriptor(realm, &desc_object)?));
        }
        for (key, desc) in descriptors {
            define_property_or_throw(realm, object, &key, &desc)?;
        }
        Ok(())
    }

    /// `Object.create(O, Properties)`
    pub fn create(realm: &mut Realm, prototype: &Value, properties: &Value) -> JsResult<Value> {
        let prototype = prototype_argument(prototype)?;
        let object = realm.create_object(prototype);
        if !properties.is_undefined() {
            Self::apply_properties(realm, object, properties)?;
        }
        Ok(Value::Object(object))
    }

    /// `Object.getOwnPropertyDescriptor(O, P)`
    pub fn get_own_property_descriptor(
        realm: &mut Realm,
        target: &Value,
        key: &Value,
    ) -> JsResult<Value> {
        let object = to_object(realm, target)?;
        let key = to_property_key(realm, key)?;
        let desc = dispatch::get_own_property(realm, object, &key)?;
        from_property_descriptor(realm, desc.as_ref())
    }

    fn own_keys(realm: &mut Realm, target: &Value, symbols: bool) -> JsResult<Value> {
        let object = to_object(realm, target)?;
        let keys: Vec<Value> = dispatch::own_property_keys(realm, object)?
            .into_iter()
            .filter(|k| k.is_symbol() == symbols)
            .map(|k| k.to_value())
            .collect();
        Ok(Value::Object(create_array_from_list(realm, &keys)?))
    }

    /// `Object.getOwnPropertyNames(O)`
    pub fn get_own_property_names(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::own_keys(realm, target, false)
    }

    /// `Object.getOwnPropertySymbols(O)`
    pub fn get_own_property_symbols(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::own_keys(realm, target, true)
    }

    /// `Object.getPrototypeOf(O)`
    pub fn get_prototype_of(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        let object = to_object(realm, target)?;
        Ok(Value::from(dispatch::get_prototype_of(realm, object)?))
    }

    /// `Object.setPrototypeOf(O, proto)`
    pub fn set_prototype_of(
        realm: &mut Realm,
        target: &Value,
        prototype: &Value,
    ) -> JsResult<Value> {
        require_object_coercible(target, "Object.setPrototypeOf")?;
        let prototype = prototype_argument(prototype)?;
        let Value::Object(object) = target else {
            return Ok(target.clone());
        };
        if !dispatch::set_prototype_of(realm, *object, prototype)? {
            return Err(JsError::type_error("Object.setPrototypeOf: cannot set prototype"));
        }
        Ok(target.clone())
    }

    fn enumerable(realm: &mut Realm, target: &Value, kind: EnumerableKind) -> JsResult<Value> {
        let object = to_object(realm, target)?;
        let list = enumerable_own_properties(realm, object, kind)?;
        Ok(Value::Object(create_array_from_list(realm, &list)?))
    }

    /// `Object.keys(O)`
    pub fn keys(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::enumerable(realm, target, EnumerableKind::Keys)
    }

    /// `Object.values(O)`
    pub fn values(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::enumerable(realm, target, EnumerableKind::Values)
    }

    /// `Object.entries(O)`
    pub fn entries(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::enumerable(realm, target, EnumerableKind::Entries)
    }

    fn restrict(realm: &mut Realm, target: &Value, level: IntegrityLevel) -> JsResult<Value> {
        let Value::Object(object) = target else {
            return Ok(target.clone());
        };
        if !set_integrity_level(realm, *object, level)? {
            let verb = match level {
                IntegrityLevel::Frozen => "freeze",
                IntegrityLevel::Sealed => "seal",
            };
            return Err(JsError::type_error(format!("Cannot {} object", verb)));
        }
        Ok(target.clone())
    }

    /// `Object.freeze(O)`
    pub fn freeze(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::restrict(realm, target, IntegrityLevel::Frozen)
    }

    /// `Object.seal(O)`
    pub fn seal(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::restrict(realm, target, IntegrityLevel::Sealed)
    }

    fn test(realm: &mut Realm, target: &Value, level: IntegrityLevel) -> JsResult<Value> {
        match target {
            Value::Object(object) => {
                Ok(Value::Boolean(test_integrity_level(realm, *object, level)?))
            }
            _ => Ok(Value::Boolean(true)),
        }
    }

    /// `Object.isFrozen(O)`
    pub fn is_frozen(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::test(realm, target, IntegrityLevel::Frozen)
    }

    /// `Object.isSealed(O)`
    pub fn is_sealed(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        Self::test(realm, target, IntegrityLevel::Sealed)
    }

    /// `Object.preventExtensions(O)`
    pub fn prevent_extensions(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        let Value::Object(object) = target else {
            return Ok(target.clone());
        };
        if !dispatch::prevent_extensions(realm, *object)? {
            return Err(JsError::type_error("Cannot prevent extensions"));
        }
        Ok(target.clone())
    }

    /// `Object.isExtensible(O)`
    pub fn is_extensible(realm: &mut Realm, target: &Value) -> JsResult<Value> {
        match target {
            Value::Object(object) => Ok(Value::Boolean(dispatch::is_extensible(realm, *object)?)),
            _ => Ok(Value::Boolean(false)),
        }
    }
}

/// `Object.prototype` methods
pub struct ObjectPrototype;

impl ObjectPrototype {
    /// `Object.prototype.hasOwnProperty(V)`: the key is converted before `this`
    pub fn has_own_property(realm: &mut Realm, this: &Value, key: &Value) -> JsResult<Value> {
        let key = to_property_key(realm, key)?;
        let object = to_object(realm, this)?;
        Ok(Value::Boolean(has_own_property(realm, object, &key)?))
    }

    /// `Object.prototype.propertyIsEnumerable(V)`
    pub fn property_is_enumerable(realm: &mut Realm, this: &Value, key: &Value) -> JsResult<Value> {
        let key = to_property_key(realm, key)?;
        let object = to_object(realm, this)?;
        let desc = dispatch::get_own_property(realm, object, &key)?;
        Ok(Value::Boolean(desc.is_some_and(|d| d.is_enumerable())))
    }

    /// `Object.prototype.isPrototypeOf(V)`
    pub fn is_prototype_of(realm: &mut Realm, this: &Value, value: &Value) -> JsResult<Value> {
        let Value::Object(mut current) = value.clone() else {
            return Ok(Value::Boolean(false));
        };
        let object = to_object(realm, this)?;
        while let Some(prototype) = dispatch::get_prototype_of(realm, current)? {
            if prototype == object {
                return Ok(Value::Boolean(true));
            }
            current = prototype;
        }
        Ok(Value::Boolean(false))
    }

    /// `Object.prototype.toString()`
    pub fn to_string(realm: &mut Realm, this: &Value) -> JsResult<Value> {
        match this {
            Value::Undefined => return Ok(Value::from("[object Undefined]")),
            Value::Null => return Ok(Value::from("[object Null]")),
            _ => {}
        }
        let object = to_object(realm, this)?;
        let builtin_tag = if is_array(realm, &Value::Object(object))? {
            "Array"
        } else {
            match &realm.heap().get(object).kind {
                ObjectKind::Arguments(_) => "Arguments",
                ObjectKind::StringWrapper(_) => "String",
                ObjectKind::PrimitiveWrapper(Value::Boolean(_)) => "Boolean",
                ObjectKind::PrimitiveWrapper(Value::Number(_)) => "Number",
                _ if is_callable(realm, &Value::Object(object)) => "Function",
                _ => "Object",
            }
        };
        let tag_key = PropertyKey::Symbol(realm.symbols().to_string_tag.clone());
        let tag = match get(realm, object, &tag_key)? {
            Value::String(tag) => tag.to_string(),
            _ => builtin_tag.to_string(),
        };
        Ok(Value::from(format!("[object {}]", tag).as_str()))
    }

    /// `Object.prototype.valueOf()`
    pub fn value_of(realm: &mut Realm, this: &Value) -> JsResult<Value> {
        Ok(Value::Object(to_object(realm, this)?))
    }
}

pub(crate) fn install(realm: &mut Realm, global: ObjectHandle) {
    let prototype = realm.intrinsics().object_prototype;
    let active = Rc::new(Cell::new(None));
    let this_function = active.clone();
    let constructor =
        realm.create_constructor("Object", 1, prototype, move |realm, _, args, new_target| {
            ObjectConstructor::construct(realm, &arg(args, 0), new_target, this_function.get())
        });
    active.set(Some(constructor));
    realm.define_builtin_value(global, "Object", Value::Object(constructor));

    realm.define_builtin_function(constructor, "defineProperty", 3, |realm, _, args, _| {
        ObjectConstructor::define_property(realm, &arg(args, 0), &arg(args, 1), &arg(args, 2))
    });
    realm.define_builtin_function(constructor, "defineProperties", 2, |realm, _, args, _| {
        ObjectConstructor::define_properties(realm, &arg(args, 0), &arg(args, 1))
    });
    realm.define_builtin_function(constructor, "create", 2, |realm, _, args, _| {
        ObjectConstructor::create(realm, &arg(args, 0), &arg(args, 1))
    });
    realm.define_builtin_function(constructor, "getOwnPropertyDescriptor", 2, |realm, _, args, _| {
        ObjectConstructor::get_own_property_descriptor(realm, &arg(args, 0), &arg(args, 1))
    });
    realm.define_builtin_function(constructor, "getOwnPropertyNames", 1, |realm, _, args, _| {
        ObjectConstructor::get_own_property_names(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "getOwnPropertySymbols", 1, |realm, _, args, _| {
        ObjectConstructor::get_own_property_symbols(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "getPrototypeOf", 1, |realm, _, args, _| {
        ObjectConstructor::get_prototype_of(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "setPrototypeOf", 2, |realm, _, args, _| {
        ObjectConstructor::set_prototype_of(realm, &arg(args, 0), &arg(args, 1))
    });
    realm.define_builtin_function(constructor, "keys", 1, |realm, _, args, _| {
        ObjectConstructor::keys(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "values", 1, |realm, _, args, _| {
        ObjectConstructor::values(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "entries", 1, |realm, _, args, _| {
        ObjectConstructor::entries(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "freeze", 1, |realm, _, args, _| {
        ObjectConstructor::freeze(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "isFrozen", 1, |realm, _, args, _| {
        ObjectConstructor::is_frozen(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "seal", 1, |realm, _, args, _| {
        ObjectConstructor::seal(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "isSealed", 1, |realm, _, args, _| {
        ObjectConstructor::is_sealed(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "preventExtensions", 1, |realm, _, args, _| {
        ObjectConstructor::prevent_extensions(realm, &arg(args, 0))
    });
    realm.define_builtin_function(constructor, "isExtensible", 1, |realm, _, args, _| {
        ObjectConstructor::is_extensible(realm, &arg(args, 0))
    });

    realm.define_builtin_function(prototype, "hasOwnProperty", 1, |realm, this, args, _| {
        ObjectPrototype::has_own_property(realm, this, &arg(args, 0))
    });
    realm.define_builtin_function(prototype, "propertyIsEnumerable", 1, |realm, this, args, _| {
        ObjectPrototype::property_is_enumerable(realm, this, &arg(args, 0))
    });
    realm.define_builtin_function(prototype, "isPrototypeOf", 1, |realm, this, args, _| {
        ObjectPrototype::is_prototype_of(realm, this, &arg(args, 0))
    });
    realm.define_builtin_function(prototype, "toString", 0, |realm, this, _, _| {
        ObjectPrototype::to_string(realm, this)
    });
    realm.define_builtin_function(prototype, "valueOf", 0, |realm, this, _, _| {
        ObjectPrototype::value_of(realm, this)
    });
}
