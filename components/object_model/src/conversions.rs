//! Realm-aware type conversions.
//!
//! These may run user code (`@@toPrimitive`, `valueOf`, `toString`,
//! getters on a descriptor object), so each one takes the realm and makes
//! every observable call exactly once, left to right.

use core_types::number::{self, number_to_js_string, string_to_number};
use core_types::{JsError, JsResult, JsString, ObjectHandle, Value};

use crate::descriptor::PropertyDescriptor;
use crate::dispatch;
use crate::exotic::string::string_create;
use crate::function::is_callable;
use crate::heap::ObjectKind;
use crate::key::PropertyKey;
use crate::operations::{call, create_data_property_or_throw, get, get_method};
use crate::realm::Realm;

/// Hint passed to `ToPrimitive`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    /// No preference (`"default"`)
    Default,
    /// `"number"`
    Number,
    /// `"string"`
    String,
}

impl PreferredType {
    fn as_str(self) -> &'static str {
        match self {
            PreferredType::Default => "default",
            PreferredType::Number => "number",
            PreferredType::String => "string",
        }
    }
}

/// `ToPrimitive(input, preferredType)`
pub fn to_primitive(realm: &mut Realm, input: &Value, hint: PreferredType) -> JsResult<Value> {
    let Value::Object(object) = input else {
        return Ok(input.clone());
    };
    let key = PropertyKey::Symbol(realm.symbols().to_primitive.clone());
    if let Some(exotic) = get_method(realm, input, &key)? {
        let result = call(realm, &exotic, input, &[Value::from(hint.as_str())])?;
        if matches!(result, Value::Object(_)) {
            return Err(JsError::type_error("Cannot convert object to primitive value"));
        }
        return Ok(result);
    }
    let hint = if hint == PreferredType::Default {
        PreferredType::Number
    } else {
        hint
    };
    ordinary_to_primitive(realm, *object, hint)
}

/// `OrdinaryToPrimitive(O, hint)`
pub fn ordinary_to_primitive(
    realm: &mut Realm,
    object: ObjectHandle,
    hint: PreferredType,
) -> JsResult<Value> {
    let order = if hint == PreferredType::String {
        ["toString", "valueOf"]
    } else {
        ["valueOf", "toString"]
    };
    for name in order {
        let method = get(realm, object, &PropertyKey::from(name))?;
        if is_callable(realm, &method) {
            let result = call(realm, &method, &Value::Object(object), &[])?;
            if !matches!(result, Value::Object(_)) {
                return Ok(result);
            }
        }
    }
    Err(JsError::type_error("Cannot convert object to primitive value"))
}

/// `ToNumber(argument)`
pub fn to_number(realm: &mut Realm, value: &Value) -> JsResult<f64> {
    match value {
        Value::Undefined => Ok(f64::NAN),
        Value::Null => Ok(0.0),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(*n),
        Value::String(s) => Ok(string_to_number(s)),
        Value::Symbol(_) => Err(JsError::type_error("Cannot convert a Symbol value to a number")),
        Value::Object(_) => {
            let primitive = to_primitive(realm, value, PreferredType::Number)?;
            to_number(realm, &primitive)
        }
    }
}

/// `ToString(argument)`. Symbols never convert implicitly.
pub fn to_string(realm: &mut Realm, value: &Value) -> JsResult<JsString> {
    match value {
        Value::Undefined => Ok(JsString::from("undefined")),
        Value::Null => Ok(JsString::from("null")),
        Value::Boolean(b) => Ok(JsString::from(if *b { "true" } else { "false" })),
        Value::Number(n) => Ok(number_to_js_string(*n)),
        Value::String(s) => Ok(s.clone()),
        Value::Symbol(_) => Err(JsError::type_error("Cannot convert a Symbol value to a string")),
        Value::Object(_) => {
            let primitive = to_primitive(realm, value, PreferredType::String)?;
            to_string(realm, &primitive)
        }
    }
}

/// `ToPropertyKey(argument)`
pub fn to_property_key(realm: &mut Realm, value: &Value) -> JsResult<PropertyKey> {
    let key = to_primitive(realm, value, PreferredType::String)?;
    match key {
        Value::Symbol(symbol) => Ok(PropertyKey::Symbol(symbol)),
        Value::Number(n) => Ok(match number::number_to_integer_index(n) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::from_string(number_to_js_string(n)),
        }),
        other => Ok(PropertyKey::from_string(to_string(realm, &other)?)),
    }
}

/// `ToObject(argument)`: wraps primitives, rejects `undefined` and `null`
pub fn to_object(realm: &mut Realm, value: &Value) -> JsResult<ObjectHandle> {
    let intrinsics = *realm.intrinsics();
    match value {
        Value::Undefined | Value::Null => Err(JsError::type_error(format!(
            "Cannot convert {} to object",
            if value.is_undefined() { "undefined" } else { "null" }
        ))),
        Value::Object(object) => Ok(*object),
        Value::String(s) => Ok(string_create(realm, s.clone(), None)),
        Value::Number(_) => Ok(realm.allocate(
            Some(intrinsics.number_prototype),
            ObjectKind::PrimitiveWrapper(value.clone()),
        )),
        Value::Boolean(_) => Ok(realm.allocate(
            Some(intrinsics.boolean_prototype),
            ObjectKind::PrimitiveWrapper(value.clone()),
        )),
        Value::Symbol(_) => Ok(realm.allocate(
            Some(intrinsics.symbol_prototype),
            ObjectKind::PrimitiveWrapper(value.clone()),
        )),
    }
}

/// `ToIntegerOrInfinity(argument)`
pub fn to_integer_or_infinity(realm: &mut Realm, value: &Value) -> JsResult<f64> {
    Ok(number::to_integer_or_infinity(to_number(realm, value)?))
}

/// `ToLength(argument)`
pub fn to_length(realm: &mut Realm, value: &Value) -> JsResult<u64> {
    Ok(number::to_length(to_number(realm, value)?))
}

/// `ToUint32(argument)`
pub fn to_uint32(realm: &mut Realm, value: &Value) -> JsResult<u32> {
    Ok(number::to_uint32(to_number(realm, value)?))
}

/// `ToIndex(value)`: a non-negative integer no larger than 2^53-1
pub fn to_index(realm: &mut Realm, value: &Value) -> JsResult<usize> {
    let integer = to_integer_or_infinity(realm, value)?;
    if !(0.0..=number::MAX_SAFE_INTEGER as f64).contains(&integer) {
        return Err(JsError::range_error("Invalid index"));
    }
    Ok(integer as usize)
}

/// `ToPropertyDescriptor(Obj)`.
///
/// Fields are read in the order enumerable, configurable, value, writable,
/// get, set; each read is a `[[HasProperty]]` followed by a `[[Get]]`.
pub fn to_property_descriptor(realm: &mut Realm, value: &Value) -> JsResult<PropertyDescriptor> {
    let Value::Object(object) = value else {
        return Err(JsError::type_error("Property description must be an object"));
    };
    let object = *object;
    let field = |realm: &mut Realm, name: &str| -> JsResult<Option<Value>> {
        let key = PropertyKey::from(name);
        if dispatch::has_property(realm, object, &key)? {
            Ok(Some(get(realm, object, &key)?))
        } else {
            Ok(None)
        }
    };
    let mut desc = PropertyDescriptor {
        enumerable: field(realm, "enumerable")?.map(|v| v.is_truthy()),
        configurable: field(realm, "configurable")?.map(|v| v.is_truthy()),
        value: field(realm, "value")?,
        writable: field(realm, "writable")?.map(|v| v.is_truthy()),
        ..Default::default()
    };
    if let Some(getter) = field(realm, "get")? {
        if !getter.is_undefined() && !is_callable(realm, &getter) {
            return Err(JsError::type_error(format!(
                "Getter must be a function: {}",
                describe(&getter)
            )));
        }
        desc.get = Some(getter);
    }
    if let Some(setter) = field(realm, "set")? {
        if !setter.is_undefined() && !is_callable(realm, &setter) {
            return Err(JsError::type_error(format!(
                "Setter must be a function: {}",
                describe(&setter)
            )));
        }
        desc.set = Some(setter);
    }
    if desc.is_accessor_descriptor() && desc.is_data_descriptor() {
        return Err(JsError::type_error(
            "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
        ));
    }
    Ok(desc)
}

/// `FromPropertyDescriptor(Desc)`
pub fn from_property_descriptor(
    realm: &mut Realm,
    desc: Option<&PropertyDescriptor>,
) -> JsResult<Value> {
    let Some(desc) = desc else {
        return Ok(Value::Undefined);
    };
    let object = realm.create_plain_object();
    let fields = [
        ("value", desc.value.clone()),
        ("writable", desc.writable.map(Value::Boolean)),
        ("get", desc.get.clone()),
        ("set", desc.set.clone()),
        ("enumerable", desc.enumerable.map(Value::Boolean)),
        ("configurable", desc.configurable.map(Value::Boolean)),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            create_data_property_or_throw(realm, object, &PropertyKey::from(name), value)?;
        }
    }
    Ok(Value::Object(object))
}

/// Short rendering of a value for error messages; never runs user code
pub fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        Value::Number(n) => number::number_to_string(*n),
        Value::Boolean(b) => b.to_string(),
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Symbol(s) => s.descriptive_string(),
        Value::Object(_) => "#<Object>".to_string(),
    }
}
