//! String constructor and String.prototype methods

use core_types::{JsError, JsResult, JsString, ObjectHandle, Value};
use object_model::conversions::{describe, to_integer_or_infinity, to_string, to_uint32};
use object_model::exotic::string::string_create;
use object_model::operations::{
    call, create_array_from_list, get_method, get_prototype_from_constructor,
};
use object_model::{ObjectKind, PropertyKey, Realm};

use crate::{arg, require_object_coercible};

/// String.prototype methods
pub struct StringPrototype;

impl StringPrototype {
    /// `thisStringValue(value)`
    fn this_string_value(realm: &Realm, this: &Value, method: &str) -> JsResult<JsString> {
        match this {
            Value::String(s) => Ok(s.clone()),
            Value::Object(object) => match &realm.heap().get(*object).kind {
                ObjectKind::StringWrapper(s) => Ok(s.clone()),
                _ => Err(Self::incompatible(this, method)),
            },
            _ => Err(Self::incompatible(this, method)),
        }
    }

    fn incompatible(this: &Value, method: &str) -> JsError {
        JsError::type_error(format!(
            "String.prototype.{} requires that 'this' be a String, not {}",
            method,
            describe(this)
        ))
    }

    /// `String.prototype.toString()`
    pub fn to_string(realm: &Realm, this: &Value) -> JsResult<Value> {
        Self::this_string_value(realm, this, "toString").map(Value::String)
    }

    /// `String.prototype.valueOf()`
    pub fn value_of(realm: &Realm, this: &Value) -> JsResult<Value> {
        Self::this_string_value(realm, this, "valueOf").map(Value::String)
    }

    /// `String.prototype.indexOf(searchString, position)`
    pub fn index_of(
        realm: &mut Realm,
        this: &Value,
        search: &Value,
        position: &Value,
    ) -> JsResult<Value> {
        require_object_coercible(this, "String.prototype.indexOf")?;
        let s = to_string(realm, this)?;
        let search = to_string(realm, search)?;
        let position = to_integer_or_infinity(realm, position)?;
        let start = position.clamp(0.0, s.len() as f64) as usize;
        Ok(Value::Number(s.index_of(&search, start).map_or(-1.0, |i| i as f64)))
    }

    /// `String.prototype.split(separator, limit)`.
    ///
    /// A non-nullish separator's `@@split` is looked up before `this` is
    /// converted; when present it takes over entirely.
    pub fn split(
        realm: &mut Realm,
        this: &Value,
        separator: &Value,
        limit: &Value,
    ) -> JsResult<Value> {
        require_object_coercible(this, "String.prototype.split")?;
        if !separator.is_nullish() {
            let key = PropertyKey::Symbol(realm.symbols().split.clone());
            if let Some(splitter) = get_method(realm, separator, &key)? {
                return call(realm, &splitter, separator, &[this.clone(), limit.clone()]);
            }
        }
        let s = to_string(realm, this)?;
        let limit = if limit.is_undefined() {
            u32::MAX
        } else {
            to_uint32(realm, limit)?
        };
        let r = to_string(realm, separator)?;
        let separator = if separator.is_undefined() { None } else { Some(&r) };
        let parts: Vec<Value> = split_match(&s, separator, limit).into_iter().map(Value::String)
            .collect();
        Ok(Value::Object(create_array_from_list(realm, &parts)?))
    }
}

/// The string-separator half of `String.prototype.split`; `None` is an
/// absent separator.
fn split_match(s: &JsString, separator: Option<&JsString>, limit: u32) -> Vec<JsString> {
    let limit = limit as usize;
    if limit == 0 {
        return Vec::new();
    }
    let Some(separator) = separator else {
        return vec![s.clone()];
    };
    if separator.is_empty() {
        return (0..s.len().min(limit)).filter_map(|i| s.char_at(i)).collect();
    }
    if s.is_empty() {
        return vec![s.clone()];
    }
    let mut parts = Vec::new();
    let mut start = 0;
    while let Some(found) = s.index_of(separator, start) {
        parts.push(s.substring(start, found));
        if parts.len() == limit {
            return parts;
        }
        start = found + separator.len();
    }
    parts.push(s.substring(start, s.len()));
    parts
}

/// `String(value)` / `new String(value)`
fn string_constructor(
    realm: &mut Realm,
    args: &[Value],
    new_target: Option<ObjectHandle>,
) -> JsResult<Value> {
    let s = match args.first() {
        None => JsString::empty(),
        Some(Value::Symbol(symbol)) if new_target.is_none() => {
            JsString::from(symbol.descriptive_string())
        }
        Some(value) => to_string(realm, value)?,
    };
    let Some(new_target) = new_target else {
        return Ok(Value::String(s));
    };
    let fallback = realm.intrinsics().string_prototype;
    let prototype = get_prototype_from_constructor(realm, new_target, fallback)?;
    Ok(Value::Object(string_create(realm, s, Some(prototype))))
}

pub(crate) fn install(realm: &mut Realm, global: ObjectHandle) {
    let prototype = realm.intrinsics().string_prototype;
    let constructor =
        realm.create_constructor("String", 1, prototype, |realm, _, args, new_target| {
            string_constructor(realm, args, new_target)
        });
    realm.define_builtin_value(global, "String", Value::Object(constructor));

    realm.define_builtin_function(prototype, "toString", 0, |realm, this, _, _| {
        StringPrototype::to_string(realm, this)
    });
    realm.define_builtin_function(prototype, "valueOf", 0, |realm, this, _, _| {
        StringPrototype::value_of(realm, this)
    });
    realm.define_builtin_function(prototype, "indexOf", 1, |realm, this, args, _| {
        StringPrototype::index_of(realm, this, &arg(args, 0), &arg(args, 1))
    });
    realm.define_builtin_function(prototype, "split", 2, |realm, this, args, _| {
        StringPrototype::split(realm, this, &arg(args, 0), &arg(args, 1))
    });
}
