//! Symbol constructor, well-known symbols and Symbol.prototype

use core_types::{JsError, JsResult, ObjectHandle, Symbol, Value};
use object_model::conversions::{describe, to_string};
use object_model::{dispatch, ObjectKind, PropertyDescriptor, PropertyKey, Realm};

use crate::arg;

/// `Symbol` constructor
pub struct SymbolConstructor;

impl SymbolConstructor {
    /// `Symbol(description)`: a fresh symbol
    pub fn call(realm: &mut Realm, description: &Value) -> JsResult<Value> {
        let description = match description {
            Value::Undefined => None,
            other => Some(to_string(realm, other)?),
        };
        Ok(Value::Symbol(Symbol::new(description)))
    }

    /// `thisSymbolValue(value)`
    fn this_symbol_value(realm: &Realm, this: &Value, method: &str) -> JsResult<Symbol> {
        match this {
            Value::Symbol(symbol) => return Ok(symbol.clone()),
            Value::Object(object) => {
                if let ObjectKind::PrimitiveWrapper(Value::Symbol(symbol)) =
                    &realm.heap().get(*object).kind
                {
                    return Ok(symbol.clone());
                }
            }
            _ => {}
        }
        Err(JsError::type_error(format!(
            "Symbol.prototype.{} requires that 'this' be a Symbol, not {}",
            method,
            describe(this)
        )))
    }

    /// `Symbol.prototype.toString()`
    pub fn to_string(realm: &Realm, this: &Value) -> JsResult<Value> {
        let symbol = Self::this_symbol_value(realm, this, "toString")?;
        Ok(Value::from(symbol.descriptive_string().as_str()))
    }

    /// `get Symbol.prototype.description`
    pub fn description(realm: &Realm, this: &Value) -> JsResult<Value> {
        let symbol = Self::this_symbol_value(realm, this, "description")?;
        Ok(symbol.description().cloned().map_or(Value::Undefined, Value::String))
    }
}

pub(crate) fn install(realm: &mut Realm, global: ObjectHandle) {
    let prototype = realm.intrinsics().symbol_prototype;
    let constructor =
        realm.create_constructor("Symbol", 0, prototype, |realm, _, args, new_target| {
            if new_target.is_some() {
                return Err(JsError::type_error("Symbol is not a constructor"));
            }
            SymbolConstructor::call(realm, &arg(args, 0))
        });
    realm.define_builtin_value(global, "Symbol", Value::Object(constructor));

    let symbols = realm.symbols().clone();
    for (name, symbol) in [
        ("iterator", &symbols.iterator),
        ("split", &symbols.split),
        ("toPrimitive", &symbols.to_primitive),
        ("toStringTag", &symbols.to_string_tag),
    ] {
        realm.define_builtin_constant(constructor, name, Value::Symbol(symbol.clone()));
    }

    realm.define_builtin_function(prototype, "toString", 0, |realm, this, _, _| {
        SymbolConstructor::to_string(realm, this)
    });
    realm.define_builtin_function(prototype, "valueOf", 0, |realm, this, _, _| {
        SymbolConstructor::this_symbol_value(realm, this, "valueOf").map(Value::Symbol)
    });
    realm.define_builtin_getter(prototype, "description", |realm, this, _, _| {
        SymbolConstructor::description(realm, this)
    });
    let tag = PropertyKey::Symbol(symbols.to_string_tag.clone());
    let tag_desc = PropertyDescriptor::data(Value::from("Symbol"), false, false, true);
    let _ = dispatch::define_own_property(realm, prototype, &tag, &tag_desc);
}
