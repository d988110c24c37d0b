//! Reference Records: the result of evaluating an identifier or a member
//! expression before it is read, written or deleted.
//!
//! A property reference keeps its name as the raw value the key expression
//! produced. `ToPropertyKey` runs only when the reference is consumed, so
//! in `o[k] = v()` the key's `toString` is observed after `v()` runs.

use core_types::{JsError, JsResult, JsString, ObjectHandle, Symbol, Value};
use object_model::conversions::{describe, to_object, to_property_key};
use object_model::operations::{has_property, set};
use object_model::private::{private_get, private_set};
use object_model::{dispatch, Binding, DeclarativeEnvironment, PropertyKey, Realm};

/// The name half of a property reference
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceName {
    /// A key expression result not yet passed through `ToPropertyKey`
    Value(Value),
    /// An already-normalized key (identifiers, dotted member access)
    Key(PropertyKey),
}

impl ReferenceName {
    fn resolve(&self, realm: &mut Realm) -> JsResult<PropertyKey> {
        match self {
            ReferenceName::Value(value) => to_property_key(realm, value),
            ReferenceName::Key(key) => Ok(key.clone()),
        }
    }
}

/// A Reference Record
#[derive(Debug, Clone)]
pub enum Reference {
    /// `base.name` / `base[name]`, optionally with a `super` receiver
    Property {
        /// The value left of the dot; primitives are boxed only for lookup
        base: Value,
        /// Referenced name
        name: ReferenceName,
        /// Whether the reference was produced by strict mode code
        strict: bool,
        /// `[[ThisValue]]` of a super reference
        this_value: Option<Value>,
    },
    /// `base.#name`; always strict
    Private {
        /// The value left of the dot
        base: Value,
        /// The private name
        name: Symbol,
    },
    /// An identifier bound in a declarative environment
    Binding {
        /// Identifier
        name: JsString,
        /// The binding cell
        binding: Binding,
        /// Whether the reference was produced by strict mode code
        strict: bool,
    },
    /// An identifier that resolved nowhere
    Unresolvable {
        /// Identifier
        name: JsString,
        /// Whether the reference was produced by strict mode code
        strict: bool,
    },
}

impl Reference {
    /// A property reference whose key is converted lazily
    pub fn property(base: Value, name: Value, strict: bool) -> Self {
        Reference::Property {
            base,
            name: ReferenceName::Value(name),
            strict,
            this_value: None,
        }
    }

    /// A property reference with a known key
    pub fn named(base: Value, key: impl Into<PropertyKey>, strict: bool) -> Self {
        Reference::Property {
            base,
            name: ReferenceName::Key(key.into()),
            strict,
            this_value: None,
        }
    }

    /// `super[name]` evaluated against `home` with receiver `this_value`
    pub fn super_property(home: Value, name: Value, this_value: Value, strict: bool) -> Self {
        Reference::Property {
            base: home,
            name: ReferenceName::Value(name),
            strict,
            this_value: Some(this_value),
        }
    }

    /// `IsStrictReference(V)`
    pub fn is_strict(&self) -> bool {
        match self {
            Reference::Property { strict, .. }
            | Reference::Binding { strict, .. }
            | Reference::Unresolvable { strict, .. } => *strict,
            Reference::Private { .. } => true,
        }
    }

    /// `IsPropertyReference(V)`
    pub fn is_property_reference(&self) -> bool {
        matches!(self, Reference::Property { .. } | Reference::Private { .. })
    }

    /// `IsSuperReference(V)`
    pub fn is_super_reference(&self) -> bool {
        matches!(self, Reference::Property { this_value: Some(_), .. })
    }

    /// `GetThisValue(V)`
    pub fn this_value(&self) -> Option<&Value> {
        match self {
            Reference::Property {
                this_value: Some(this), ..
            } => Some(this),
            Reference::Property { base, .. } | Reference::Private { base, .. } => Some(base),
            _ => None,
        }
    }
}

/// `ResolveBinding(name, env)`: the innermost environment first, then the
/// global object, else an unresolvable reference.
pub fn resolve_binding(
    realm: &mut Realm,
    environment: Option<&DeclarativeEnvironment>,
    name: &JsString,
    strict: bool,
) -> JsResult<Reference> {
    if let Some(binding) = environment.and_then(|env| env.binding(name)) {
        return Ok(Reference::Binding {
            name: name.clone(),
            binding,
            strict,
        });
    }
    let global = realm.intrinsics().global;
    let key = PropertyKey::from(name.clone());
    if has_property(realm, global, &key)? {
        return Ok(Reference::Property {
            base: Value::Object(global),
            name: ReferenceName::Key(key),
            strict,
            this_value: None,
        });
    }
    Ok(Reference::Unresolvable {
        name: name.clone(),
        strict,
    })
}

fn not_defined(name: &JsString) -> JsError {
    JsError::reference_error(format!("{} is not defined", name))
}

fn before_initialization(name: &JsString) -> JsError {
    JsError::reference_error(format!("Cannot access '{}' before initialization", name))
}

/// `GetValue(V)`
pub fn get_value(realm: &mut Realm, reference: &Reference) -> JsResult<Value> {
    match reference {
        Reference::Property {
            base, name, this_value, ..
        } => {
            let object = to_object(realm, base)?;
            let key = name.resolve(realm)?;
            let receiver = this_value.as_ref().unwrap_or(base);
            dispatch::get(realm, object, &key, receiver)
        }
        Reference::Private { base, name } => {
            let object = to_object(realm, base)?;
            private_get(realm, object, name)
        }
        Reference::Binding { name, binding, .. } => {
            binding.get().ok_or_else(|| before_initialization(name))
        }
        Reference::Unresolvable { name, .. } => Err(not_defined(name)),
    }
}

/// `PutValue(V, W)`.
///
/// A refused `[[Set]]` throws in strict code and is silently dropped
/// otherwise. Sloppy assignment to an unresolvable name creates a property
/// on the global object.
pub fn put_value(realm: &mut Realm, reference: &Reference, value: Value) -> JsResult<()> {
    match reference {
        Reference::Property {
            base,
            name,
            strict,
            this_value,
        } => {
            let object = to_object(realm, base)?;
            let key = name.resolve(realm)?;
            let receiver = this_value.as_ref().unwrap_or(base);
            let succeeded = dispatch::set(realm, object, &key, value, receiver)?;
            if !succeeded && *strict {
                return Err(put_failure_error(realm, base, object, &key));
            }
            Ok(())
        }
        Reference::Private { base, name } => {
            let object = to_object(realm, base)?;
            private_set(realm, object, name, value)
        }
        Reference::Binding { name, binding, .. } => {
            if !binding.is_initialized() {
                return Err(before_initialization(name));
            }
            binding.set(value);
            Ok(())
        }
        Reference::Unresolvable { name, strict } => {
            if *strict {
                return Err(not_defined(name));
            }
            let global = realm.intrinsics().global;
            set(realm, global, &PropertyKey::from(name.clone()), value, false)?;
            Ok(())
        }
    }
}

fn put_failure_error(
    realm: &Realm,
    base: &Value,
    object: ObjectHandle,
    key: &PropertyKey,
) -> JsError {
    match base {
        Value::Object(_) => object_model::operations::set_failure_error(realm, object, key),
        primitive => JsError::type_error(format!(
            "Cannot create property '{}' on {} '{}'",
            key,
            type_name(primitive),
            describe(primitive)
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Undefined => "undefined",
        Value::Null => "null",
        Value::Boolean(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Symbol(_) => "symbol",
        Value::Object(_) => "object",
    }
}

/// The `delete` operator applied to a reference.
///
/// Identifiers are never deletable; an unresolvable name reports `true`.
pub fn delete_reference(realm: &mut Realm, reference: &Reference) -> JsResult<bool> {
    match reference {
        Reference::Unresolvable { .. } => Ok(true),
        Reference::Binding { .. } => Ok(false),
        Reference::Private { .. } => Err(JsError::type_error("Private fields can not be deleted")),
        Reference::Property {
            this_value: Some(_), ..
        } => Err(JsError::reference_error("Unsupported reference to 'super'")),
        Reference::Property { base, name, strict, .. } => {
            let object = to_object(realm, base)?;
            let key = name.resolve(realm)?;
            let deleted = dispatch::delete(realm, object, &key)?;
            if !deleted && *strict {
                return Err(JsError::type_error(format!(
                    "Cannot delete property '{}' of {}",
                    key,
                    describe(base)
                )));
            }
            Ok(deleted)
        }
    }
}

/// `key in object`
pub fn has_property_operator(realm: &mut Realm, key: &Value, object: &Value) -> JsResult<bool> {
    let Value::Object(target) = object else {
        return Err(JsError::type_error(format!(
            "Cannot use 'in' operator to search for '{}' in {}",
            describe(key),
            describe(object)
        )));
    };
    let key = to_property_key(realm, key)?;
    has_property(realm, *target, &key)
}

/// `#name in object`
pub fn private_in_operator(realm: &Realm, name: &Symbol, object: &Value) -> JsResult<bool> {
    let Value::Object(target) = object else {
        return Err(JsError::type_error(format!(
            "Cannot use 'in' operator to search for '{}' in {}",
            name.descriptive_string(),
            describe(object)
        )));
    };
    Ok(object_model::private::private_element_find(realm, *target, name).is_some())
}
