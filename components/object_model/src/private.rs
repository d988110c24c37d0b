//! Private elements (`#x` fields, methods and accessors).
//!
//! Private elements live beside the property storage and are keyed by
//! private symbols. They never go through an internal method, so proxies
//! cannot observe or intercept them, and they never show up in
//! `[[OwnPropertyKeys]]`.

use core_types::{JsError, JsResult, ObjectHandle, Symbol, Value};

use crate::dispatch;
use crate::realm::Realm;

/// One entry of `[[PrivateElements]]`
#[derive(Debug, Clone)]
pub enum PrivateElement {
    /// `#x = value`
    Field {
        /// Private name
        key: Symbol,
        /// Current value
        value: Value,
    },
    /// `#m() {}`
    Method {
        /// Private name
        key: Symbol,
        /// The method function
        function: ObjectHandle,
    },
    /// `get #a() {}` / `set #a(v) {}`
    Accessor {
        /// Private name
        key: Symbol,
        /// Getter function
        get: Option<ObjectHandle>,
        /// Setter function
        set: Option<ObjectHandle>,
    },
}

impl PrivateElement {
    /// The private name of this element
    pub fn key(&self) -> &Symbol {
        match self {
            PrivateElement::Field { key, .. }
            | PrivateElement::Method { key, .. }
            | PrivateElement::Accessor { key, .. } => key,
        }
    }
}

fn name_of(key: &Symbol) -> String {
    key.description()
        .map(|d| d.to_string())
        .unwrap_or_default()
}

/// `PrivateElementFind(O, P)`
pub fn private_element_find(
    realm: &Realm,
    object: ObjectHandle,
    key: &Symbol,
) -> Option<PrivateElement> {
    realm
        .heap()
        .get(object)
        .private_elements
        .iter()
        .find(|e| e.key() == key)
        .cloned()
}

/// `PrivateFieldAdd(O, P, value)`
pub fn private_field_add(
    realm: &mut Realm,
    object: ObjectHandle,
    key: Symbol,
    value: Value,
) -> JsResult<()> {
    if private_element_find(realm, object, &key).is_some() {
        return Err(JsError::type_error(format!(
            "Cannot initialize {} twice on the same object",
            name_of(&key)
        )));
    }
    realm
        .heap_mut()
        .get_mut(object)
        .private_elements
        .push(PrivateElement::Field { key, value });
    Ok(())
}

/// `PrivateMethodOrAccessorAdd(O, method)`
pub fn private_method_or_accessor_add(
    realm: &mut Realm,
    object: ObjectHandle,
    element: PrivateElement,
) -> JsResult<()> {
    if private_element_find(realm, object, element.key()).is_some() {
        return Err(JsError::type_error(format!(
            "Cannot initialize private methods of class {} twice on the same object",
            name_of(element.key())
        )));
    }
    realm.heap_mut().get_mut(object).private_elements.push(element);
    Ok(())
}

/// `PrivateGet(O, P)`
pub fn private_get(realm: &mut Realm, object: ObjectHandle, key: &Symbol) -> JsResult<Value> {
    match private_element_find(realm, object, key) {
        None => Err(JsError::type_error(format!(
            "Cannot read private member {} from an object whose class did not declare it",
            name_of(key)
        ))),
        Some(PrivateElement::Field { value, .. }) => Ok(value),
        Some(PrivateElement::Method { function, .. }) => Ok(Value::Object(function)),
        Some(PrivateElement::Accessor { get: None, .. }) => Err(JsError::type_error(format!(
            "'{}' was defined without a getter",
            name_of(key)
        ))),
        Some(PrivateElement::Accessor { get: Some(getter), .. }) => {
            dispatch::call(realm, getter, &Value::Object(object), &[])
        }
    }
}

/// `PrivateSet(O, P, value)`
pub fn private_set(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &Symbol,
    value: Value,
) -> JsResult<()> {
    match private_element_find(realm, object, key) {
        None => Err(JsError::type_error(format!(
            "Cannot write private member {} to an object whose class did not declare it",
            name_of(key)
        ))),
        Some(PrivateElement::Field { .. }) => {
            let elements = &mut realm.heap_mut().get_mut(object).private_elements;
            if let Some(PrivateElement::Field { value: slot, .. }) =
                elements.iter_mut().find(|e| e.key() == key)
            {
                *slot = value;
            }
            Ok(())
        }
        Some(PrivateElement::Method { .. }) => Err(JsError::type_error(format!(
            "Private method '{}' is not writable",
            name_of(key)
        ))),
        Some(PrivateElement::Accessor { set: None, .. }) => Err(JsError::type_error(format!(
            "'{}' was defined without a setter",
            name_of(key)
        ))),
        Some(PrivateElement::Accessor { set: Some(setter), .. }) => {
            dispatch::call(realm, setter, &Value::Object(object), &[value])?;
            Ok(())
        }
    }
}
