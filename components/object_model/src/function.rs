//! Callability predicates.

use core_types::Value;

use crate::heap::ObjectKind;
use crate::realm::Realm;

/// `IsCallable(argument)`
pub fn is_callable(realm: &Realm, value: &Value) -> bool {
    let Value::Object(object) = value else {
        return false;
    };
    match &realm.heap().get(*object).kind {
        ObjectKind::Function(_) => true,
        ObjectKind::Proxy(data) => data.callable,
        _ => false,
    }
}

/// `IsConstructor(argument)`
pub fn is_constructor(realm: &Realm, value: &Value) -> bool {
    let Value::Object(object) = value else {
        return false;
    };
    match &realm.heap().get(*object).kind {
        ObjectKind::Function(data) => data.constructor,
        ObjectKind::Proxy(data) => data.constructor,
        _ => false,
    }
}

/// `typeof` with callable objects reported as `"function"`
pub fn type_of(realm: &Realm, value: &Value) -> &'static str {
    if is_callable(realm, value) {
        "function"
    } else {
        value.type_of()
    }
}
