//! ECMAScript built-in objects over the object model
//!
//! This crate provides the JS-visible surface of the property access core:
//! - `Object` and `Object.prototype`
//! - `Reflect`
//! - `Proxy` and `Proxy.revocable`
//! - `Array`, `Array.prototype.push/unshift/values/@@iterator`
//! - `String.prototype.split/indexOf/toString/valueOf`
//! - `ArrayBuffer` (fixed-length and resizable) and the typed array constructors
//! - `Symbol` and the well-known symbols
//! - `Function.prototype.call/apply`
//!
//! Every built-in is a thin wrapper: argument coercion happens here, the
//! semantics live in [`object_model`].
//!
//! # Example
//!
//! ```
//! use builtins::{create_realm, ReflectObject};
//! use core_types::Value;
//!
//! let mut realm = create_realm();
//! let object = Value::Object(realm.create_plain_object());
//! let ok = ReflectObject::set(&mut realm, &object, &Value::from("x"), Value::Number(1.0), None)
//!     .unwrap();
//! assert!(ok);
//! assert_eq!(
//!     ReflectObject::get(&mut realm, &object, &Value::from("x"), None).unwrap(),
//!     Value::Number(1.0)
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod array;
pub mod function;
pub mod object;
pub mod proxy;
pub mod reflect;
pub mod string;
pub mod symbol;
pub mod typed_arrays;

use core_types::{JsError, JsResult, ObjectHandle, Value};
use log::debug;
use object_model::conversions::describe;
use object_model::{Realm, RealmConfig};

pub use array::{ArrayConstructor, ArrayPrototype};
pub use function::FunctionPrototype;
pub use object::{ObjectConstructor, ObjectPrototype};
pub use proxy::ProxyConstructor;
pub use reflect::ReflectObject;
pub use string::StringPrototype;
pub use symbol::SymbolConstructor;
pub use typed_arrays::{ArrayBufferConstructor, TypedArrayConstructor};

/// A realm with the default configuration and every built-in installed
pub fn create_realm() -> Realm {
    create_realm_with_config(RealmConfig::default())
}

/// A realm with explicit limits and every built-in installed
pub fn create_realm_with_config(config: RealmConfig) -> Realm {
    let mut realm = Realm::with_config(config);
    install_globals(&mut realm);
    realm
}

/// Install the built-ins as properties of the realm's global object
pub fn install_globals(realm: &mut Realm) {
    let global = realm.intrinsics().global;
    object::install(realm, global);
    function::install(realm);
    array::install(realm, global);
    string::install(realm, global);
    symbol::install(realm, global);
    proxy::install(realm, global);
    reflect::install(realm, global);
    typed_arrays::install(realm, global);
    realm.define_builtin_value(global, "globalThis", Value::Object(global));
    debug!("global object populated ({} heap objects)", realm.heap().len());
}

/// Argument `index`, or `undefined` when absent
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

/// The object behind `value`, or a TypeError naming `method`
pub(crate) fn require_object(value: &Value, method: &str) -> JsResult<ObjectHandle> {
    match value {
        Value::Object(object) => Ok(*object),
        other => Err(JsError::type_error(format!(
            "{} called on non-object {}",
            method,
            describe(other)
        ))),
    }
}

/// `RequireObjectCoercible(value)`
pub(crate) fn require_object_coercible(value: &Value, method: &str) -> JsResult<()> {
    if value.is_nullish() {
        return Err(JsError::type_error(format!(
            "{} called on null or undefined",
            method
        )));
    }
    Ok(())
}
