//! Proxy constructor implementation per ES2024
//!
//! The exotic behavior itself lives in [`object_model::proxy`]; this module
//! only exposes `new Proxy(target, handler)` and `Proxy.revocable`.

use std::cell::Cell;

use core_types::{JsError, JsResult, ObjectHandle, Value};
use object_model::operations::create_data_property_or_throw;
use object_model::{proxy, PropertyKey, Realm};

use crate::arg;

/// `Proxy` constructor
pub struct ProxyConstructor;

impl ProxyConstructor {
    /// `new Proxy(target, handler)`
    pub fn construct(realm: &mut Realm, target: &Value, handler: &Value) -> JsResult<ObjectHandle> {
        proxy::proxy_create(realm, target, handler)
    }

    /// `Proxy.revocable(target, handler)`: `{ proxy, revoke }`.
    ///
    /// The revoke function forgets its proxy after the first call, so later
    /// calls do nothing.
    pub fn revocable(realm: &mut Realm, target: &Value, handler: &Value) -> JsResult<ObjectHandle> {
        let proxy = proxy::proxy_create(realm, target, handler)?;
        let slot = Cell::new(Some(proxy));
        let revoke = realm.create_native_function("", 0, move |realm, _, _, _| {
            if let Some(proxy) = slot.take() {
                proxy::revoke(realm, proxy);
            }
            Ok(Value::Undefined)
        });
        let result = realm.create_plain_object();
        create_data_property_or_throw(
            realm,
            result,
            &PropertyKey::from("proxy"),
            Value::Object(proxy),
        )?;
        create_data_property_or_throw(
            realm,
            result,
            &PropertyKey::from("revoke"),
            Value::Object(revoke),
        )?;
        Ok(result)
    }
}

pub(crate) fn install(realm: &mut Realm, global: ObjectHandle) {
    let constructor = realm.create_native_constructor("Proxy", 2, |realm, _, args, new_target| {
        if new_target.is_none() {
            return Err(JsError::type_error("Constructor Proxy requires 'new'"));
        }
        ProxyConstructor::construct(realm, &arg(args, 0), &arg(args, 1)).map(Value::Object)
    });
    realm.define_builtin_function(constructor, "revocable", 2, |realm, _, args, _| {
        ProxyConstructor::revocable(realm, &arg(args, 0), &arg(args, 1)).map(Value::Object)
    });
    realm.define_builtin_value(global, "Proxy", Value::Object(constructor));
}
