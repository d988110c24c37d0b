//! Contract tests for interpreter API
//!
//! These tests drive references, the dispatcher and destructuring with
//! native functions that record every observable step.

use std::cell::RefCell;
use std::rc::Rc;

use builtins::create_realm;
use core_types::{JsResult, ObjectHandle, Value};
use object_model::operations::{create_data_property_or_throw, define_property_or_throw};
use object_model::{PropertyDescriptor, PropertyKey, Realm};


/// Shared call log
pub type Log = Rc<RefCell<Vec<String>>>;

/// A fresh, empty log
pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Snapshot of the log
pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// A realm with every built-in installed
pub fn realm() -> Realm {
    create_realm()
}

/// A native function that records `entry` and then runs `behavior`
pub fn logging_function<F>(realm: &mut Realm, log: &Log, entry: &str, behavior: F) -> ObjectHandle
where
    F: Fn(&mut Realm) -> JsResult<Value> + 'static,
{
    let log = Rc::clone(log);
    let entry = entry.to_string();
    realm.create_native_function("", 0, move |realm, _, _, _| {
        log.borrow_mut().push(entry.clone());
        behavior(realm)
    })
}

/// Define `object[key]` as a getter that records `entry` and returns `value`
pub fn logging_getter(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &str,
    log: &Log,
    entry: &str,
    value: Value,
) {
    let getter = logging_function(realm, log, entry, move |_| Ok(value.clone()));
    let desc = PropertyDescriptor::accessor(Some(getter), None, true, true);
    define_property_or_throw(realm, object, &PropertyKey::from(key), &desc).unwrap();
}

/// `object[key] = value` as a fresh data property
pub fn data(realm: &mut Realm, object: ObjectHandle, key: impl Into<PropertyKey>, value: Value) {
    create_data_property_or_throw(realm, object, &key.into(), value).unwrap();
}
