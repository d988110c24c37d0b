//! Iterator protocol helpers and `%ArrayIteratorPrototype%.next`.
//!
//! Every read of `next`, `done` and `value` goes through `[[Get]]`, so a
//! proxy or getter observes each step.

use core_types::{JsError, JsResult, ObjectHandle, Value};

use crate::conversions::{describe, to_object};
use crate::dispatch;
use crate::exotic::typed_array::typed_array_length;
use crate::heap::{ArrayIteratorData, ObjectClass, ObjectKind};
use crate::key::PropertyKey;
use crate::operations::{
    call, create_array_from_list, create_data_property_or_throw, get, get_method, get_v,
    length_of_array_like,
};
use crate::realm::Realm;

/// `[[ArrayLikeIterationKind]]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationKind {
    /// Indices
    Keys,
    /// Elements
    Values,
    /// `[index, element]` pairs
    Entries,
}

/// An Iterator Record
#[derive(Debug, Clone)]
pub struct IteratorRecord {
    /// `[[Iterator]]`
    pub iterator: ObjectHandle,
    /// `[[NextMethod]]`, read once when the iterator was obtained
    pub next_method: Value,
    /// `[[Done]]`
    pub done: bool,
}

/// `GetIterator(obj, sync)`
pub fn get_iterator(realm: &mut Realm, value: &Value) -> JsResult<IteratorRecord> {
    let key = PropertyKey::Symbol(realm.symbols().iterator.clone());
    let Some(method) = get_method(realm, value, &key)? else {
        return Err(JsError::type_error(format!("{} is not iterable", describe(value))));
    };
    get_iterator_from_method(realm, value, &method)
}

/// `GetIteratorFromMethod(obj, method)`
pub fn get_iterator_from_method(
    realm: &mut Realm,
    value: &Value,
    method: &Value,
) -> JsResult<IteratorRecord> {
    let Value::Object(iterator) = call(realm, method, value, &[])? else {
        return Err(JsError::type_error("Result of the Symbol.iterator method is not an object"));
    };
    let next_method = get_v(realm, &Value::Object(iterator), &PropertyKey::from("next"))?;
    Ok(IteratorRecord {
        iterator,
        next_method,
        done: false,
    })
}

/// `IteratorNext(iteratorRecord, value)`
pub fn iterator_next(
    realm: &mut Realm,
    record: &IteratorRecord,
    value: Option<Value>,
) -> JsResult<ObjectHandle> {
    let args: Vec<Value> = value.into_iter().collect();
    let result = call(realm, &record.next_method, &Value::Object(record.iterator), &args)?;
    match result {
        Value::Object(object) => Ok(object),
        other => Err(JsError::type_error(format!(
            "Iterator result {} is not an object",
            describe(&other)
        ))),
    }
}

/// `IteratorComplete(iterResult)`
pub fn iterator_complete(realm: &mut Realm, result: ObjectHandle) -> JsResult<bool> {
    Ok(get(realm, result, &PropertyKey::from("done"))?.is_truthy())
}

/// `IteratorValue(iterResult)`
pub fn iterator_value(realm: &mut Realm, result: ObjectHandle) -> JsResult<Value> {
    get(realm, result, &PropertyKey::from("value"))
}

/// `IteratorStep(iteratorRecord)`: the next result object, or `None` once done.
/// Any abrupt completion marks the record done.
pub fn iterator_step(
    realm: &mut Realm,
    record: &mut IteratorRecord,
) -> JsResult<Option<ObjectHandle>> {
    let result = iterator_next(realm, record, None).map_err(|e| {
        record.done = true;
        e
    })?;
    let complete = iterator_complete(realm, result).map_err(|e| {
        record.done = true;
        e
    })?;
    if complete {
        record.done = true;
        return Ok(None);
    }
    Ok(Some(result))
}

/// `IteratorStepValue(iteratorRecord)`
pub fn iterator_step_value(
    realm: &mut Realm,
    record: &mut IteratorRecord,
) -> JsResult<Option<Value>> {
    let Some(result) = iterator_step(realm, record)? else {
        return Ok(None);
    };
    iterator_value(realm, result).map(Some).map_err(|e| {
        record.done = true;
        e
    })
}

/// `IteratorClose(iteratorRecord, completion)`.
///
/// A throw completion wins over anything `return()` does; otherwise an
/// error from `return()`, or a non-object result, replaces the completion.
pub fn iterator_close<T>(
    realm: &mut Realm,
    record: &IteratorRecord,
    completion: JsResult<T>,
) -> JsResult<T> {
    let iterator = Value::Object(record.iterator);
    let inner = match get_method(realm, &iterator, &PropertyKey::from("return")) {
        Ok(None) => return completion,
        Ok(Some(method)) => call(realm, &method, &iterator, &[]),
        Err(e) => Err(e),
    };
    let completion = completion?;
    if !matches!(inner?, Value::Object(_)) {
        return Err(JsError::type_error("iterator.return() did not return an object"));
    }
    Ok(completion)
}

/// `CreateIterResultObject(value, done)`
pub fn create_iter_result_object(
    realm: &mut Realm,
    value: Value,
    done: bool,
) -> JsResult<ObjectHandle> {
    let object = realm.create_plain_object();
    create_data_property_or_throw(realm, object, &PropertyKey::from("value"), value)?;
    create_data_property_or_throw(realm, object, &PropertyKey::from("done"), Value::Boolean(done))?;
    Ok(object)
}

/// `CreateArrayIterator(array, kind)`
pub fn create_array_iterator(
    realm: &mut Realm,
    array: ObjectHandle,
    kind: IterationKind,
) -> ObjectHandle {
    let prototype = realm.intrinsics().array_iterator_prototype;
    realm.allocate(
        Some(prototype),
        ObjectKind::ArrayIterator(ArrayIteratorData {
            iterated: Some(array),
            next_index: 0,
            kind,
        }),
    )
}

/// `Array.prototype.values`, also `Array.prototype[@@iterator]`
pub fn array_prototype_values(
    realm: &mut Realm,
    this: &Value,
    _args: &[Value],
    _new_target: Option<ObjectHandle>,
) -> JsResult<Value> {
    let array = to_object(realm, this)?;
    Ok(Value::Object(create_array_iterator(realm, array, IterationKind::Values)))
}

fn iterator_state(realm: &Realm, this: &Value) -> JsResult<(ObjectHandle, ArrayIteratorData)> {
    if let Value::Object(object) = this {
        if let ObjectKind::ArrayIterator(data) = &realm.heap().get(*object).kind {
            return Ok((*object, *data));
        }
    }
    Err(JsError::type_error(format!(
        "Method Array Iterator.prototype.next called on incompatible receiver {}",
        describe(this)
    )))
}

fn store_iterator_state(realm: &mut Realm, iterator: ObjectHandle, state: ArrayIteratorData) {
    if let ObjectKind::ArrayIterator(data) = &mut realm.heap_mut().get_mut(iterator).kind {
        *data = state;
    }
}

/// `%ArrayIteratorPrototype%.next()`.
///
/// The length is re-read on every step: `length` for ordinary array-likes,
/// the live view length for typed arrays (throwing once the view is out of
/// bounds or detached).
pub fn array_iterator_next(
    realm: &mut Realm,
    this: &Value,
    _args: &[Value],
    _new_target: Option<ObjectHandle>,
) -> JsResult<Value> {
    let (iterator, mut state) = iterator_state(realm, this)?;
    let Some(array) = state.iterated else {
        let result = create_iter_result_object(realm, Value::Undefined, true)?;
        return Ok(Value::Object(result));
    };
    let index = state.next_index;
    let length = if realm.heap().class_of(array) == ObjectClass::TypedArray {
        match typed_array_length(realm, array) {
            Some(length) => length as u64,
            None => {
                return Err(JsError::type_error(
                    "Cannot perform %ArrayIteratorPrototype%.next on a detached or out-of-bounds typed array",
                ))
            }
        }
    } else {
        length_of_array_like(realm, array)?
    };

    if index >= length {
        state.iterated = None;
        store_iterator_state(realm, iterator, state);
        let result = create_iter_result_object(realm, Value::Undefined, true)?;
        return Ok(Value::Object(result));
    }
    state.next_index = index + 1;
    store_iterator_state(realm, iterator, state);

    let key = PropertyKey::from(index);
    let result = match state.kind {
        IterationKind::Keys => Value::Number(index as f64),
        IterationKind::Values => dispatch::get(realm, array, &key, &Value::Object(array))?,
        IterationKind::Entries => {
            let element = dispatch::get(realm, array, &key, &Value::Object(array))?;
            let pair = create_array_from_list(realm, &[Value::Number(index as f64), element])?;
            Value::Object(pair)
        }
    };
    Ok(Value::Object(create_iter_result_object(realm, result, false)?))
}
