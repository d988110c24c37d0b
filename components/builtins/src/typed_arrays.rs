//! ArrayBuffer and TypedArray constructors per ES2024
//!
//! This module provides the `ArrayBuffer` constructor (fixed-length and
//! resizable), its prototype, the nine numeric typed array constructors and
//! `%TypedArray.prototype%`. Element storage and bounds checking live in
//! [`object_model::exotic::typed_array`]; nothing here caches a length.

use core_types::{JsError, JsResult, ObjectHandle, Value};
use object_model::conversions::{describe, to_index, to_integer_or_infinity};
use object_model::exotic::typed_array::{
    allocate_array_buffer, is_detached_buffer, resize_array_buffer, transfer_array_buffer,
    typed_array_create, typed_array_create_with_length, typed_array_get_element, typed_array_length,
    typed_array_set_element,
};
use object_model::iteration::{
    create_array_iterator, get_iterator_from_method, iterator_step_value, IterationKind,
};
use object_model::operations::{
    get, get_method, get_prototype_from_constructor, length_of_array_like, set,
};
use object_model::{ElementType, ObjectClass, ObjectKind, PropertyKey, Realm, TypedArrayData};

use crate::arg;

fn relative_index(relative: f64, length: usize) -> usize {
    let length = length as f64;
    let index = if relative < 0.0 {
        (length + relative).max(0.0)
    } else {
        relative.min(length)
    };
    index as usize
}

/// `ArrayBuffer` constructor and prototype methods
pub struct ArrayBufferConstructor;

impl ArrayBufferConstructor {
    /// `new ArrayBuffer(length, options)`
    pub fn construct(
        realm: &mut Realm,
        length: &Value,
        options: &Value,
        new_target: ObjectHandle,
    ) -> JsResult<ObjectHandle> {
        let byte_length = to_index(realm, length)?;
        let max_byte_length = match options {
            Value::Object(options) => {
                let max = get(realm, *options, &PropertyKey::from("maxByteLength"))?;
                if max.is_undefined() {
                    None
                } else {
                    Some(to_index(realm, &max)?)
                }
            }
            _ => None,
        };
        let fallback = realm.intrinsics().array_buffer_prototype;
        let prototype = get_prototype_from_constructor(realm, new_target, fallback)?;
        allocate_array_buffer(realm, byte_length, max_byte_length, Some(prototype))
    }

    fn this_buffer(realm: &Realm, this: &Value, method: &str) -> JsResult<ObjectHandle> {
        if let Value::Object(object) = this {
            if let ObjectKind::ArrayBuffer(_) = realm.heap().get(*object).kind {
                return Ok(*object);
            }
        }
        Err(JsError::type_error(format!(
            "Method ArrayBuffer.prototype.{} called on incompatible receiver {}",
            method,
            describe(this)
        )))
    }

    /// Byte length and `[[ArrayBufferMaxByteLength]]` of a buffer
    fn lengths(realm: &Realm, buffer: ObjectHandle) -> (usize, Option<usize>) {
        match &realm.heap().get(buffer).kind {
            ObjectKind::ArrayBuffer(data) => (data.byte_length(), data.max_byte_length),
            _ => (0, None),
        }
    }

    /// `get ArrayBuffer.prototype.byteLength`; 0 once detached
    pub fn byte_length(realm: &Realm, this: &Value) -> JsResult<Value> {
        let buffer = Self::this_buffer(realm, this, "byteLength")?;
        Ok(Value::Number(Self::lengths(realm, buffer).0 as f64))
    }

    /// `get ArrayBuffer.prototype.maxByteLength`
    pub fn max_byte_length(realm: &Realm, this: &Value) -> JsResult<Value> {
        let buffer = Self::this_buffer(realm, this, "maxByteLength")?;
        let (length, max) = Self::lengths(realm, buffer);
        Ok(Value::Number(max.unwrap_or(length) as f64))
    }

    /// `get ArrayBuffer.prototype.resizable`
    pub fn resizable(realm: &Realm, this: &Value) -> JsResult<Value> {
        let buffer = Self::this_buffer(realm, this, "resizable")?;
        Ok(Value::Boolean(Self::lengths(realm, buffer).1.is_some()))
    }

    /// `get ArrayBuffer.prototype.detached`
    pub fn detached(realm: &Realm, this: &Value) -> JsResult<Value> {
        let buffer = Self::this_buffer(realm, this, "detached")?;
        Ok(Value::Boolean(is_detached_buffer(realm, buffer)))
    }

    /// `ArrayBuffer.prototype.resize(newLength)`
    pub fn resize(realm: &mut Realm, this: &Value, new_length: &Value) -> JsResult<Value> {
        let buffer = Self::this_buffer(realm, this, "resize")?;
        let new_length = to_index(realm, new_length)?;
        resize_array_buffer(realm, buffer, new_length)?;
        Ok(Value::Undefined)
    }

    /// `ArrayBuffer.prototype.transfer(newLength)` and `transferToFixedLength`
    pub fn transfer(
        realm: &mut Realm,
        this: &Value,
        new_length: &Value,
        preserve_resizability: bool,
    ) -> JsResult<Value> {
        let method = if preserve_resizability { "transfer" } else { "transferToFixedLength" };
        let buffer = Self::this_buffer(realm, this, method)?;
        let new_length = if new_length.is_undefined() {
            None
        } else {
            Some(to_index(realm, new_length)?)
        };
        transfer_array_buffer(realm, buffer, new_length, preserve_resizability).map(Value::Object)
    }

    /// `ArrayBuffer.prototype.slice(start, end)`
    pub fn slice(realm: &mut Realm, this: &Value, start: &Value, end: &Value) -> JsResult<Value> {
        let buffer = Self::this_buffer(realm, this, "slice")?;
        if is_detached_buffer(realm, buffer) {
            return Err(JsError::type_error(
                "Cannot perform ArrayBuffer.prototype.slice on a detached ArrayBuffer",
            ));
        }
        let length = Self::lengths(realm, buffer).0;
        let first = relative_index(to_integer_or_infinity(realm, start)?, length);
        let last = if end.is_undefined() {
            length
        } else {
            relative_index(to_integer_or_infinity(realm, end)?, length)
        };
        let new_length = last.saturating_sub(first);
        let target = allocate_array_buffer(realm, new_length, None, None)?;
        let source = match &realm.heap().get(buffer).kind {
            ObjectKind::ArrayBuffer(data) => data.bytes.clone(),
            _ => None,
        };
        // Coercing start or end may have detached or shrunk the source.
        let Some(source) = source else {
            return Err(JsError::type_error(
                "Cannot perform ArrayBuffer.prototype.slice on a detached ArrayBuffer",
            ));
        };
        let available = source.get(first..).unwrap_or(&[]);
        let count = new_length.min(available.len());
        if let ObjectKind::ArrayBuffer(data) = &mut realm.heap_mut().get_mut(target).kind {
            if let Some(bytes) = data.bytes.as_mut() {
                bytes[..count].copy_from_slice(&available[..count]);
            }
        }
        Ok(Value::Object(target))
    }
}

/// Typed array constructors and `%TypedArray.prototype%` accessors
pub struct TypedArrayConstructor;

impl TypedArrayConstructor {
    /// `new Int8Array(...)` .. `new Float64Array(...)`.
    ///
    /// Accepts a length, a buffer with optional offset and length, another
    /// typed array, an iterable, or an array-like.
    pub fn construct(
        realm: &mut Realm,
        element: ElementType,
        args: &[Value],
        new_target: ObjectHandle,
    ) -> JsResult<ObjectHandle> {
        let fallback = realm.intrinsics().typed_array_prototype_for(element);
        let first = arg(args, 0);
        let Value::Object(source) = first else {
            let length = to_index(realm, &first)?;
            let prototype = get_prototype_from_constructor(realm, new_target, fallback)?;
            return typed_array_create_with_length(realm, element, length, Some(prototype));
        };
        let prototype = get_prototype_from_constructor(realm, new_target, fallback)?;
        match realm.heap().class_of(source) {
            ObjectClass::ArrayBuffer => {
                let offset = to_index(realm, &arg(args, 1))?;
                if offset % element.size() != 0 {
                    return Err(JsError::range_error(format!(
                        "start offset of {} should be a multiple of {}",
                        element.name(),
                        element.size()
                    )));
                }
                let length = match arg(args, 2) {
                    Value::Undefined => None,
                    length => Some(to_index(realm, &length)?),
                };
                typed_array_create(realm, element, source, offset, length, Some(prototype))
            }
            ObjectClass::TypedArray => {
                let Some(length) = typed_array_length(realm, source) else {
                    return Err(JsError::type_error(
                        "Cannot construct a typed array from a detached or out-of-bounds typed array",
                    ));
                };
                let target = typed_array_create_with_length(
                    realm,
                    element,
                    length,
                    Some(prototype),
                )?;
                for index in 0..length {
                    let value = typed_array_get_element(realm, source, index as f64);
                    typed_array_set_element(realm, target, index as f64, &value)?;
                }
                Ok(target)
            }
            _ => Self::from_object(realm, element, source, prototype),
        }
    }

    /// `InitializeTypedArrayFromList` / `InitializeTypedArrayFromArrayLike`
    fn from_object(
        realm: &mut Realm,
        element: ElementType,
        source: ObjectHandle,
        prototype: ObjectHandle,
    ) -> JsResult<ObjectHandle> {
        let iterator_key = PropertyKey::Symbol(realm.symbols().iterator.clone());
        let source_value = Value::Object(source);
        if let Some(method) = get_method(realm, &source_value, &iterator_key)? {
            let mut record = get_iterator_from_method(realm, &source_value, &method)?;
            let mut values = Vec::new();
            while let Some(value) = iterator_step_value(realm, &mut record)? {
                values.push(value);
            }
            let target = typed_array_create_with_length(
                realm,
                element,
                values.len(),
                Some(prototype),
            )?;
            for (index, value) in values.into_iter().enumerate() {
                set(realm, target, &PropertyKey::from(index as u64), value, true)?;
            }
            return Ok(target);
        }
        let length = length_of_array_like(realm, source)?;
        let length = usize::try_from(length)
            .map_err(|_| JsError::range_error(format!("Invalid typed array length: {}", length)))?;
        let target = typed_array_create_with_length(realm, element, length, Some(prototype))?;
        for index in 0..length {
            let key = PropertyKey::from(index as u64);
            let value = get(realm, source, &key)?;
            set(realm, target, &key, value, true)?;
        }
        Ok(target)
    }

    fn this_view(
        realm: &Realm,
        this: &Value,
        method: &str,
    ) -> JsResult<(ObjectHandle, TypedArrayData)> {
        if let Value::Object(object) = this {
            if let ObjectKind::TypedArray(data) = realm.heap().get(*object).kind {
                return Ok((*object, data));
            }
        }
        Err(JsError::type_error(format!(
            "Method %TypedArray%.prototype.{} called on incompatible receiver {}",
            method,
            describe(this)
        )))
    }

    /// `get %TypedArray%.prototype.length`; 0 when out of bounds
    pub fn length(realm: &Realm, this: &Value) -> JsResult<Value> {
        let (view, _) = Self::this_view(realm, this, "length")?;
        Ok(Value::Number(typed_array_length(realm, view).unwrap_or(0) as f64))
    }

    /// `get %TypedArray%.prototype.byteLength`
    pub fn byte_length(realm: &Realm, this: &Value) -> JsResult<Value> {
        let (view, data) = Self::this_view(realm, this, "byteLength")?;
        let length = typed_array_length(realm, view).unwrap_or(0);
        Ok(Value::Number((length * data.element.size()) as f64))
    }

    /// `get %TypedArray%.prototype.byteOffset`
    pub fn byte_offset(realm: &Realm, this: &Value) -> JsResult<Value> {
        let (view, data) = Self::this_view(realm, this, "byteOffset")?;
        let offset = typed_array_length(realm, view).map_or(0, |_| data.byte_offset);
        Ok(Value::Number(offset as f64))
    }

    /// `get %TypedArray%.prototype.buffer`
    pub fn buffer(realm: &Realm, this: &Value) -> JsResult<Value> {
        let (_, data) = Self::this_view(realm, this, "buffer")?;
        Ok(Value::Object(data.buffer))
    }

    /// `%TypedArray%.prototype.values()`, also `[@@iterator]`
    pub fn values(realm: &mut Realm, this: &Value) -> JsResult<Value> {
        let (view, _) = Self::this_view(realm, this, "values")?;
        if typed_array_length(realm, view).is_none() {
            return Err(JsError::type_error(
                "Cannot perform %TypedArray%.prototype.values on a detached or out-of-bounds typed array",
            ));
        }
        Ok(Value::Object(create_array_iterator(realm, view, IterationKind::Values)))
    }
}

fn install_array_buffer(realm: &mut Realm, global: ObjectHandle) {
    let prototype = realm.intrinsics().array_buffer_prototype;
    let constructor =
        realm.create_constructor("ArrayBuffer", 1, prototype, |realm, _, args, new_target| {
            let Some(new_target) = new_target else {
                return Err(JsError::type_error("Constructor ArrayBuffer requires 'new'"));
            };
            ArrayBufferConstructor::construct(realm, &arg(args, 0), &arg(args, 1), new_target)
                .map(Value::Object)
        });
    realm.define_builtin_value(global, "ArrayBuffer", Value::Object(constructor));

    realm.define_builtin_getter(prototype, "byteLength", |realm, this, _, _| {
        ArrayBufferConstructor::byte_length(realm, this)
    });
    realm.define_builtin_getter(prototype, "maxByteLength", |realm, this, _, _| {
        ArrayBufferConstructor::max_byte_length(realm, this)
    });
    realm.define_builtin_getter(prototype, "resizable", |realm, this, _, _| {
        ArrayBufferConstructor::resizable(realm, this)
    });
    realm.define_builtin_getter(prototype, "detached", |realm, this, _, _| {
        ArrayBufferConstructor::detached(realm, this)
    });
    realm.define_builtin_function(prototype, "resize", 1, |realm, this, args, _| {
        ArrayBufferConstructor::resize(realm, this, &arg(args, 0))
    });
    realm.define_builtin_function(prototype, "slice", 2, |realm, this, args, _| {
        ArrayBufferConstructor::slice(realm, this, &arg(args, 0), &arg(args, 1))
    });
    realm.define_builtin_function(prototype, "transfer", 0, |realm, this, args, _| {
        ArrayBufferConstructor::transfer(realm, this, &arg(args, 0), true)
    });
    realm.define_builtin_function(prototype, "transferToFixedLength", 0, |realm, this, args, _| {
        ArrayBufferConstructor::transfer(realm, this, &arg(args, 0), false)
    });
    let tag = PropertyKey::Symbol(realm.symbols().to_string_tag.clone());
    realm.define_builtin_getter(prototype, tag, |_, _, _, _| Ok(Value::from("ArrayBuffer")));
}

fn install_typed_array_prototype(realm: &mut Realm) {
    let prototype = realm.intrinsics().typed_array_prototype;
    realm.define_builtin_getter(prototype, "length", |realm, this, _, _| {
        TypedArrayConstructor::length(realm, this)
    });
    realm.define_builtin_getter(prototype, "byteLength", |realm, this, _, _| {
        TypedArrayConstructor::byte_length(realm, this)
    });
    realm.define_builtin_getter(prototype, "byteOffset", |realm, this, _, _| {
        TypedArrayConstructor::byte_offset(realm, this)
    });
    realm.define_builtin_getter(prototype, "buffer", |realm, this, _, _| {
        TypedArrayConstructor::buffer(realm, this)
    });
    let values = realm.define_builtin_function(prototype, "values", 0, |realm, this, _, _| {
        TypedArrayConstructor::values(realm, this)
    });
    let iterator = PropertyKey::Symbol(realm.symbols().iterator.clone());
    realm.define_builtin_value(prototype, iterator, Value::Object(values));
    let tag = PropertyKey::Symbol(realm.symbols().to_string_tag.clone());
    realm.define_builtin_getter(prototype, tag, |realm, this, _, _| {
        Ok(match this {
            Value::Object(object) => match realm.heap().get(*object).kind {
                ObjectKind::TypedArray(data) => Value::from(data.element.name()),
                _ => Value::Undefined,
            },
            _ => Value::Undefined,
        })
    });
}

pub(crate) fn install(realm: &mut Realm, global: ObjectHandle) {
    install_array_buffer(realm, global);
    install_typed_array_prototype(realm);

    for element in ElementType::ALL {
        let prototype = realm.intrinsics().typed_array_prototype_for(element);
        let constructor = realm.create_constructor(
            element.name(),
            3,
            prototype,
            move |realm, _, args, new_target| {
                let Some(new_target) = new_target else {
                    return Err(JsError::type_error(format!(
                        "Constructor {} requires 'new'",
                        element.name()
                    )));
                };
                TypedArrayConstructor::construct(realm, element, args, new_target)
                    .map(Value::Object)
            },
        );
        let bytes = Value::Number(element.size() as f64);
        realm.define_builtin_constant(constructor, "BYTES_PER_ELEMENT", bytes.clone());
        realm.define_builtin_constant(prototype, "BYTES_PER_ELEMENT", bytes);
        realm.define_builtin_value(global, element.name(), Value::Object(constructor));
    }
}
