//! ArrayBuffers and integer-indexed (typed array) exotic objects.
//!
//! A typed array never caches its bounds. Every element access re-reads the
//! viewed buffer's current byte length and detached state, so a buffer
//! resized or detached by a callback is observed on the very next access.
//! Out-of-range reads give `undefined`; out-of-range writes are silent no-ops.

use core_types::number::{is_integral, to_int32, to_uint32};
use core_types::{JsError, JsResult, ObjectHandle, Value};
use log::debug;

use crate::conversions::to_number;
use crate::descriptor::PropertyDescriptor;
use crate::heap::{ArrayBufferData, ObjectKind, TypedArrayData};
use crate::key::PropertyKey;
use crate::ordinary::{
    ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
    ordinary_has_property, ordinary_prevent_extensions, ordinary_set,
};
use crate::realm::Realm;

/// Element type of a typed array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `Int8Array`
    Int8,
    /// `Uint8Array`
    Uint8,
    /// `Uint8ClampedArray`
    Uint8Clamped,
    /// `Int16Array`
    Int16,
    /// `Uint16Array`
    Uint16,
    /// `Int32Array`
    Int32,
    /// `Uint32Array`
    Uint32,
    /// `Float32Array`
    Float32,
    /// `Float64Array`
    Float64,
}

impl ElementType {
    /// Number of element types
    pub const COUNT: usize = 9;

    /// Every element type, in constructor declaration order
    pub const ALL: [ElementType; ElementType::COUNT] = [
        ElementType::Int8,
        ElementType::Uint8,
        ElementType::Uint8Clamped,
        ElementType::Int16,
        ElementType::Uint16,
        ElementType::Int32,
        ElementType::Uint32,
        ElementType::Float32,
        ElementType::Float64,
    ];

    /// Position in [`ElementType::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Constructor name
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Int8 => "Int8Array",
            ElementType::Uint8 => "Uint8Array",
            ElementType::Uint8Clamped => "Uint8ClampedArray",
            ElementType::Int16 => "Int16Array",
            ElementType::Uint16 => "Uint16Array",
            ElementType::Int32 => "Int32Array",
            ElementType::Uint32 => "Uint32Array",
            ElementType::Float32 => "Float32Array",
            ElementType::Float64 => "Float64Array",
        }
    }

    /// Bytes per element
    pub fn size(self) -> usize {
        match self {
            ElementType::Int8 | ElementType::Uint8 | ElementType::Uint8Clamped => 1,
            ElementType::Int16 | ElementType::Uint16 => 2,
            ElementType::Int32 | ElementType::Uint32 | ElementType::Float32 => 4,
            ElementType::Float64 => 8,
        }
    }

    /// `NumericToRawBytes`, little-endian
    pub fn encode(self, n: f64) -> Vec<u8> {
        match self {
            ElementType::Int8 => (to_uint32(n) as u8 as i8).to_le_bytes().to_vec(),
            ElementType::Uint8 => vec![to_uint32(n) as u8],
            ElementType::Uint8Clamped => vec![to_uint8_clamp(n)],
            ElementType::Int16 => (to_uint32(n) as u16 as i16).to_le_bytes().to_vec(),
            ElementType::Uint16 => (to_uint32(n) as u16).to_le_bytes().to_vec(),
            ElementType::Int32 => to_int32(n).to_le_bytes().to_vec(),
            ElementType::Uint32 => to_uint32(n).to_le_bytes().to_vec(),
            ElementType::Float32 => (n as f32).to_le_bytes().to_vec(),
            ElementType::Float64 => n.to_le_bytes().to_vec(),
        }
    }

    /// `RawBytesToNumeric`, little-endian. `bytes` must hold [`ElementType::size`] bytes.
    pub fn decode(self, bytes: &[u8]) -> f64 {
        let mut raw = [0u8; 8];
        for (dst, src) in raw.iter_mut().zip(bytes) {
            *dst = *src;
        }
        match self {
            ElementType::Int8 => f64::from(raw[0] as i8),
            ElementType::Uint8 | ElementType::Uint8Clamped => f64::from(raw[0]),
            ElementType::Int16 => f64::from(i16::from_le_bytes([raw[0], raw[1]])),
            ElementType::Uint16 => f64::from(u16::from_le_bytes([raw[0], raw[1]])),
            ElementType::Int32 => f64::from(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            ElementType::Uint32 => f64::from(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            ElementType::Float32 => f64::from(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            ElementType::Float64 => f64::from_le_bytes(raw),
        }
    }
}

/// `ToUint8Clamp`: round half to even inside `0..=255`
fn to_uint8_clamp(n: f64) -> u8 {
    if n.is_nan() || n <= 0.0 {
        return 0;
    }
    if n >= 255.0 {
        return 255;
    }
    let floor = n.floor();
    let rounded = if floor + 0.5 < n {
        floor + 1.0
    } else if n < floor + 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    rounded as u8
}

// ---------------------------------------------------------------------------
// ArrayBuffer
// ---------------------------------------------------------------------------

fn buffer_data(realm: &Realm, buffer: ObjectHandle) -> Option<&ArrayBufferData> {
    match &realm.heap().get(buffer).kind {
        ObjectKind::ArrayBuffer(data) => Some(data),
        _ => None,
    }
}

fn buffer_data_mut(realm: &mut Realm, buffer: ObjectHandle) -> Option<&mut ArrayBufferData> {
    match &mut realm.heap_mut().get_mut(buffer).kind {
        ObjectKind::ArrayBuffer(data) => Some(data),
        _ => None,
    }
}

fn check_allocation(realm: &Realm, byte_length: usize) -> JsResult<()> {
    if byte_length > realm.config().max_array_buffer_byte_length {
        return Err(JsError::range_error("Array buffer allocation failed"));
    }
    Ok(())
}

/// `AllocateArrayBuffer(constructor, byteLength, maxByteLength)`
pub fn allocate_array_buffer(
    realm: &mut Realm,
    byte_length: usize,
    max_byte_length: Option<usize>,
    prototype: Option<ObjectHandle>,
) -> JsResult<ObjectHandle> {
    if let Some(max) = max_byte_length {
        if byte_length > max {
            return Err(JsError::range_error(
                "byteLength must not exceed maxByteLength",
            ));
        }
        check_allocation(realm, max)?;
    }
    check_allocation(realm, byte_length)?;
    let prototype = prototype.or(Some(realm.intrinsics().array_buffer_prototype));
    Ok(realm.allocate(
        prototype,
        ObjectKind::ArrayBuffer(ArrayBufferData {
            bytes: Some(vec![0; byte_length]),
            max_byte_length,
        }),
    ))
}

/// `IsDetachedBuffer(buffer)`
pub fn is_detached_buffer(realm: &Realm, buffer: ObjectHandle) -> bool {
    buffer_data(realm, buffer).map_or(true, ArrayBufferData::is_detached)
}

/// `ArrayBufferByteLength(buffer)`; 0 when detached
pub fn array_buffer_byte_length(realm: &Realm, buffer: ObjectHandle) -> usize {
    buffer_data(realm, buffer).map_or(0, ArrayBufferData::byte_length)
}

/// `DetachArrayBuffer(buffer)`
pub fn detach_array_buffer(realm: &mut Realm, buffer: ObjectHandle) -> JsResult<()> {
    let data = buffer_data_mut(realm, buffer)
        .ok_or_else(|| JsError::type_error("Receiver is not an ArrayBuffer"))?;
    data.bytes = None;
    debug!("array buffer #{} detached", buffer.index());
    Ok(())
}

/// `ArrayBuffer.prototype.resize(newLength)` after argument coercion.
/// Growth is zero-filled.
pub fn resize_array_buffer(
    realm: &mut Realm,
    buffer: ObjectHandle,
    new_length: usize,
) -> JsResult<()> {
    let data = buffer_data_mut(realm, buffer)
        .ok_or_else(|| JsError::type_error("Receiver is not an ArrayBuffer"))?;
    let Some(max) = data.max_byte_length else {
        return Err(JsError::type_error("ArrayBuffer is not resizable"));
    };
    let Some(bytes) = data.bytes.as_mut() else {
        return Err(JsError::type_error("Cannot resize a detached ArrayBuffer"));
    };
    if new_length > max {
        return Err(JsError::range_error("new length exceeds maxByteLength"));
    }
    let old_length = bytes.len();
    bytes.resize(new_length, 0);
    debug!(
        "array buffer #{} resized from {} to {} bytes",
        buffer.index(),
        old_length,
        new_length
    );
    Ok(())
}

/// `ArrayBufferCopyAndDetach(buffer, newLength, preserveResizability)`
pub fn transfer_array_buffer(
    realm: &mut Realm,
    buffer: ObjectHandle,
    new_length: Option<usize>,
    preserve_resizability: bool,
) -> JsResult<ObjectHandle> {
    let data = buffer_data(realm, buffer)
        .ok_or_else(|| JsError::type_error("Receiver is not an ArrayBuffer"))?
        .clone();
    let Some(bytes) = data.bytes else {
        return Err(JsError::type_error("Cannot transfer a detached ArrayBuffer"));
    };
    let new_length = new_length.unwrap_or(bytes.len());
    let max_byte_length = if preserve_resizability { data.max_byte_length } else { None };
    let target = allocate_array_buffer(realm, new_length, max_byte_length, None)?;
    if let Some(target_bytes) = buffer_data_mut(realm, target).and_then(|d| d.bytes.as_mut()) {
        let copied = bytes.len().min(new_length);
        target_bytes[..copied].copy_from_slice(&bytes[..copied]);
    }
    detach_array_buffer(realm, buffer)?;
    Ok(target)
}

// ---------------------------------------------------------------------------
// Typed arrays
// ---------------------------------------------------------------------------

fn view(realm: &Realm, object: ObjectHandle) -> Option<TypedArrayData> {
    match &realm.heap().get(object).kind {
        ObjectKind::TypedArray(data) => Some(*data),
        _ => None,
    }
}

/// Current element count of a view against the live buffer, `None` when the
/// view is out of bounds or its buffer is detached.
fn live_length(realm: &Realm, data: &TypedArrayData) -> Option<usize> {
    let buffer = buffer_data(realm, data.buffer)?;
    let buffer_length = buffer.bytes.as_ref()?.len();
    let size = data.element.size();
    if data.byte_offset > buffer_length {
        return None;
    }
    match data.array_length {
        Some(length) => (data.byte_offset + length * size <= buffer_length).then_some(length),
        None => Some((buffer_length - data.byte_offset) / size),
    }
}

/// `TypedArrayCreate` over an existing buffer
/// (`InitializeTypedArrayFromArrayBuffer`).
///
/// Without an explicit length the view tracks a resizable buffer's length
/// and spans the rest of a fixed-length one.
pub fn typed_array_create(
    realm: &mut Realm,
    element: ElementType,
    buffer: ObjectHandle,
    byte_offset: usize,
    length: Option<usize>,
    prototype: Option<ObjectHandle>,
) -> JsResult<ObjectHandle> {
    let size = element.size();
    if byte_offset % size != 0 {
        return Err(JsError::range_error(format!(
            "start offset of {} should be a multiple of {}",
            element.name(),
            size
        )));
    }
    let data = buffer_data(realm, buffer)
        .ok_or_else(|| JsError::type_error("Argument is not an ArrayBuffer"))?;
    let Some(bytes) = &data.bytes else {
        return Err(JsError::type_error("Cannot construct a typed array on a detached ArrayBuffer"));
    };
    let buffer_length = bytes.len();
    let resizable = data.max_byte_length.is_some();
    let array_length = match length {
        Some(length) => {
            if byte_offset + length * size > buffer_length {
                return Err(JsError::range_error(format!("Invalid typed array length: {}", length)));
            }
            Some(length)
        }
        None if resizable => {
            if byte_offset > buffer_length {
                return Err(JsError::range_error(format!(
                    "Start offset {} is outside the bounds of the buffer",
                    byte_offset
                )));
            }
            None
        }
        None => {
            if buffer_length % size != 0 {
                return Err(JsError::range_error(format!(
                    "byte length of {} should be a multiple of {}",
                    element.name(),
                    size
                )));
            }
            if byte_offset > buffer_length {
                return Err(JsError::range_error(format!(
                    "Start offset {} is outside the bounds of the buffer",
                    byte_offset
                )));
            }
            Some((buffer_length - byte_offset) / size)
        }
    };
    let prototype = prototype.or(Some(realm.intrinsics().typed_array_prototype_for(element)));
    Ok(realm.allocate(
        prototype,
        ObjectKind::TypedArray(TypedArrayData {
            element,
            buffer,
            byte_offset,
            array_length,
        }),
    ))
}

/// A typed array over a fresh zeroed buffer of `length` elements
pub fn typed_array_create_with_length(
    realm: &mut Realm,
    element: ElementType,
    length: usize,
    prototype: Option<ObjectHandle>,
) -> JsResult<ObjectHandle> {
    let byte_length = length
        .checked_mul(element.size())
        .ok_or_else(|| JsError::range_error(format!("Invalid typed array length: {}", length)))?;
    let buffer = allocate_array_buffer(realm, byte_length, None, None)?;
    typed_array_create(realm, element, buffer, 0, Some(length), prototype)
}

/// `TypedArrayLength` of a view that is in bounds, `None` otherwise
pub fn typed_array_length(realm: &Realm, object: ObjectHandle) -> Option<usize> {
    view(realm, object).and_then(|data| live_length(realm, &data))
}

/// The element type of a typed array
pub fn typed_array_element(realm: &Realm, object: ObjectHandle) -> Option<ElementType> {
    view(realm, object).map(|data| data.element)
}

/// `IsValidIntegerIndex(O, index)`
pub fn is_valid_integer_index(realm: &Realm, object: ObjectHandle, index: f64) -> bool {
    if !is_integral(index) || (index == 0.0 && index.is_sign_negative()) || index < 0.0 {
        return false;
    }
    match typed_array_length(realm, object) {
        Some(length) => index < length as f64,
        None => false,
    }
}

/// `TypedArrayGetElement(O, index)`
pub fn typed_array_get_element(realm: &Realm, object: ObjectHandle, index: f64) -> Value {
    if !is_valid_integer_index(realm, object, index) {
        return Value::Undefined;
    }
    let Some(data) = view(realm, object) else {
        return Value::Undefined;
    };
    let size = data.element.size();
    let start = data.byte_offset + index as usize * size;
    buffer_data(realm, data.buffer)
        .and_then(|b| b.bytes.as_ref())
        .and_then(|bytes| bytes.get(start..start + size))
        .map_or(Value::Undefined, |raw| Value::Number(data.element.decode(raw)))
}

/// `TypedArraySetElement(O, index, value)`.
///
/// The value is converted first; the index is validated afterwards against
/// whatever the conversion left the buffer looking like.
pub fn typed_array_set_element(
    realm: &mut Realm,
    object: ObjectHandle,
    index: f64,
    value: &Value,
) -> JsResult<()> {
    let number = to_number(realm, value)?;
    if !is_valid_integer_index(realm, object, index) {
        return Ok(());
    }
    let Some(data) = view(realm, object) else {
        return Ok(());
    };
    let size = data.element.size();
    let start = data.byte_offset + index as usize * size;
    let encoded = data.element.encode(number);
    if let Some(slot) = buffer_data_mut(realm, data.buffer)
        .and_then(|b| b.bytes.as_mut())
        .and_then(|bytes| bytes.get_mut(start..start + size))
    {
        slot.copy_from_slice(&encoded);
    }
    Ok(())
}

/// `[[GetOwnProperty]]`
pub fn get_own_property(
    realm: &Realm,
    object: ObjectHandle,
    key: &PropertyKey,
) -> Option<PropertyDescriptor> {
    match key.canonical_numeric_index() {
        Some(index) => match typed_array_get_element(realm, object, index) {
            Value::Undefined => None,
            value => Some(PropertyDescriptor::data(value, true, true, true)),
        },
        None => ordinary_get_own_property(realm, object, key),
    }
}

/// `[[HasProperty]]`
pub fn has_property(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    match key.canonical_numeric_index() {
        Some(index) => Ok(is_valid_integer_index(realm, object, index)),
        None => ordinary_has_property(realm, object, key),
    }
}

/// `[[DefineOwnProperty]]`
pub fn define_own_property(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> JsResult<bool> {
    let Some(index) = key.canonical_numeric_index() else {
        return ordinary_define_own_property(realm, object, key, desc);
    };
    if !is_valid_integer_index(realm, object, index)
        || desc.configurable == Some(false)
        || desc.enumerable == Some(false)
        || desc.is_accessor_descriptor()
        || desc.writable == Some(false)
    {
        return Ok(false);
    }
    if let Some(value) = &desc.value {
        typed_array_set_element(realm, object, index, value)?;
    }
    Ok(true)
}

/// `[[Get]]`
pub fn get(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    receiver: &Value,
) -> JsResult<Value> {
    match key.canonical_numeric_index() {
        Some(index) => Ok(typed_array_get_element(realm, object, index)),
        None => ordinary_get(realm, object, key, receiver),
    }
}

/// `[[Set]]`
pub fn set(
    realm: &mut Realm,
    object: ObjectHandle,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
) -> JsResult<bool> {
    if let Some(index) = key.canonical_numeric_index() {
        if receiver == &Value::Object(object) {
            typed_array_set_element(realm, object, index, &value)?;
            return Ok(true);
        }
        if !is_valid_integer_index(realm, object, index) {
            return Ok(true);
        }
    }
    ordinary_set(realm, object, key, value, receiver)
}

/// `[[Delete]]`: numeric keys are deletable exactly when they are not live
/// elements, so everything numeric deletes on a detached buffer.
pub fn delete(realm: &mut Realm, object: ObjectHandle, key: &PropertyKey) -> JsResult<bool> {
    match key.canonical_numeric_index() {
        Some(index) => Ok(!is_valid_integer_index(realm, object, index)),
        None => ordinary_delete(realm, object, key),
    }
}

/// `[[OwnPropertyKeys]]`
pub fn own_property_keys(realm: &Realm, object: ObjectHandle) -> Vec<PropertyKey> {
    let length = typed_array_length(realm, object).unwrap_or(0);
    let mut keys: Vec<PropertyKey> = (0..length as u64).map(PropertyKey::from).collect();
    keys.extend(realm.heap().get(object).properties.keys());
    keys
}

/// `[[PreventExtensions]]`: refused while the view can still change length
pub fn prevent_extensions(realm: &mut Realm, object: ObjectHandle) -> JsResult<bool> {
    let fixed = match view(realm, object) {
        Some(data) => {
            data.array_length.is_some()
                && buffer_data(realm, data.buffer).map_or(true, |b| b.max_byte_length.is_none())
        }
        None => true,
    };
    if !fixed {
        return Ok(false);
    }
    Ok(ordinary_prevent_extensions(realm, object))
}
