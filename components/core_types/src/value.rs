//! JavaScript value representation.
//!
//! This module provides the core `Value` enum that represents all possible
//! JavaScript values. Objects are never stored inline: a value refers to an
//! object through an [`ObjectHandle`] into the owning realm's heap.

use std::fmt;

use crate::number;
use crate::{JsString, Symbol};

/// Non-owning handle to an object stored in a realm's heap.
///
/// Handles are plain indices. Holding one does not keep the object alive;
/// the heap (and whatever collector sits on top of it) owns every object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(u32);

impl ObjectHandle {
    /// Create a handle from a raw heap index
    pub fn from_index(index: u32) -> Self {
        ObjectHandle(index)
    }

    /// The raw heap index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Represents any JavaScript value.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let undefined = Value::Undefined;
/// let number = Value::Number(42.0);
/// let text = Value::from("hi");
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// assert_eq!(text.type_of(), "string");
/// ```
#[derive(Clone, PartialEq)]
pub enum Value {
    /// JavaScript undefined value
    Undefined,
    /// JavaScript null value
    Null,
    /// JavaScript boolean (true or false)
    Boolean(bool),
    /// IEEE 754 double-precision floating point
    Number(f64),
    /// JavaScript string value
    String(JsString),
    /// JavaScript symbol value
    Symbol(Symbol),
    /// Reference to a heap object
    Object(ObjectHandle),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Symbol(s) => f.debug_tuple("Symbol").field(s).finish(),
            Value::Object(h) => f.debug_tuple("Object").field(&h.0).finish(),
        }
    }
}

impl Value {
    /// Returns whether this value is truthy in JavaScript semantics (`ToBoolean`).
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert!(!Value::Undefined.is_truthy());
    /// assert!(!Value::Number(f64::NAN).is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// assert!(Value::from("0").is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) | Value::Object(_) => true,
        }
    }

    /// Returns the JavaScript typeof result for this value.
    ///
    /// Callable objects report `"function"` at the realm level; this
    /// primitive-level answer reports every object as `"object"`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(_) => "object",
        }
    }

    /// Whether the value is `undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Whether the value is `undefined` or `null`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// The object handle, if this is an object
    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            Value::Object(h) => Some(*h),
            _ => None,
        }
    }

    /// The number, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is a string
    pub fn as_string(&self) -> Option<&JsString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// `SameValue(x, y)`: like `===` except `NaN` equals itself and `+0` differs from `-0`.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => number::same_value(*a, *b),
            _ => self == other,
        }
    }

    /// `SameValueZero(x, y)`: like `SameValue` except `+0` equals `-0`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            _ => self == other,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(JsString::from(s))
    }
}

impl From<JsString> for Value {
    fn from(s: JsString) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<ObjectHandle> for Value {
    fn from(h: ObjectHandle) -> Self {
        Value::Object(h)
    }
}

impl From<Option<ObjectHandle>> for Value {
    fn from(h: Option<ObjectHandle>) -> Self {
        h.map_or(Value::Null, Value::Object)
    }
}
